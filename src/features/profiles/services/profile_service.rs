use sqlx::PgPool;
use validator::Validate;

use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::profiles::dtos::{ProfileResponseDto, UpdateProfileDto};
use crate::features::profiles::models::Profile;

const COLUMNS: &str = "id, first_name, last_name, company, phone, address, created_at, updated_at";

/// Profile row keyed by the auth user id
pub struct ProfileService {
    pool: PgPool,
}

impl ProfileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, user: &AuthenticatedUser) -> Result<ProfileResponseDto> {
        let query = format!("SELECT {} FROM profiles WHERE id = $1", COLUMNS);
        let profile = sqlx::query_as::<_, Profile>(&query)
            .bind(user.id())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch profile {}: {:?}", user.id(), e);
                AppError::Database(e)
            })?;

        Ok(match profile {
            Some(profile) => ProfileResponseDto::from_profile(profile, user.email.clone()),
            None => ProfileResponseDto::empty(user.id(), user.email.clone()),
        })
    }

    pub async fn upsert(
        &self,
        user: &AuthenticatedUser,
        dto: UpdateProfileDto,
    ) -> Result<ProfileResponseDto> {
        let dto = dto.normalized();
        dto.validate().map_err(AppError::from_validation)?;

        let query = format!(
            r#"
            INSERT INTO profiles (id, first_name, last_name, company, phone, address)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                company = EXCLUDED.company,
                phone = EXCLUDED.phone,
                address = EXCLUDED.address,
                updated_at = NOW()
            RETURNING {}
            "#,
            COLUMNS
        );
        let profile = sqlx::query_as::<_, Profile>(&query)
            .bind(user.id())
            .bind(&dto.first_name)
            .bind(&dto.last_name)
            .bind(&dto.company)
            .bind(&dto.phone)
            .bind(&dto.address)
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)?;

        tracing::info!("Profile saved for user {}", user.id());
        Ok(ProfileResponseDto::from_profile(profile, user.email.clone()))
    }
}
