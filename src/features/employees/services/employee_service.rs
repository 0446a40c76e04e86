use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::employees::dtos::{
    CreateEmployeeDto, EmployeeResponseDto, UpdateEmployeeDto,
};
use crate::features::employees::models::Employee;
use crate::features::employees::password::hash_password;

const COLUMNS: &str = r#"
    id, owner_id, first_name, last_name, email, phone, role, password_hash,
    created_at, updated_at
"#;

pub struct EmployeeService {
    pool: PgPool,
}

impl EmployeeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, user: &AuthenticatedUser) -> Result<Vec<EmployeeResponseDto>> {
        let query = format!(
            "SELECT {} FROM employees WHERE owner_id = $1 ORDER BY last_name, first_name",
            COLUMNS
        );
        let employees = sqlx::query_as::<_, Employee>(&query)
            .bind(user.id())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list employees: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(employees.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: Uuid) -> Result<EmployeeResponseDto> {
        Ok(self.fetch_owned(user, id).await?.into())
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        dto: CreateEmployeeDto,
    ) -> Result<EmployeeResponseDto> {
        dto.validate().map_err(AppError::from_validation)?;

        let password_hash = match dto.password {
            Some(password) => Some(hash_in_background(password).await?),
            None => None,
        };

        let query = format!(
            r#"
            INSERT INTO employees (owner_id, first_name, last_name, email, phone, role, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            COLUMNS
        );
        let employee = sqlx::query_as::<_, Employee>(&query)
            .bind(user.id())
            .bind(dto.first_name.trim())
            .bind(dto.last_name.trim())
            .bind(&dto.email)
            .bind(&dto.phone)
            .bind(&dto.role)
            .bind(&password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)?;

        tracing::info!("Employee {} added by user {}", employee.id, user.id());
        Ok(employee.into())
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        dto: UpdateEmployeeDto,
    ) -> Result<EmployeeResponseDto> {
        dto.validate().map_err(AppError::from_validation)?;
        self.fetch_owned(user, id).await?;

        // (replace the stored hash?, new hash)
        let (replace_hash, new_hash) = match (dto.password, dto.remove_password) {
            (Some(password), _) => (true, Some(hash_in_background(password).await?)),
            (None, true) => (true, None),
            (None, false) => (false, None),
        };

        let query = format!(
            r#"
            UPDATE employees SET
                first_name = $2, last_name = $3, email = $4, phone = $5, role = $6,
                password_hash = CASE WHEN $7 THEN $8 ELSE password_hash END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            COLUMNS
        );
        let employee = sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .bind(dto.first_name.trim())
            .bind(dto.last_name.trim())
            .bind(&dto.email)
            .bind(&dto.phone)
            .bind(&dto.role)
            .bind(replace_hash)
            .bind(&new_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)?;

        tracing::info!("Employee {} updated", id);
        Ok(employee.into())
    }

    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(user.id())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete employee {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Employee {} not found", id)));
        }
        tracing::info!("Employee {} removed by user {}", id, user.id());
        Ok(())
    }

    pub async fn verify(&self, user: &AuthenticatedUser, id: Uuid, password: String) -> Result<bool> {
        let employee = self.fetch_owned(user, id).await?;
        let verified = tokio::task::spawn_blocking(move || employee.verify(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password check task failed: {}", e)))??;

        if !verified {
            tracing::warn!("Wrong password for employee {}", id);
        }
        Ok(verified)
    }

    async fn fetch_owned(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Employee> {
        let query = format!("SELECT {} FROM employees WHERE id = $1", COLUMNS);
        let employee = sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch employee {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        match employee {
            Some(employee) if user.owns(employee.owner_id) => Ok(employee),
            _ => Err(AppError::NotFound(format!("Employee {} not found", id))),
        }
    }
}

/// Argon2 is CPU bound, keep it off the async workers
async fn hash_in_background(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
}
