use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use super::AppointmentStore;
use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::appointments::models::{Appointment, AppointmentFields, AppointmentStatus};

const COLUMNS: &str = r#"
    id, user_id, date, heure, duree_minutes, adresse, code_postal, ville,
    type_etat_des_lieux, type_bien, contact_nom, contact_telephone, contact_email,
    notes, status, etat_des_lieux_id, created_at, updated_at
"#;

pub struct PgAppointmentStore {
    pool: PgPool,
}

impl PgAppointmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn missing(id: Uuid) -> AppError {
    AppError::NotFound(format!("Appointment {} not found", id))
}

#[async_trait]
impl AppointmentStore for PgAppointmentStore {
    async fn list_for_user(
        &self,
        user_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Appointment>> {
        let query = format!(
            r#"
            SELECT {} FROM rendez_vous
            WHERE user_id = $1
              AND ($2::date IS NULL OR date >= $2)
              AND ($3::date IS NULL OR date <= $3)
            ORDER BY date ASC, heure ASC
            "#,
            COLUMNS
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(user_id)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list appointments: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>> {
        let query = format!("SELECT {} FROM rendez_vous WHERE id = $1", COLUMNS);
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch appointment {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn create(&self, user_id: Uuid, f: &AppointmentFields) -> Result<Appointment> {
        let query = format!(
            r#"
            INSERT INTO rendez_vous (
                user_id, date, heure, duree_minutes, adresse, code_postal, ville,
                type_etat_des_lieux, type_bien, contact_nom, contact_telephone,
                contact_email, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            COLUMNS
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(user_id)
            .bind(f.date)
            .bind(&f.heure)
            .bind(f.duree_minutes)
            .bind(&f.adresse)
            .bind(&f.code_postal)
            .bind(&f.ville)
            .bind(f.type_etat_des_lieux)
            .bind(&f.type_bien)
            .bind(&f.contact_nom)
            .bind(&f.contact_telephone)
            .bind(&f.contact_email)
            .bind(&f.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn update(&self, id: Uuid, f: &AppointmentFields) -> Result<Appointment> {
        let query = format!(
            r#"
            UPDATE rendez_vous SET
                date = $2, heure = $3, duree_minutes = $4, adresse = $5,
                code_postal = $6, ville = $7, type_etat_des_lieux = $8, type_bien = $9,
                contact_nom = $10, contact_telephone = $11, contact_email = $12,
                notes = $13, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            COLUMNS
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .bind(f.date)
            .bind(&f.heure)
            .bind(f.duree_minutes)
            .bind(&f.adresse)
            .bind(&f.code_postal)
            .bind(&f.ville)
            .bind(f.type_etat_des_lieux)
            .bind(&f.type_bien)
            .bind(&f.contact_nom)
            .bind(&f.contact_telephone)
            .bind(&f.contact_email)
            .bind(&f.notes)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)?
            .ok_or_else(|| missing(id))
    }

    async fn set_status(&self, id: Uuid, status: AppointmentStatus) -> Result<Appointment> {
        let query = format!(
            "UPDATE rendez_vous SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)?
            .ok_or_else(|| missing(id))
    }

    async fn claim_for_conversion(&self, id: Uuid) -> Result<Option<Appointment>> {
        let query = format!(
            r#"
            UPDATE rendez_vous SET status = 'realise', updated_at = NOW()
            WHERE id = $1 AND status IN ('planifie', 'reporte')
            RETURNING {}
            "#,
            COLUMNS
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to claim appointment {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn attach_inspection(&self, id: Uuid, etat_des_lieux_id: Uuid) -> Result<Appointment> {
        let query = format!(
            "UPDATE rendez_vous SET etat_des_lieux_id = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .bind(etat_des_lieux_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)?
            .ok_or_else(|| missing(id))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM rendez_vous WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete appointment {}: {:?}", id, e);
                AppError::Database(e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
