use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::marker::PhantomData;
use uuid::Uuid;

use super::ChildStore;
use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::inspections::services::{finalised, missing};
use crate::features::photos::PhotoAttachment;
use crate::features::steps::entity::{ChildRecord, StepEntity};

const COLUMNS: &str = "id, etat_des_lieux_id, details, photos, created_at, updated_at";

// Child rows only change while their inspection is in progress
const PARENT_EDITABLE: &str = "EXISTS (SELECT 1 FROM etats_des_lieux p \
     WHERE p.id = etat_des_lieux_id AND p.statut = 'en_cours')";

#[derive(Debug, FromRow)]
struct ChildRow {
    id: Uuid,
    etat_des_lieux_id: Uuid,
    details: Json<serde_json::Value>,
    photos: Json<Vec<PhotoAttachment>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ChildRow {
    fn into_record<E: StepEntity>(self) -> Result<ChildRecord<E>> {
        let details = serde_json::from_value(self.details.0).map_err(|e| {
            tracing::error!("Unreadable {} row {}: {}", E::TABLE, self.id, e);
            AppError::Internal(format!("Stored {} {} is unreadable", E::LABEL, self.id))
        })?;
        Ok(ChildRecord {
            id: self.id,
            inspection_id: self.etat_des_lieux_id,
            details,
            photos: self.photos.0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Child table access keyed by `E::TABLE`
pub struct PgChildStore<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E: StepEntity> PgChildStore<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    /// Explains a guarded write that touched no row. `None` when the entry itself is gone.
    async fn write_rejected(&self, id: Uuid) -> Result<Option<AppError>> {
        let query = format!("SELECT etat_des_lieux_id FROM {} WHERE id = $1", E::TABLE);
        let parent = sqlx::query_scalar::<_, Uuid>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up parent of {} {}: {:?}", E::LABEL, id, e);
                AppError::Database(e)
            })?;
        Ok(parent.map(finalised))
    }

    fn details_json(details: &E) -> Result<serde_json::Value> {
        serde_json::to_value(details)
            .map_err(|e| AppError::Internal(format!("Failed to encode {}: {}", E::LABEL, e)))
    }
}

#[async_trait]
impl<E: StepEntity> ChildStore<E> for PgChildStore<E> {
    async fn list(&self, inspection_id: Uuid) -> Result<Vec<ChildRecord<E>>> {
        let query = format!(
            "SELECT {} FROM {} WHERE etat_des_lieux_id = $1 ORDER BY created_at ASC, id ASC",
            COLUMNS,
            E::TABLE
        );
        let rows = sqlx::query_as::<_, ChildRow>(&query)
            .bind(inspection_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list {}: {:?}", E::TABLE, e);
                AppError::Database(e)
            })?;

        rows.into_iter().map(ChildRow::into_record::<E>).collect()
    }

    async fn get(&self, id: Uuid) -> Result<Option<ChildRecord<E>>> {
        let query = format!("SELECT {} FROM {} WHERE id = $1", COLUMNS, E::TABLE);
        sqlx::query_as::<_, ChildRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch {} {}: {:?}", E::LABEL, id, e);
                AppError::Database(e)
            })?
            .map(ChildRow::into_record::<E>)
            .transpose()
    }

    async fn insert(
        &self,
        inspection_id: Uuid,
        details: &E,
        photos: &[PhotoAttachment],
    ) -> Result<ChildRecord<E>> {
        let query = format!(
            "INSERT INTO {} (etat_des_lieux_id, details, photos) \
             SELECT p.id, $2, $3 FROM etats_des_lieux p WHERE p.id = $1 AND p.statut = 'en_cours' \
             RETURNING {}",
            E::TABLE,
            COLUMNS
        );
        let row = sqlx::query_as::<_, ChildRow>(&query)
            .bind(inspection_id)
            .bind(Json(Self::details_json(details)?))
            .bind(Json(photos))
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)?;

        match row {
            Some(row) => row.into_record(),
            None => {
                let exists = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS (SELECT 1 FROM etats_des_lieux WHERE id = $1)",
                )
                .bind(inspection_id)
                .fetch_one(&self.pool)
                .await
                .map_err(handle_db_error)?;
                Err(if exists {
                    finalised(inspection_id)
                } else {
                    missing(inspection_id)
                })
            }
        }
    }

    async fn update(
        &self,
        id: Uuid,
        details: &E,
        photos: &[PhotoAttachment],
    ) -> Result<ChildRecord<E>> {
        let query = format!(
            "UPDATE {} SET details = $2, photos = $3, updated_at = NOW() \
             WHERE id = $1 AND {} RETURNING {}",
            E::TABLE,
            PARENT_EDITABLE,
            COLUMNS
        );
        let row = sqlx::query_as::<_, ChildRow>(&query)
            .bind(id)
            .bind(Json(Self::details_json(details)?))
            .bind(Json(photos))
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)?;

        match row {
            Some(row) => row.into_record(),
            None => Err(self
                .write_rejected(id)
                .await?
                .unwrap_or_else(|| AppError::NotFound(format!("{} {} not found", E::LABEL, id)))),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let query = format!("DELETE FROM {} WHERE id = $1 AND {}", E::TABLE, PARENT_EDITABLE);
        let result = sqlx::query(&query)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete {} {}: {:?}", E::LABEL, id, e);
                AppError::Database(e)
            })?;
        if result.rows_affected() > 0 {
            return Ok(true);
        }
        match self.write_rejected(id).await? {
            Some(err) => Err(err),
            None => Ok(false),
        }
    }
}
