use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::InspectionStore;
use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::inspections::models::{
    FinalizeUpdate, GeneralFields, InspectionRecord, NewInspection, Signature, SignatureParty,
    StatutEtatDesLieux,
};
use crate::features::inspections::services::{finalised, missing};
use crate::features::photos::PhotoAttachment;

const COLUMNS: &str = r#"
    id, user_id, rendez_vous_id, type_etat_des_lieux, type_bien, adresse_bien,
    code_postal, ville, bailleur_nom, bailleur_adresse, locataire_nom,
    locataire_email, date_entree, date_sortie, travaux_a_faire,
    description_travaux, statut, current_step, signature_bailleur,
    signature_locataire, photos, created_at, updated_at
"#;

pub struct PgInspectionStore {
    pool: PgPool,
}

impl PgInspectionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Writes other than navigation and deletion only match `en_cours` rows
const EDITABLE: &str = "statut = 'en_cours'";

impl PgInspectionStore {
    /// Why a guarded write matched no row
    async fn write_rejected(&self, id: Uuid) -> AppError {
        let statut = sqlx::query_scalar::<_, StatutEtatDesLieux>(
            "SELECT statut FROM etats_des_lieux WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        match statut {
            Ok(Some(_)) => finalised(id),
            Ok(None) => missing(id),
            Err(e) => {
                tracing::error!("Failed to check status of inspection {}: {:?}", id, e);
                AppError::Database(e)
            }
        }
    }

    async fn guarded(
        &self,
        id: Uuid,
        row: std::result::Result<Option<InspectionRecord>, sqlx::Error>,
    ) -> Result<InspectionRecord> {
        match row.map_err(handle_db_error)? {
            Some(record) => Ok(record),
            None => Err(self.write_rejected(id).await),
        }
    }
}

#[async_trait]
impl InspectionStore for PgInspectionStore {
    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<InspectionRecord>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM etats_des_lieux WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count inspections: {:?}", e);
                    AppError::Database(e)
                })?;

        let query = format!(
            "SELECT {} FROM etats_des_lieux WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            COLUMNS
        );
        let records = sqlx::query_as::<_, InspectionRecord>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list inspections: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((records, total))
    }

    async fn get(&self, id: Uuid) -> Result<Option<InspectionRecord>> {
        let query = format!("SELECT {} FROM etats_des_lieux WHERE id = $1", COLUMNS);
        sqlx::query_as::<_, InspectionRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch inspection {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn create(&self, new: NewInspection) -> Result<InspectionRecord> {
        let query = format!(
            r#"
            INSERT INTO etats_des_lieux (
                user_id, rendez_vous_id, type_etat_des_lieux, type_bien, adresse_bien,
                code_postal, ville, bailleur_nom, bailleur_adresse, locataire_nom,
                locataire_email, date_entree, date_sortie
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            COLUMNS
        );
        let f = &new.fields;
        sqlx::query_as::<_, InspectionRecord>(&query)
            .bind(new.user_id)
            .bind(new.rendez_vous_id)
            .bind(f.type_etat_des_lieux)
            .bind(f.type_bien)
            .bind(&f.adresse_bien)
            .bind(&f.code_postal)
            .bind(&f.ville)
            .bind(&f.bailleur_nom)
            .bind(&f.bailleur_adresse)
            .bind(&f.locataire_nom)
            .bind(&f.locataire_email)
            .bind(f.date_entree)
            .bind(f.date_sortie)
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn update_general(
        &self,
        id: Uuid,
        fields: &GeneralFields,
        photos: &[PhotoAttachment],
    ) -> Result<InspectionRecord> {
        let query = format!(
            r#"
            UPDATE etats_des_lieux SET
                type_etat_des_lieux = $2, type_bien = $3, adresse_bien = $4,
                code_postal = $5, ville = $6, bailleur_nom = $7, bailleur_adresse = $8,
                locataire_nom = $9, locataire_email = $10, date_entree = $11,
                date_sortie = $12, photos = $13, updated_at = NOW()
            WHERE id = $1 AND {}
            RETURNING {}
            "#,
            EDITABLE, COLUMNS
        );
        let row = sqlx::query_as::<_, InspectionRecord>(&query)
            .bind(id)
            .bind(fields.type_etat_des_lieux)
            .bind(fields.type_bien)
            .bind(&fields.adresse_bien)
            .bind(&fields.code_postal)
            .bind(&fields.ville)
            .bind(&fields.bailleur_nom)
            .bind(&fields.bailleur_adresse)
            .bind(&fields.locataire_nom)
            .bind(&fields.locataire_email)
            .bind(fields.date_entree)
            .bind(fields.date_sortie)
            .bind(Json(photos))
            .fetch_optional(&self.pool)
            .await;
        self.guarded(id, row).await
    }

    async fn set_current_step(&self, id: Uuid, step: i32) -> Result<()> {
        let result = sqlx::query(
            "UPDATE etats_des_lieux SET current_step = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(step)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store wizard step for {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(missing(id));
        }
        Ok(())
    }

    async fn set_signature(
        &self,
        id: Uuid,
        party: SignatureParty,
        signature: &Signature,
    ) -> Result<InspectionRecord> {
        // Column name comes from a closed enum, never from input
        let query = format!(
            "UPDATE etats_des_lieux SET {} = $2, updated_at = NOW() WHERE id = $1 AND {} RETURNING {}",
            party.column(),
            EDITABLE,
            COLUMNS
        );
        let row = sqlx::query_as::<_, InspectionRecord>(&query)
            .bind(id)
            .bind(Json(signature))
            .fetch_optional(&self.pool)
            .await;
        self.guarded(id, row).await
    }

    async fn finalize(&self, id: Uuid, update: &FinalizeUpdate) -> Result<InspectionRecord> {
        let query = format!(
            r#"
            UPDATE etats_des_lieux SET
                statut = $2, date_entree = $3, date_sortie = $4,
                travaux_a_faire = $5, description_travaux = $6, updated_at = NOW()
            WHERE id = $1 AND {}
            RETURNING {}
            "#,
            EDITABLE, COLUMNS
        );
        let row = sqlx::query_as::<_, InspectionRecord>(&query)
            .bind(id)
            .bind(StatutEtatDesLieux::Finalise)
            .bind(update.date_entree)
            .bind(update.date_sortie)
            .bind(update.travaux_a_faire)
            .bind(&update.description_travaux)
            .fetch_optional(&self.pool)
            .await;
        self.guarded(id, row).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM etats_des_lieux WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete inspection {}: {:?}", id, e);
                AppError::Database(e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
