use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use super::InspectionStore;
use crate::core::error::{AppError, Result};
use crate::features::inspections::models::{
    FinalizeUpdate, GeneralFields, InspectionRecord, NewInspection, Signature, SignatureParty,
    StatutEtatDesLieux,
};
use crate::features::inspections::services::finalised;
use crate::features::photos::PhotoAttachment;

/// In-memory `etats_des_lieux` table
#[derive(Default)]
pub struct FakeInspectionStore {
    rows: Mutex<HashMap<Uuid, InspectionRecord>>,
    pub fail_creates: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl FakeInspectionStore {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn snapshot(&self, id: Uuid) -> Option<InspectionRecord> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    /// `None` when the row does not exist
    pub fn is_editable(&self, id: Uuid) -> Option<bool> {
        self.snapshot(id).map(|r| !r.is_finalised())
    }

    /// Commit finalisation outside of any service call
    pub fn mark_finalised(&self, id: Uuid) {
        if let Some(record) = self.rows.lock().unwrap().get_mut(&id) {
            record.statut = StatutEtatDesLieux::Finalise;
        }
    }

    fn check_writes(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("simulated database failure".to_string()));
        }
        Ok(())
    }

    fn modify<F>(&self, id: Uuid, apply: F) -> Result<InspectionRecord>
    where
        F: FnOnce(&mut InspectionRecord),
    {
        self.check_writes()?;
        let mut rows = self.rows.lock().unwrap();
        let record = rows
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Inspection {} not found", id)))?;
        apply(record);
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    /// `modify` restricted to rows still `en_cours`
    fn modify_editable<F>(&self, id: Uuid, apply: F) -> Result<InspectionRecord>
    where
        F: FnOnce(&mut InspectionRecord),
    {
        if self.is_editable(id) == Some(false) {
            return Err(finalised(id));
        }
        self.modify(id, apply)
    }
}

#[async_trait]
impl InspectionStore for FakeInspectionStore {
    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<InspectionRecord>, i64)> {
        let rows = self.rows.lock().unwrap();
        let mut owned: Vec<InspectionRecord> =
            rows.values().filter(|r| r.user_id == user_id).cloned().collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = owned.len() as i64;
        let page = owned
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn get(&self, id: Uuid) -> Result<Option<InspectionRecord>> {
        Ok(self.snapshot(id))
    }

    async fn create(&self, new: NewInspection) -> Result<InspectionRecord> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(AppError::Internal("simulated insert failure".to_string()));
        }
        let now = Utc::now();
        let f = new.fields;
        let record = InspectionRecord {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            rendez_vous_id: new.rendez_vous_id,
            type_etat_des_lieux: f.type_etat_des_lieux,
            type_bien: f.type_bien,
            adresse_bien: f.adresse_bien,
            code_postal: f.code_postal,
            ville: f.ville,
            bailleur_nom: f.bailleur_nom,
            bailleur_adresse: f.bailleur_adresse,
            locataire_nom: f.locataire_nom,
            locataire_email: f.locataire_email,
            date_entree: f.date_entree,
            date_sortie: f.date_sortie,
            travaux_a_faire: false,
            description_travaux: None,
            statut: StatutEtatDesLieux::EnCours,
            current_step: 0,
            signature_bailleur: None,
            signature_locataire: None,
            photos: Json(Vec::new()),
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_general(
        &self,
        id: Uuid,
        fields: &GeneralFields,
        photos: &[PhotoAttachment],
    ) -> Result<InspectionRecord> {
        let fields = fields.clone();
        let photos = photos.to_vec();
        self.modify_editable(id, move |r| {
            r.type_etat_des_lieux = fields.type_etat_des_lieux;
            r.type_bien = fields.type_bien;
            r.adresse_bien = fields.adresse_bien;
            r.code_postal = fields.code_postal;
            r.ville = fields.ville;
            r.bailleur_nom = fields.bailleur_nom;
            r.bailleur_adresse = fields.bailleur_adresse;
            r.locataire_nom = fields.locataire_nom;
            r.locataire_email = fields.locataire_email;
            r.date_entree = fields.date_entree;
            r.date_sortie = fields.date_sortie;
            r.photos = Json(photos);
        })
    }

    async fn set_current_step(&self, id: Uuid, step: i32) -> Result<()> {
        self.modify(id, |r| r.current_step = step).map(|_| ())
    }

    async fn set_signature(
        &self,
        id: Uuid,
        party: SignatureParty,
        signature: &Signature,
    ) -> Result<InspectionRecord> {
        let signature = Json(signature.clone());
        self.modify_editable(id, move |r| match party {
            SignatureParty::Bailleur => r.signature_bailleur = Some(signature),
            SignatureParty::Locataire => r.signature_locataire = Some(signature),
        })
    }

    async fn finalize(&self, id: Uuid, update: &FinalizeUpdate) -> Result<InspectionRecord> {
        let update = update.clone();
        self.modify_editable(id, move |r| {
            r.statut = StatutEtatDesLieux::Finalise;
            r.date_entree = update.date_entree;
            r.date_sortie = update.date_sortie;
            r.travaux_a_faire = update.travaux_a_faire;
            r.description_travaux = update.description_travaux;
        })
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        self.check_writes()?;
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }
}
