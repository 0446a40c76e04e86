use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::inspections::models::{
    GeneralFields, InspectionRecord, Signature, StatutEtatDesLieux, TypeBien, TypeEtatDesLieux,
};
use crate::features::photos::PhotoAttachment;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateInspectionDto {
    #[validate(nested)]
    pub general: GeneralFields,

    /// Existing photos to keep, with edited descriptions. Omit to leave
    /// the photo list untouched.
    pub photos: Option<Vec<PhotoAttachment>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InspectionResponseDto {
    pub id: Uuid,
    pub rendez_vous_id: Option<Uuid>,
    pub type_etat_des_lieux: TypeEtatDesLieux,
    pub type_bien: TypeBien,
    pub adresse_bien: String,
    pub code_postal: Option<String>,
    pub ville: Option<String>,
    pub bailleur_nom: Option<String>,
    pub bailleur_adresse: Option<String>,
    pub locataire_nom: Option<String>,
    pub locataire_email: Option<String>,
    pub date_entree: Option<NaiveDate>,
    pub date_sortie: Option<NaiveDate>,
    pub travaux_a_faire: bool,
    pub description_travaux: Option<String>,
    pub statut: StatutEtatDesLieux,
    pub current_step: i32,
    pub signature_bailleur: Option<Signature>,
    pub signature_locataire: Option<Signature>,
    pub photos: Vec<PhotoAttachment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InspectionRecord> for InspectionResponseDto {
    fn from(r: InspectionRecord) -> Self {
        Self {
            id: r.id,
            rendez_vous_id: r.rendez_vous_id,
            type_etat_des_lieux: r.type_etat_des_lieux,
            type_bien: r.type_bien,
            adresse_bien: r.adresse_bien,
            code_postal: r.code_postal,
            ville: r.ville,
            bailleur_nom: r.bailleur_nom,
            bailleur_adresse: r.bailleur_adresse,
            locataire_nom: r.locataire_nom,
            locataire_email: r.locataire_email,
            date_entree: r.date_entree,
            date_sortie: r.date_sortie,
            travaux_a_faire: r.travaux_a_faire,
            description_travaux: r.description_travaux,
            statut: r.statut,
            current_step: r.current_step,
            signature_bailleur: r.signature_bailleur.map(|s| s.0),
            signature_locataire: r.signature_locataire.map(|s| s.0),
            photos: r.photos.0,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
