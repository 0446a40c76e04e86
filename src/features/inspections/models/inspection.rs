use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::signature::Signature;
use crate::features::photos::PhotoAttachment;
use crate::shared::validation::POSTCODE_REGEX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "type_etat_des_lieux", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TypeEtatDesLieux {
    Entree,
    Sortie,
}

impl std::fmt::Display for TypeEtatDesLieux {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeEtatDesLieux::Entree => write!(f, "entree"),
            TypeEtatDesLieux::Sortie => write!(f, "sortie"),
        }
    }
}

/// Property type. Appointments write the same codes with `-` instead of `_`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "type_bien")]
pub enum TypeBien {
    #[sqlx(rename = "studio")]
    #[serde(rename = "studio")]
    Studio,
    #[sqlx(rename = "t1")]
    #[serde(rename = "t1")]
    T1,
    #[sqlx(rename = "t2_t3")]
    #[serde(rename = "t2_t3")]
    T2T3,
    #[sqlx(rename = "t4_t5")]
    #[serde(rename = "t4_t5")]
    T4T5,
    #[sqlx(rename = "t6_plus")]
    #[serde(rename = "t6_plus")]
    T6Plus,
    #[sqlx(rename = "maison")]
    #[serde(rename = "maison")]
    Maison,
}

impl TypeBien {
    pub const ALL: [TypeBien; 6] = [
        TypeBien::Studio,
        TypeBien::T1,
        TypeBien::T2T3,
        TypeBien::T4T5,
        TypeBien::T6Plus,
        TypeBien::Maison,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            TypeBien::Studio => "studio",
            TypeBien::T1 => "t1",
            TypeBien::T2T3 => "t2_t3",
            TypeBien::T4T5 => "t4_t5",
            TypeBien::T6Plus => "t6_plus",
            TypeBien::Maison => "maison",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// Parse the hyphenated form used by appointments (`t2-t3`)
    pub fn from_appointment_code(code: &str) -> Option<Self> {
        Self::from_code(&code.trim().to_lowercase().replace('-', "_"))
    }

    pub fn appointment_code(&self) -> String {
        self.code().replace('_', "-")
    }
}

impl std::fmt::Display for TypeBien {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "statut_etat_des_lieux", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StatutEtatDesLieux {
    EnCours,
    Finalise,
}

/// Database model for an inspection (`etats_des_lieux`)
#[derive(Debug, Clone, FromRow)]
pub struct InspectionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
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
    pub signature_bailleur: Option<Json<Signature>>,
    pub signature_locataire: Option<Json<Signature>>,
    pub photos: Json<Vec<PhotoAttachment>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InspectionRecord {
    pub fn is_finalised(&self) -> bool {
        self.statut == StatutEtatDesLieux::Finalise
    }

    pub fn has_both_signatures(&self) -> bool {
        self.signature_bailleur.is_some() && self.signature_locataire.is_some()
    }

    pub fn general_fields(&self) -> GeneralFields {
        GeneralFields {
            type_etat_des_lieux: self.type_etat_des_lieux,
            type_bien: self.type_bien,
            adresse_bien: self.adresse_bien.clone(),
            code_postal: self.code_postal.clone(),
            ville: self.ville.clone(),
            bailleur_nom: self.bailleur_nom.clone(),
            bailleur_adresse: self.bailleur_adresse.clone(),
            locataire_nom: self.locataire_nom.clone(),
            locataire_email: self.locataire_email.clone(),
            date_entree: self.date_entree,
            date_sortie: self.date_sortie,
        }
    }
}

/// Fields edited on the General step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct GeneralFields {
    pub type_etat_des_lieux: TypeEtatDesLieux,
    pub type_bien: TypeBien,

    #[validate(length(min = 1, max = 500, message = "Property address is required"))]
    pub adresse_bien: String,

    #[validate(regex(path = *POSTCODE_REGEX, message = "Postcode must be 5 digits"))]
    pub code_postal: Option<String>,

    #[validate(length(max = 200))]
    pub ville: Option<String>,

    #[validate(length(max = 200))]
    pub bailleur_nom: Option<String>,

    #[validate(length(max = 500))]
    pub bailleur_adresse: Option<String>,

    #[validate(length(max = 200))]
    pub locataire_nom: Option<String>,

    #[validate(email(message = "Invalid tenant email"))]
    pub locataire_email: Option<String>,

    pub date_entree: Option<NaiveDate>,
    pub date_sortie: Option<NaiveDate>,
}

/// Data for creating a new inspection
#[derive(Debug, Clone)]
pub struct NewInspection {
    pub user_id: Uuid,
    pub rendez_vous_id: Option<Uuid>,
    pub fields: GeneralFields,
}

/// Column values written when an inspection is finalised
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizeUpdate {
    pub date_entree: Option<NaiveDate>,
    pub date_sortie: Option<NaiveDate>,
    pub travaux_a_faire: bool,
    pub description_travaux: Option<String>,
}
