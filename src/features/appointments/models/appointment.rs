use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::core::error::{AppError, Result};
use crate::features::inspections::models::{GeneralFields, TypeBien, TypeEtatDesLieux};
use crate::shared::validation::{PHONE_REGEX, POSTCODE_REGEX, TIME_REGEX};

/// Appointment status matching the `statut_rendez_vous` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "statut_rendez_vous", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Planifie,
    Realise,
    Annule,
    Reporte,
}

impl AppointmentStatus {
    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, next),
            (Planifie, Realise)
                | (Planifie, Annule)
                | (Planifie, Reporte)
                | (Reporte, Planifie)
                | (Reporte, Realise)
                | (Reporte, Annule)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Realise | AppointmentStatus::Annule)
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppointmentStatus::Planifie => write!(f, "planifie"),
            AppointmentStatus::Realise => write!(f, "realise"),
            AppointmentStatus::Annule => write!(f, "annule"),
            AppointmentStatus::Reporte => write!(f, "reporte"),
        }
    }
}

/// Database model for an appointment (`rendez_vous`)
#[derive(Debug, Clone, FromRow)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub heure: String,
    pub duree_minutes: i32,
    pub adresse: String,
    pub code_postal: Option<String>,
    pub ville: Option<String>,
    pub type_etat_des_lieux: TypeEtatDesLieux,
    /// Hyphenated form, e.g. `t2-t3`
    pub type_bien: String,
    pub contact_nom: Option<String>,
    pub contact_telephone: Option<String>,
    pub contact_email: Option<String>,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    pub etat_des_lieux_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_appointment_type_bien(value: &str) -> std::result::Result<(), ValidationError> {
    if TypeBien::from_appointment_code(value).is_some() {
        Ok(())
    } else {
        Err(ValidationError::new("type_bien").with_message("Unknown property type".into()))
    }
}

/// Editable appointment fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct AppointmentFields {
    pub date: NaiveDate,

    /// `HH:MM`, 24h
    #[validate(regex(path = *TIME_REGEX, message = "Time must be HH:MM"))]
    pub heure: String,

    #[validate(range(min = 15, max = 480, message = "Duration must be between 15 and 480 minutes"))]
    pub duree_minutes: i32,

    #[validate(length(min = 1, max = 500, message = "Address is required"))]
    pub adresse: String,

    #[validate(regex(path = *POSTCODE_REGEX, message = "Postcode must be 5 digits"))]
    pub code_postal: Option<String>,

    #[validate(length(max = 200))]
    pub ville: Option<String>,

    pub type_etat_des_lieux: TypeEtatDesLieux,

    #[validate(custom(function = "validate_appointment_type_bien"))]
    pub type_bien: String,

    #[validate(length(max = 200))]
    pub contact_nom: Option<String>,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub contact_telephone: Option<String>,

    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: Option<String>,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl Appointment {
    /// Fields of the inspection seeded from this appointment.
    /// The contact becomes the tenant.
    pub fn inspection_fields(&self) -> Result<GeneralFields> {
        let type_bien = TypeBien::from_appointment_code(&self.type_bien).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Appointment {} has an unknown property type '{}'",
                self.id, self.type_bien
            ))
        })?;

        let (date_entree, date_sortie) = match self.type_etat_des_lieux {
            TypeEtatDesLieux::Entree => (Some(self.date), None),
            TypeEtatDesLieux::Sortie => (None, Some(self.date)),
        };

        Ok(GeneralFields {
            type_etat_des_lieux: self.type_etat_des_lieux,
            type_bien,
            adresse_bien: self.adresse.clone(),
            code_postal: self.code_postal.clone(),
            ville: self.ville.clone(),
            bailleur_nom: None,
            bailleur_adresse: None,
            locataire_nom: self.contact_nom.clone(),
            locataire_email: self.contact_email.clone(),
            date_entree,
            date_sortie,
        })
    }
}
