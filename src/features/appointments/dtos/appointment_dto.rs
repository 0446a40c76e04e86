use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::appointments::models::{Appointment, AppointmentStatus};
use crate::features::inspections::dtos::InspectionResponseDto;
use crate::features::inspections::models::TypeEtatDesLieux;

/// Inclusive date window, both bounds optional
#[derive(Debug, Deserialize, IntoParams)]
pub struct AppointmentRangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusDto {
    pub status: AppointmentStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AppointmentResponseDto {
    pub id: Uuid,
    pub date: NaiveDate,
    pub heure: String,
    pub duree_minutes: i32,
    pub adresse: String,
    pub code_postal: Option<String>,
    pub ville: Option<String>,
    pub type_etat_des_lieux: TypeEtatDesLieux,
    pub type_bien: String,
    pub contact_nom: Option<String>,
    pub contact_telephone: Option<String>,
    pub contact_email: Option<String>,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    /// Inspection started from this appointment
    pub etat_des_lieux_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Appointment> for AppointmentResponseDto {
    fn from(a: Appointment) -> Self {
        Self {
            id: a.id,
            date: a.date,
            heure: a.heure,
            duree_minutes: a.duree_minutes,
            adresse: a.adresse,
            code_postal: a.code_postal,
            ville: a.ville,
            type_etat_des_lieux: a.type_etat_des_lieux,
            type_bien: a.type_bien,
            contact_nom: a.contact_nom,
            contact_telephone: a.contact_telephone,
            contact_email: a.contact_email,
            notes: a.notes,
            status: a.status,
            etat_des_lieux_id: a.etat_des_lieux_id,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConversionResponseDto {
    pub appointment: AppointmentResponseDto,
    pub inspection: InspectionResponseDto,
}
