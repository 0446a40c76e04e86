use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::inspections::models::{GeneralFields, StatutEtatDesLieux};
use crate::features::photos::dtos::NewPhotoRefDto;
use crate::features::photos::PhotoAttachment;
use crate::features::wizard::models::{Notification, WizardStep};

/// `payload` part of a `wizard/next` request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StepPayloadDto {
    /// Step the client believes is active, checked against the server
    pub step: WizardStep,
    /// Step data: `GeneralStepDto` for `general`, `{ "entries": [...] }` otherwise
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GeneralStepDto {
    #[validate(nested)]
    pub general: GeneralFields,
    /// Existing photos to keep with their descriptions. Omit to keep all.
    pub photos: Option<Vec<PhotoAttachment>>,
    #[serde(default)]
    pub new_photos: Vec<NewPhotoRefDto>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct FinalizeRequestDto {
    /// Confirmation checkbox on the Finalize page
    pub confirmed: bool,
    /// Second confirmation in the modal dialog
    pub confirmed_again: bool,
    #[serde(default)]
    pub travaux_a_faire: bool,
    #[validate(length(max = 2000))]
    pub description_travaux: Option<String>,
    /// Keep an exit date already set instead of stamping today
    #[serde(default)]
    pub preserve_date_sortie: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WizardStateDto {
    pub inspection_id: Uuid,
    pub current_step: WizardStep,
    pub step_index: usize,
    pub step_count: usize,
    pub title: String,
    pub statut: StatutEtatDesLieux,
    pub has_signature_bailleur: bool,
    pub has_signature_locataire: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WizardTransitionDto {
    pub state: WizardStateDto,
    pub notifications: Vec<Notification>,
}
