use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::photos::PhotoCategory;
use crate::features::steps::entity::StepEntity;
use crate::features::wizard::models::WizardStep;

/// Condition of one room, surface by surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct RoomEntry {
    #[validate(length(min = 1, max = 100, message = "Room name is required"))]
    pub nom: String,
    #[validate(length(max = 1000))]
    pub sols: Option<String>,
    #[validate(length(max = 1000))]
    pub murs: Option<String>,
    #[validate(length(max = 1000))]
    pub plafond: Option<String>,
    #[validate(length(max = 1000))]
    pub portes: Option<String>,
    #[validate(length(max = 1000))]
    pub fenetres: Option<String>,
    #[validate(length(max = 1000))]
    pub electricite: Option<String>,
    #[validate(length(max = 1000))]
    pub chauffage: Option<String>,
    #[validate(length(max = 200))]
    pub etat_general: Option<String>,
    #[validate(length(max = 2000))]
    pub remarques: Option<String>,
}

impl StepEntity for RoomEntry {
    const TABLE: &'static str = "pieces";
    const SEGMENT: &'static str = "pieces";
    const STEP: WizardStep = WizardStep::Rooms;
    const LABEL: &'static str = "room";

    fn photo_category(&self) -> PhotoCategory {
        PhotoCategory::Pieces
    }
}
