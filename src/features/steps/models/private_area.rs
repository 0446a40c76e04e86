use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::photos::PhotoCategory;
use crate::features::steps::entity::StepEntity;
use crate::features::wizard::models::WizardStep;

/// Cellar, parking space, garden and similar private areas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct PrivateArea {
    #[validate(length(min = 1, max = 100, message = "Area type is required"))]
    pub type_partie: String,
    #[validate(length(max = 50))]
    pub numero: Option<String>,
    #[validate(length(max = 200))]
    pub etat: Option<String>,
    #[validate(length(max = 2000))]
    pub remarques: Option<String>,
}

impl StepEntity for PrivateArea {
    const TABLE: &'static str = "parties_privatives";
    const SEGMENT: &'static str = "parties-privatives";
    const STEP: WizardStep = WizardStep::PrivateAreas;
    const LABEL: &'static str = "private area";

    fn photo_category(&self) -> PhotoCategory {
        PhotoCategory::PartiesPrivatives
    }
}
