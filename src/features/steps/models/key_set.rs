use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::photos::PhotoCategory;
use crate::features::steps::entity::StepEntity;
use crate::features::wizard::models::WizardStep;

/// Keys handed over, grouped by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct KeySet {
    #[validate(length(min = 1, max = 100, message = "Key type is required"))]
    pub type_cle: String,

    #[validate(range(min = 0, max = 999, message = "Number of keys cannot be negative"))]
    pub nombre: i32,

    #[validate(length(max = 2000))]
    pub remarques: Option<String>,
}

impl StepEntity for KeySet {
    const TABLE: &'static str = "cles";
    const SEGMENT: &'static str = "cles";
    const STEP: WizardStep = WizardStep::Keys;
    const LABEL: &'static str = "key set";

    fn photo_category(&self) -> PhotoCategory {
        PhotoCategory::Cles
    }
}
