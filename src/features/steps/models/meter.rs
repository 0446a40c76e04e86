use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::photos::PhotoCategory;
use crate::features::steps::entity::StepEntity;
use crate::features::wizard::models::WizardStep;
use crate::shared::validation::validate_meter_index;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MeterType {
    Electricite,
    Gaz,
    Eau,
}

/// Utility meter reading (relevé de compteur)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct MeterReading {
    pub type_compteur: MeterType,

    #[validate(length(max = 50))]
    pub numero_compteur: Option<String>,

    /// Index as typed by the agent, `,` or `.` as decimal separator
    #[validate(custom(function = "validate_meter_index"))]
    pub index_releve: String,

    /// Off-peak index for dual-rate electricity meters
    #[validate(custom(function = "validate_meter_index"))]
    pub index_heures_creuses: Option<String>,

    #[validate(length(max = 2000))]
    pub remarques: Option<String>,
}

impl StepEntity for MeterReading {
    const TABLE: &'static str = "releves_compteurs";
    const SEGMENT: &'static str = "compteurs";
    const STEP: WizardStep = WizardStep::Meters;
    const LABEL: &'static str = "meter reading";

    fn photo_category(&self) -> PhotoCategory {
        match self.type_compteur {
            MeterType::Electricite => PhotoCategory::Electricite,
            MeterType::Gaz => PhotoCategory::Gaz,
            MeterType::Eau => PhotoCategory::Eau,
        }
    }
}
