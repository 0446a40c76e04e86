use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::photos::PhotoCategory;
use crate::features::steps::entity::StepEntity;
use crate::features::wizard::models::WizardStep;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct OtherEquipment {
    #[validate(length(min = 1, max = 100, message = "Equipment name is required"))]
    pub nom: String,
    #[validate(length(max = 200))]
    pub etat: Option<String>,
    #[validate(length(max = 2000))]
    pub remarques: Option<String>,
}

impl StepEntity for OtherEquipment {
    const TABLE: &'static str = "autres_equipements";
    const SEGMENT: &'static str = "autres-equipements";
    const STEP: WizardStep = WizardStep::OtherEquipment;
    const LABEL: &'static str = "equipment";

    fn photo_category(&self) -> PhotoCategory {
        PhotoCategory::AutresEquipements
    }
}

/// Water heater, ventilation and other energy equipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct EnergyEquipment {
    #[validate(length(min = 1, max = 100, message = "Equipment type is required"))]
    pub type_equipement: String,
    #[validate(length(max = 100))]
    pub marque: Option<String>,
    #[validate(length(max = 200))]
    pub etat: Option<String>,
    pub date_dernier_entretien: Option<NaiveDate>,
    #[validate(length(max = 2000))]
    pub remarques: Option<String>,
}

impl StepEntity for EnergyEquipment {
    const TABLE: &'static str = "equipements_energetiques";
    const SEGMENT: &'static str = "equipements-energetiques";
    const STEP: WizardStep = WizardStep::EnergyEquipment;
    const LABEL: &'static str = "energy equipment";

    fn photo_category(&self) -> PhotoCategory {
        PhotoCategory::EquipementsEnergetiques
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct HeatingEquipment {
    #[validate(length(min = 1, max = 100, message = "Heating type is required"))]
    pub type_chauffage: String,
    #[validate(length(max = 100))]
    pub marque: Option<String>,
    #[validate(length(max = 200))]
    pub etat: Option<String>,
    pub date_dernier_entretien: Option<NaiveDate>,
    #[validate(length(max = 2000))]
    pub remarques: Option<String>,
}

impl StepEntity for HeatingEquipment {
    const TABLE: &'static str = "equipements_chauffage";
    const SEGMENT: &'static str = "equipements-chauffage";
    const STEP: WizardStep = WizardStep::HeatingEquipment;
    const LABEL: &'static str = "heating equipment";

    fn photo_category(&self) -> PhotoCategory {
        PhotoCategory::EquipementsChauffage
    }
}
