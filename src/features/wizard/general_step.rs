use async_trait::async_trait;
use std::sync::Arc;

use super::models::WizardStep;
use super::saveable::Saveable;
use crate::core::error::Result;
use crate::features::inspections::models::{GeneralFields, InspectionRecord};
use crate::features::inspections::InspectionService;
use crate::features::photos::PhotoSet;

/// First wizard page: property, parties and the inspection's own photos
pub struct GeneralStep {
    service: Arc<InspectionService>,
    record: InspectionRecord,
    fields: GeneralFields,
    photos: PhotoSet,
}

impl GeneralStep {
    pub fn new(
        service: Arc<InspectionService>,
        record: InspectionRecord,
        fields: GeneralFields,
        photos: PhotoSet,
    ) -> Self {
        Self {
            service,
            record,
            fields,
            photos,
        }
    }
}

#[async_trait]
impl Saveable for GeneralStep {
    fn step(&self) -> WizardStep {
        WizardStep::General
    }

    async fn save(&mut self) -> Result<()> {
        let saved = self
            .service
            .save_general(&self.record, self.fields.clone(), &mut self.photos)
            .await?;
        self.fields = saved.general_fields();
        self.record = saved;
        Ok(())
    }
}
