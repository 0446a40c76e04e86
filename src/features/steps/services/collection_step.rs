use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::step_service::{EntityDraft, StepService};
use crate::core::error::{AppError, Result};
use crate::features::steps::entity::{ChildRecord, StepEntity};
use crate::features::wizard::models::WizardStep;
use crate::features::wizard::saveable::Saveable;

/// Wizard page editing a list of child entities.
///
/// `save` validates every entry before touching storage, then saves the
/// entries in order. Each saved entry keeps its confirmed id, so saving
/// again updates rows instead of inserting duplicates.
pub struct CollectionStep<E: StepEntity> {
    service: Arc<StepService<E>>,
    inspection_id: Uuid,
    entries: Vec<EntityDraft<E>>,
    saved: Vec<ChildRecord<E>>,
}

impl<E: StepEntity> CollectionStep<E> {
    pub fn new(service: Arc<StepService<E>>, inspection_id: Uuid, entries: Vec<EntityDraft<E>>) -> Self {
        Self {
            service,
            inspection_id,
            entries,
            saved: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[EntityDraft<E>] {
        &self.entries
    }

    /// Records confirmed by the last successful save
    pub fn saved(&self) -> &[ChildRecord<E>] {
        &self.saved
    }

    fn validate_all(&self) -> Result<()> {
        let mut messages = Vec::new();
        for (index, entry) in self.entries.iter().enumerate() {
            if let Err(errors) = entry.details.validate() {
                if let AppError::InvalidFields(fields) = AppError::from_validation(errors) {
                    messages.extend(
                        fields
                            .into_iter()
                            .map(|m| format!("{}[{}].{}", E::SEGMENT, index, m)),
                    );
                }
            }
        }
        if messages.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidFields(messages))
        }
    }
}

#[async_trait]
impl<E: StepEntity> Saveable for CollectionStep<E> {
    fn step(&self) -> WizardStep {
        E::STEP
    }

    async fn save(&mut self) -> Result<()> {
        self.validate_all()?;

        let mut saved = Vec::with_capacity(self.entries.len());
        for entry in self.entries.iter_mut() {
            saved.push(self.service.save_draft(self.inspection_id, entry).await?);
        }
        self.saved = saved;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::inspections::fixtures::seed_inspection;
    use crate::features::inspections::models::TypeEtatDesLieux;
    use crate::features::inspections::stores::FakeInspectionStore;
    use crate::features::photos::{LocalPhoto, PhotoUploader};
    use crate::features::steps::models::{KeySet, MeterReading, MeterType};
    use crate::features::steps::stores::FakeChildStore;
    use crate::modules::storage::FakeObjectStorage;
    use crate::shared::test_helpers::create_test_user;
    use std::sync::atomic::Ordering;

    fn keys(type_cle: &str, nombre: i32) -> KeySet {
        KeySet {
            type_cle: type_cle.to_string(),
            nombre,
            remarques: None,
        }
    }

    #[tokio::test]
    async fn test_step_save_is_idempotent() {
        let inspections = Arc::new(FakeInspectionStore::default());
        let store = Arc::new(FakeChildStore::<KeySet>::default());
        let storage = Arc::new(FakeObjectStorage::default());
        let service = Arc::new(StepService::new(
            store.clone(),
            inspections.clone(),
            Arc::new(PhotoUploader::new(storage.clone())),
        ));
        let user = create_test_user();
        let inspection = seed_inspection(&inspections, &user, TypeEtatDesLieux::Entree).await;

        let mut door = EntityDraft::new(keys("Porte d'entrée", 3));
        door.photos
            .add_local(LocalPhoto::new("cles.jpg", "image/jpeg", vec![1, 2, 3]))
            .unwrap();
        let mut step = CollectionStep::new(
            service.clone(),
            inspection.id,
            vec![door, EntityDraft::new(keys("Boîte aux lettres", 1))],
        );
        assert_eq!(step.step(), WizardStep::Keys);

        step.save().await.unwrap();
        let first: Vec<Uuid> = step.saved().iter().map(|r| r.id).collect();
        step.save().await.unwrap();
        let second: Vec<Uuid> = step.saved().iter().map(|r| r.id).collect();

        assert_eq!(first, second);
        assert_eq!(store.len(), 2);
        assert_eq!(storage.len(), 1);
        assert!(step.entries().iter().all(|e| e.id.is_some()));
    }

    #[tokio::test]
    async fn test_one_invalid_entry_blocks_the_whole_step() {
        let inspections = Arc::new(FakeInspectionStore::default());
        let store = Arc::new(FakeChildStore::<MeterReading>::default());
        let service = Arc::new(StepService::new(
            store.clone(),
            inspections.clone(),
            Arc::new(PhotoUploader::new(Arc::new(FakeObjectStorage::default()))),
        ));
        let user = create_test_user();
        let inspection = seed_inspection(&inspections, &user, TypeEtatDesLieux::Sortie).await;

        let reading = |index: &str| MeterReading {
            type_compteur: MeterType::Electricite,
            numero_compteur: None,
            index_releve: index.to_string(),
            index_heures_creuses: None,
            remarques: None,
        };
        let mut step = CollectionStep::new(
            service,
            inspection.id,
            vec![
                EntityDraft::new(reading("1520")),
                EntityDraft::new(reading("quinze")),
            ],
        );

        match step.save().await {
            Err(AppError::InvalidFields(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].starts_with("compteurs[1].index_releve"));
            }
            other => panic!("expected validation failure, got {:?}", other.err()),
        }
        assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    }
}
