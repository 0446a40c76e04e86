use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::inspections::services::{load_editable, load_owned};
use crate::features::inspections::{InspectionChildren, InspectionStore};
use crate::features::photos::dtos::UploadedFiles;
use crate::features::photos::{PhotoAttachment, PhotoSet, PhotoUploader};
use crate::features::steps::dtos::EntryDraftDto;
use crate::features::steps::entity::{ChildRecord, StepEntity};
use crate::features::steps::stores::ChildStore;

/// Local editing state of one child entity between saves
#[derive(Debug, Clone)]
pub struct EntityDraft<E> {
    pub id: Option<Uuid>,
    pub details: E,
    pub photos: PhotoSet,
}

impl<E: StepEntity> EntityDraft<E> {
    pub fn new(details: E) -> Self {
        Self {
            id: None,
            details,
            photos: PhotoSet::default(),
        }
    }

    pub fn from_record(record: &ChildRecord<E>) -> Self {
        Self {
            id: Some(record.id),
            details: record.details.clone(),
            photos: PhotoSet::from_existing(record.photos.clone()),
        }
    }

    /// Resynchronise from the record the server confirmed
    fn sync(&mut self, record: &ChildRecord<E>) {
        self.id = Some(record.id);
        self.details = record.details.clone();
    }
}

/// CRUD for one kind of child entity, scoped to inspections the caller owns
pub struct StepService<E: StepEntity> {
    store: Arc<dyn ChildStore<E>>,
    inspections: Arc<dyn InspectionStore>,
    uploader: Arc<PhotoUploader>,
}

impl<E: StepEntity> StepService<E> {
    pub fn new(
        store: Arc<dyn ChildStore<E>>,
        inspections: Arc<dyn InspectionStore>,
        uploader: Arc<PhotoUploader>,
    ) -> Self {
        Self {
            store,
            inspections,
            uploader,
        }
    }

    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        inspection_id: Uuid,
    ) -> Result<Vec<ChildRecord<E>>> {
        load_owned(self.inspections.as_ref(), user, inspection_id).await?;
        self.store.list(inspection_id).await
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        inspection_id: Uuid,
        details: E,
    ) -> Result<ChildRecord<E>> {
        details.validate().map_err(AppError::from_validation)?;
        load_editable(self.inspections.as_ref(), user, inspection_id).await?;

        let mut draft = EntityDraft::new(details);
        self.save_draft(inspection_id, &mut draft).await
    }

    /// Update fields. `kept_photos` drops the existing photos it omits.
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        details: E,
        kept_photos: Option<Vec<PhotoAttachment>>,
    ) -> Result<ChildRecord<E>> {
        details.validate().map_err(AppError::from_validation)?;
        let record = self.editable_record(user, id).await?;

        let mut draft = EntityDraft::from_record(&record);
        draft.details = details;
        if let Some(kept) = kept_photos {
            draft.photos.retain_kept(&kept);
        }
        self.save_draft(record.inspection_id, &mut draft).await
    }

    /// Remove the row, then its stored photos
    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<()> {
        let record = self.editable_record(user, id).await?;

        if !self.store.delete(id).await? {
            return Err(AppError::NotFound(format!("{} {} not found", E::LABEL, id)));
        }
        let removed = self.uploader.delete_photos(&record.photos).await;

        tracing::info!(
            "Deleted {} {} of inspection {} ({} photos removed)",
            E::LABEL,
            id,
            record.inspection_id,
            removed
        );
        Ok(())
    }

    /// Upload new photos, upsert the row with the merged list and
    /// resynchronise `draft` from the confirmed record.
    pub async fn save_draft(
        &self,
        inspection_id: Uuid,
        draft: &mut EntityDraft<E>,
    ) -> Result<ChildRecord<E>> {
        draft.details.validate().map_err(AppError::from_validation)?;

        let store = self.store.clone();
        let details = draft.details.clone();
        let id = draft.id;
        let record = self
            .uploader
            .save_with_photos(
                &mut draft.photos,
                inspection_id,
                details.photo_category(),
                id,
                |merged| async move {
                    let record = match id {
                        Some(id) => store.update(id, &details, &merged).await?,
                        None => store.insert(inspection_id, &details, &merged).await?,
                    };
                    let persisted = record.photos.clone();
                    Ok((record, persisted))
                },
            )
            .await?;

        draft.sync(&record);
        tracing::info!(
            "Saved {} {} of inspection {} ({} photos)",
            E::LABEL,
            record.id,
            inspection_id,
            record.photos.len()
        );
        Ok(record)
    }

    /// Build drafts for a submitted collection. Ids must belong to the
    /// inspection. Referenced file parts become new local photos.
    pub async fn drafts_from_payload(
        &self,
        inspection_id: Uuid,
        entries: Vec<EntryDraftDto<E>>,
        files: &mut UploadedFiles,
    ) -> Result<Vec<EntityDraft<E>>> {
        let existing: HashMap<Uuid, ChildRecord<E>> = self
            .store
            .list(inspection_id)
            .await?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();

        entries
            .into_iter()
            .map(|entry| {
                let mut draft = match entry.id {
                    Some(id) => {
                        let record = existing.get(&id).ok_or_else(|| {
                            AppError::NotFound(format!("{} {} not found", E::LABEL, id))
                        })?;
                        let mut draft = EntityDraft::from_record(record);
                        draft.details = entry.details;
                        draft
                    }
                    None => EntityDraft::new(entry.details),
                };
                if let Some(kept) = entry.photos {
                    draft.photos.retain_kept(&kept);
                }
                for photo in files.take_photos(&entry.new_photos)? {
                    draft.photos.add_local(photo)?;
                }
                Ok(draft)
            })
            .collect()
    }

    /// Ownership and finalisation are both decided by the parent inspection
    async fn editable_record(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ChildRecord<E>> {
        let record = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", E::LABEL, id)))?;
        load_editable(self.inspections.as_ref(), user, record.inspection_id).await?;
        Ok(record)
    }
}

#[async_trait]
impl<E: StepEntity> InspectionChildren for StepService<E> {
    fn label(&self) -> &'static str {
        E::TABLE
    }

    async fn photos_of(&self, inspection_id: Uuid) -> Result<Vec<PhotoAttachment>> {
        Ok(self
            .store
            .list(inspection_id)
            .await?
            .into_iter()
            .flat_map(|r| r.photos)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::inspections::fixtures::seed_inspection;
    use crate::features::inspections::models::{FinalizeUpdate, TypeEtatDesLieux};
    use crate::features::inspections::stores::FakeInspectionStore;
    use crate::features::photos::dtos::{NewPhotoRefDto, UploadedFile};
    use crate::features::photos::LocalPhoto;
    use crate::features::steps::models::RoomEntry;
    use crate::features::steps::stores::FakeChildStore;
    use crate::modules::storage::FakeObjectStorage;
    use crate::shared::test_helpers::create_test_user;
    use std::sync::atomic::Ordering;

    struct Harness {
        inspections: Arc<FakeInspectionStore>,
        rooms: Arc<FakeChildStore<RoomEntry>>,
        storage: Arc<FakeObjectStorage>,
        service: StepService<RoomEntry>,
    }

    fn harness() -> Harness {
        let inspections = Arc::new(FakeInspectionStore::default());
        let rooms = Arc::new(FakeChildStore::<RoomEntry>::tracking(inspections.clone()));
        let storage = Arc::new(FakeObjectStorage::default());
        let service = StepService::new(
            rooms.clone(),
            inspections.clone(),
            Arc::new(PhotoUploader::new(storage.clone())),
        );
        Harness {
            inspections,
            rooms,
            storage,
            service,
        }
    }

    fn room(nom: &str) -> RoomEntry {
        RoomEntry {
            nom: nom.to_string(),
            sols: Some("Parquet, bon état".to_string()),
            murs: Some("Peinture blanche, traces au-dessus du radiateur".to_string()),
            plafond: None,
            portes: None,
            fenetres: Some("Double vitrage".to_string()),
            electricite: None,
            chauffage: None,
            etat_general: Some("bon".to_string()),
            remarques: None,
        }
    }

    fn jpeg(name: &str, description: &str) -> LocalPhoto {
        LocalPhoto::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF])
            .with_description(Some(description.to_string()))
    }

    #[tokio::test]
    async fn test_saving_unchanged_draft_again_creates_no_duplicates() {
        let h = harness();
        let user = create_test_user();
        let inspection = seed_inspection(&h.inspections, &user, TypeEtatDesLieux::Entree).await;

        let mut draft = EntityDraft::new(room("Salon"));
        draft.photos.add_local(jpeg("salon.jpg", "Vue d'ensemble")).unwrap();
        let first = h.service.save_draft(inspection.id, &mut draft).await.unwrap();
        let second = h.service.save_draft(inspection.id, &mut draft).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.photos, second.photos);
        assert_eq!(h.rooms.len(), 1);
        assert_eq!(h.rooms.inserts.load(Ordering::SeqCst), 1);
        assert_eq!(h.rooms.updates.load(Ordering::SeqCst), 1);
        assert_eq!(h.storage.len(), 1);
    }

    #[tokio::test]
    async fn test_save_then_reload_reproduces_fields_and_descriptions() {
        let h = harness();
        let user = create_test_user();
        let inspection = seed_inspection(&h.inspections, &user, TypeEtatDesLieux::Entree).await;

        let mut draft = EntityDraft::new(room("Chambre 1"));
        draft.photos.add_local(jpeg("mur.jpg", "Trou de cheville")).unwrap();
        let saved = h.service.save_draft(inspection.id, &mut draft).await.unwrap();

        let mut kept = saved.photos.clone();
        kept[0].description = Some("Trou de cheville rebouché".to_string());
        let mut details = room("Chambre 1");
        details.remarques = Some("Odeur de tabac".to_string());
        h.service
            .update(&user, saved.id, details.clone(), Some(kept))
            .await
            .unwrap();

        let reloaded = h.service.list(&user, inspection.id).await.unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].details, details);
        assert_eq!(
            reloaded[0].photos[0].description.as_deref(),
            Some("Trou de cheville rebouché")
        );
        assert_eq!(reloaded[0].photos[0].url, saved.photos[0].url);
    }

    #[tokio::test]
    async fn test_delete_removes_photos_from_storage_and_list() {
        let h = harness();
        let user = create_test_user();
        let inspection = seed_inspection(&h.inspections, &user, TypeEtatDesLieux::Sortie).await;

        let mut kitchen = EntityDraft::new(room("Cuisine"));
        kitchen.photos.add_local(jpeg("evier.jpg", "Évier")).unwrap();
        kitchen.photos.add_local(jpeg("four.jpg", "Four")).unwrap();
        let kitchen = h.service.save_draft(inspection.id, &mut kitchen).await.unwrap();
        let mut bath = EntityDraft::new(room("Salle de bain"));
        bath.photos.add_local(jpeg("douche.jpg", "Douche")).unwrap();
        h.service.save_draft(inspection.id, &mut bath).await.unwrap();
        assert_eq!(h.storage.len(), 3);

        h.service.delete(&user, kitchen.id).await.unwrap();

        let remaining = h.service.list(&user, inspection.id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].details.nom, "Salle de bain");
        assert_eq!(h.storage.len(), 1);
        for photo in &kitchen.photos {
            assert!(!h.storage.contains(photo.storage_path.as_ref().unwrap()));
        }
    }

    #[tokio::test]
    async fn test_new_entry_photos_use_new_segment_then_entity_id() {
        let h = harness();
        let user = create_test_user();
        let inspection = seed_inspection(&h.inspections, &user, TypeEtatDesLieux::Entree).await;

        let mut draft = EntityDraft::new(room("Entrée"));
        draft.photos.add_local(jpeg("a.jpg", "a")).unwrap();
        let saved = h.service.save_draft(inspection.id, &mut draft).await.unwrap();
        let first_path = saved.photos[0].storage_path.clone().unwrap();
        assert!(first_path.starts_with(&format!("{}/pieces/new/", inspection.id)));

        draft.photos.add_local(jpeg("b.jpg", "b")).unwrap();
        let saved = h.service.save_draft(inspection.id, &mut draft).await.unwrap();
        let second_path = saved.photos[1].storage_path.clone().unwrap();
        assert!(second_path.starts_with(&format!("{}/pieces/{}/", inspection.id, saved.id)));
    }

    #[tokio::test]
    async fn test_failed_upsert_leaves_no_orphan_objects() {
        let h = harness();
        let user = create_test_user();
        let inspection = seed_inspection(&h.inspections, &user, TypeEtatDesLieux::Entree).await;
        h.rooms.fail_writes.store(true, Ordering::SeqCst);

        let mut draft = EntityDraft::new(room("Cellier"));
        draft.photos.add_local(jpeg("c.jpg", "c")).unwrap();
        assert!(h.service.save_draft(inspection.id, &mut draft).await.is_err());

        assert_eq!(h.storage.len(), 0);
        assert_eq!(h.rooms.len(), 0);
        assert!(draft.id.is_none());
        assert_eq!(draft.photos.new_local().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_details_fail_before_upload() {
        let h = harness();
        let user = create_test_user();
        let inspection = seed_inspection(&h.inspections, &user, TypeEtatDesLieux::Entree).await;

        let mut draft = EntityDraft::new(room(""));
        draft.photos.add_local(jpeg("x.jpg", "x")).unwrap();
        let result = h.service.save_draft(inspection.id, &mut draft).await;

        assert!(matches!(result, Err(AppError::InvalidFields(_))));
        assert_eq!(h.storage.upload_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_entries_of_other_users_read_as_missing() {
        let h = harness();
        let owner = create_test_user();
        let inspection = seed_inspection(&h.inspections, &owner, TypeEtatDesLieux::Entree).await;
        let record = h.service.create(&owner, inspection.id, room("Bureau")).await.unwrap();

        let stranger = create_test_user();
        assert!(matches!(
            h.service.list(&stranger, inspection.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            h.service.update(&stranger, record.id, room("Volé"), None).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            h.service.delete(&stranger, record.id).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(h.rooms.len(), 1);
    }

    #[tokio::test]
    async fn test_finalised_inspection_rejects_child_changes() {
        let h = harness();
        let user = create_test_user();
        let inspection = seed_inspection(&h.inspections, &user, TypeEtatDesLieux::Entree).await;
        let record = h.service.create(&user, inspection.id, room("Salon")).await.unwrap();
        h.inspections
            .finalize(
                inspection.id,
                &FinalizeUpdate {
                    date_entree: None,
                    date_sortie: None,
                    travaux_a_faire: false,
                    description_travaux: None,
                },
            )
            .await
            .unwrap();

        assert!(matches!(
            h.service.create(&user, inspection.id, room("Cave")).await,
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            h.service.delete(&user, record.id).await,
            Err(AppError::Conflict(_))
        ));
        // Reading stays allowed
        assert_eq!(h.service.list(&user, inspection.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_finalize_landing_during_upload_rejects_the_write() {
        let h = harness();
        let user = create_test_user();
        let inspection = seed_inspection(&h.inspections, &user, TypeEtatDesLieux::Entree).await;
        let record = h.service.create(&user, inspection.id, room("Salon")).await.unwrap();

        // Finalised while the photo is uploading
        let mut draft = EntityDraft::from_record(&record);
        draft.details.remarques = Some("Ajout tardif".to_string());
        draft.photos.add_local(jpeg("tard.jpg", "Prise après signature")).unwrap();
        let inspections = h.inspections.clone();
        let inspection_id = inspection.id;
        h.storage.on_upload(move || inspections.mark_finalised(inspection_id));

        let result = h.service.save_draft(inspection.id, &mut draft).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        let stored = h.rooms.get(record.id).await.unwrap().unwrap();
        assert_eq!(stored.details.remarques, None);
        assert!(stored.photos.is_empty());
        // The uploaded object was rolled back
        assert_eq!(h.storage.len(), 0);
        assert!(matches!(
            h.rooms.insert(inspection.id, &room("Cave"), &[]).await,
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(h.rooms.delete(record.id).await, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_drafts_from_payload() {
        let h = harness();
        let user = create_test_user();
        let inspection = seed_inspection(&h.inspections, &user, TypeEtatDesLieux::Entree).await;
        let existing = h.service.create(&user, inspection.id, room("Salon")).await.unwrap();

        let mut files = UploadedFiles::default();
        files.insert(
            "photo0".to_string(),
            UploadedFile {
                file_name: "wc.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                data: vec![0xFF, 0xD8],
            },
        )
        .unwrap();
        let entries = vec![
            EntryDraftDto {
                id: Some(existing.id),
                details: room("Salon"),
                photos: None,
                new_photos: vec![],
            },
            EntryDraftDto {
                id: None,
                details: room("WC"),
                photos: None,
                new_photos: vec![NewPhotoRefDto {
                    field: "photo0".to_string(),
                    description: Some("Chasse d'eau".to_string()),
                }],
            },
        ];
        let drafts = h
            .service
            .drafts_from_payload(inspection.id, entries, &mut files)
            .await
            .unwrap();
        assert_eq!(drafts[0].id, Some(existing.id));
        assert_eq!(drafts[1].id, None);
        assert_eq!(drafts[1].photos.new_local().len(), 1);

        // An id from another inspection is refused
        let foreign = vec![EntryDraftDto {
            id: Some(Uuid::new_v4()),
            details: room("Salon"),
            photos: None,
            new_photos: vec![],
        }];
        assert!(matches!(
            h.service
                .drafts_from_payload(inspection.id, foreign, &mut UploadedFiles::default())
                .await,
            Err(AppError::NotFound(_))
        ));
    }
}
