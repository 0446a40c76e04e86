use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::access::{load_editable, load_owned};
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::inspections::models::{
    GeneralFields, InspectionRecord, NewInspection, Signature, SignatureParty,
};
use crate::features::inspections::stores::InspectionStore;
use crate::features::photos::{PhotoAttachment, PhotoCategory, PhotoSet, PhotoUploader};
use crate::shared::types::PaginationQuery;

/// Photos held by one kind of child entity, gathered before a cascade delete
#[async_trait]
pub trait InspectionChildren: Send + Sync {
    fn label(&self) -> &'static str;

    async fn photos_of(&self, inspection_id: Uuid) -> Result<Vec<PhotoAttachment>>;
}

pub struct InspectionService {
    store: Arc<dyn InspectionStore>,
    uploader: Arc<PhotoUploader>,
    children: Vec<Arc<dyn InspectionChildren>>,
}

impl InspectionService {
    pub fn new(
        store: Arc<dyn InspectionStore>,
        uploader: Arc<PhotoUploader>,
        children: Vec<Arc<dyn InspectionChildren>>,
    ) -> Self {
        Self {
            store,
            uploader,
            children,
        }
    }

    pub fn store(&self) -> Arc<dyn InspectionStore> {
        self.store.clone()
    }

    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<InspectionRecord>, i64)> {
        self.store
            .list_for_user(user.id(), pagination.limit(), pagination.offset())
            .await
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: Uuid) -> Result<InspectionRecord> {
        load_owned(self.store.as_ref(), user, id).await
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        fields: GeneralFields,
        rendez_vous_id: Option<Uuid>,
    ) -> Result<InspectionRecord> {
        fields.validate().map_err(AppError::from_validation)?;

        let record = self
            .store
            .create(NewInspection {
                user_id: user.id(),
                rendez_vous_id,
                fields,
            })
            .await?;

        tracing::info!(
            "Inspection created: {} ({}, {}) by user {}",
            record.id,
            record.type_etat_des_lieux,
            record.type_bien,
            user.id()
        );
        Ok(record)
    }

    /// Persist the General step fields and the inspection's own photos
    pub async fn save_general(
        &self,
        record: &InspectionRecord,
        fields: GeneralFields,
        photos: &mut PhotoSet,
    ) -> Result<InspectionRecord> {
        fields.validate().map_err(AppError::from_validation)?;

        let store = self.store.clone();
        let id = record.id;
        let saved = self
            .uploader
            .save_with_photos(photos, id, PhotoCategory::General, Some(id), |merged| async move {
                let saved = store.update_general(id, &fields, &merged).await?;
                let persisted = saved.photos.0.clone();
                Ok((saved, persisted))
            })
            .await?;

        tracing::info!("Inspection {} general details saved", id);
        Ok(saved)
    }

    /// JSON update of the general fields. Photos can be removed or
    /// re-described here, new ones arrive through the wizard.
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        fields: GeneralFields,
        kept_photos: Option<Vec<PhotoAttachment>>,
    ) -> Result<InspectionRecord> {
        let record = load_editable(self.store.as_ref(), user, id).await?;
        let mut photos = PhotoSet::from_existing(record.photos.0.clone());
        if let Some(kept) = kept_photos {
            photos.retain_kept(&kept);
        }
        self.save_general(&record, fields, &mut photos).await
    }

    pub async fn set_signature(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        party: SignatureParty,
        signature: Signature,
    ) -> Result<InspectionRecord> {
        signature.validate().map_err(AppError::from_validation)?;
        load_editable(self.store.as_ref(), user, id).await?;

        let record = self.store.set_signature(id, party, &signature).await?;
        tracing::info!("Inspection {} signed by {} ({})", id, party, signature.signer_name);
        Ok(record)
    }

    /// Delete the inspection, its children and every stored photo they hold
    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<()> {
        let record = load_owned(self.store.as_ref(), user, id).await?;

        let mut photos = record.photos.0.clone();
        for children in &self.children {
            let child_photos = children.photos_of(id).await?;
            tracing::debug!(
                "Inspection {}: {} photos held by {}",
                id,
                child_photos.len(),
                children.label()
            );
            photos.extend(child_photos);
        }

        let removed = self.uploader.delete_photos(&photos).await;
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound(format!("Inspection {} not found", id)));
        }

        tracing::info!(
            "Inspection deleted: {} ({}/{} photos removed from storage)",
            id,
            removed,
            photos.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::inspections::fixtures::{
        general_fields, seed_inspection, signature, stored_photo,
    };
    use crate::features::inspections::models::{FinalizeUpdate, TypeEtatDesLieux};
    use crate::features::inspections::stores::FakeInspectionStore;
    use crate::features::photos::LocalPhoto;
    use crate::modules::storage::FakeObjectStorage;
    use crate::shared::test_helpers::create_test_user;

    struct StaticChildren(Vec<PhotoAttachment>);

    #[async_trait]
    impl InspectionChildren for StaticChildren {
        fn label(&self) -> &'static str {
            "pieces"
        }

        async fn photos_of(&self, _inspection_id: Uuid) -> Result<Vec<PhotoAttachment>> {
            Ok(self.0.clone())
        }
    }

    fn service_with(
        store: Arc<FakeInspectionStore>,
        storage: Arc<FakeObjectStorage>,
        children: Vec<Arc<dyn InspectionChildren>>,
    ) -> InspectionService {
        InspectionService::new(store, Arc::new(PhotoUploader::new(storage)), children)
    }

    #[tokio::test]
    async fn test_other_users_inspection_reads_as_not_found() {
        let store = Arc::new(FakeInspectionStore::default());
        let service = service_with(store.clone(), Arc::new(FakeObjectStorage::default()), vec![]);
        let owner = create_test_user();
        let record = seed_inspection(&store, &owner, TypeEtatDesLieux::Entree).await;

        assert!(service.get(&owner, record.id).await.is_ok());
        let stranger = create_test_user();
        assert!(matches!(
            service.get(&stranger, record.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(&stranger, record.id).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_update_with_kept_list_removes_photo_after_save() {
        let store = Arc::new(FakeInspectionStore::default());
        let storage = Arc::new(FakeObjectStorage::default());
        let service = service_with(store.clone(), storage.clone(), vec![]);
        let user = create_test_user();
        let record = seed_inspection(&store, &user, TypeEtatDesLieux::Entree).await;

        let facade = stored_photo(&storage, "a/general/x/1_facade.jpg", PhotoCategory::General).await;
        let mut hall = stored_photo(&storage, "a/general/x/2_hall.jpg", PhotoCategory::General).await;
        store
            .update_general(record.id, &general_fields(TypeEtatDesLieux::Entree), &[facade.clone(), hall.clone()])
            .await
            .unwrap();

        hall.description = Some("Hall d'entrée".to_string());
        let mut fields = general_fields(TypeEtatDesLieux::Entree);
        fields.ville = Some("Villeurbanne".to_string());
        let saved = service
            .update(&user, record.id, fields, Some(vec![hall.clone()]))
            .await
            .unwrap();

        assert_eq!(saved.ville.as_deref(), Some("Villeurbanne"));
        assert_eq!(saved.photos.0.len(), 1);
        assert_eq!(saved.photos.0[0].description.as_deref(), Some("Hall d'entrée"));
        assert!(!storage.contains("a/general/x/1_facade.jpg"));
        assert!(storage.contains("a/general/x/2_hall.jpg"));
    }

    #[tokio::test]
    async fn test_invalid_fields_block_before_any_write() {
        let store = Arc::new(FakeInspectionStore::default());
        let service = service_with(store.clone(), Arc::new(FakeObjectStorage::default()), vec![]);
        let user = create_test_user();
        let record = seed_inspection(&store, &user, TypeEtatDesLieux::Sortie).await;

        let mut fields = general_fields(TypeEtatDesLieux::Sortie);
        fields.adresse_bien = String::new();
        let result = service.update(&user, record.id, fields, None).await;
        assert!(matches!(result, Err(AppError::InvalidFields(_))));
        assert_eq!(store.snapshot(record.id).unwrap().updated_at, record.updated_at);
    }

    #[tokio::test]
    async fn test_signatures_rejected_once_finalised() {
        let store = Arc::new(FakeInspectionStore::default());
        let service = service_with(store.clone(), Arc::new(FakeObjectStorage::default()), vec![]);
        let user = create_test_user();
        let record = seed_inspection(&store, &user, TypeEtatDesLieux::Entree).await;

        let signed = service
            .set_signature(&user, record.id, SignatureParty::Bailleur, signature("SCI Les Tilleuls"))
            .await
            .unwrap();
        assert!(signed.signature_bailleur.is_some());
        assert!(signed.signature_locataire.is_none());

        let mut no_consent = signature("Camille Martin");
        no_consent.consent = false;
        assert!(service
            .set_signature(&user, record.id, SignatureParty::Locataire, no_consent)
            .await
            .is_err());

        store
            .finalize(
                record.id,
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
            service
                .set_signature(&user, record.id, SignatureParty::Locataire, signature("Camille Martin"))
                .await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_general_save_racing_finalize_is_rejected_and_rolled_back() {
        let store = Arc::new(FakeInspectionStore::default());
        let storage = Arc::new(FakeObjectStorage::default());
        let service = service_with(store.clone(), storage.clone(), vec![]);
        let user = create_test_user();
        let record = seed_inspection(&store, &user, TypeEtatDesLieux::Entree).await;

        let hook_store = store.clone();
        let id = record.id;
        storage.on_upload(move || hook_store.mark_finalised(id));
        let mut photos = PhotoSet::default();
        photos
            .add_local(LocalPhoto::new("facade.jpg", "image/jpeg", vec![0xFF, 0xD8]))
            .unwrap();

        let result = service
            .save_general(&record, general_fields(TypeEtatDesLieux::Entree), &mut photos)
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(storage.len(), 0);
        let stored = store.snapshot(record.id).unwrap();
        assert!(stored.photos.0.is_empty());
        assert!(matches!(
            store
                .finalize(
                    record.id,
                    &FinalizeUpdate {
                        date_entree: None,
                        date_sortie: None,
                        travaux_a_faire: false,
                        description_travaux: None,
                    },
                )
                .await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_own_and_child_photos() {
        let store = Arc::new(FakeInspectionStore::default());
        let storage = Arc::new(FakeObjectStorage::default());
        let user = create_test_user();
        let record = seed_inspection(&store, &user, TypeEtatDesLieux::Entree).await;

        let own = stored_photo(&storage, "i/general/i/1_a.jpg", PhotoCategory::General).await;
        let room = stored_photo(&storage, "i/pieces/r/1_b.jpg", PhotoCategory::Pieces).await;
        store
            .update_general(record.id, &general_fields(TypeEtatDesLieux::Entree), &[own])
            .await
            .unwrap();

        let service = service_with(
            store.clone(),
            storage.clone(),
            vec![Arc::new(StaticChildren(vec![room]))],
        );
        service.delete(&user, record.id).await.unwrap();

        assert_eq!(storage.len(), 0);
        assert_eq!(store.len(), 0);
    }
}
