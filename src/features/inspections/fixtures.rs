use chrono::Utc;
use std::sync::Arc;

use crate::features::auth::model::AuthenticatedUser;
use crate::features::inspections::models::{
    GeneralFields, InspectionRecord, NewInspection, Signature, TypeBien, TypeEtatDesLieux,
};
use crate::features::inspections::stores::{FakeInspectionStore, InspectionStore};
use crate::features::photos::{PhotoAttachment, PhotoCategory};
use crate::modules::storage::{FakeObjectStorage, ObjectStorage};
use crate::shared::validation::tiny_png_data_url;

pub fn general_fields(kind: TypeEtatDesLieux) -> GeneralFields {
    GeneralFields {
        type_etat_des_lieux: kind,
        type_bien: TypeBien::T2T3,
        adresse_bien: "8 avenue Jean Jaurès".to_string(),
        code_postal: Some("69007".to_string()),
        ville: Some("Lyon".to_string()),
        bailleur_nom: Some("SCI Les Tilleuls".to_string()),
        bailleur_adresse: None,
        locataire_nom: Some("Camille Martin".to_string()),
        locataire_email: Some("camille@example.test".to_string()),
        date_entree: None,
        date_sortie: None,
    }
}

pub fn signature(name: &str) -> Signature {
    Signature {
        image_data_url: tiny_png_data_url(),
        signer_name: name.to_string(),
        place: "Lyon".to_string(),
        signed_at: Utc::now(),
        consent: true,
    }
}

pub async fn seed_inspection(
    store: &FakeInspectionStore,
    user: &AuthenticatedUser,
    kind: TypeEtatDesLieux,
) -> InspectionRecord {
    store
        .create(NewInspection {
            user_id: user.id(),
            rendez_vous_id: None,
            fields: general_fields(kind),
        })
        .await
        .unwrap()
}

/// Upload a stored photo and return its attachment
pub async fn stored_photo(
    storage: &Arc<FakeObjectStorage>,
    path: &str,
    category: PhotoCategory,
) -> PhotoAttachment {
    let url = storage.upload(path, vec![0xFF, 0xD8], "image/jpeg").await.unwrap();
    PhotoAttachment {
        id: uuid::Uuid::new_v4(),
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        size: 2,
        content_type: "image/jpeg".to_string(),
        url,
        description: None,
        category,
        storage_path: Some(path.to_string()),
    }
}
