use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::photos::lifecycle::PhotoSet;
use crate::features::photos::models::{LocalPhoto, PhotoAttachment, PhotoCategory};
use crate::modules::storage::ObjectStorage;
use crate::shared::constants::{NEW_ENTITY_SEGMENT, PHOTO_RANDOM_SUFFIX_LEN};

/// Uploads, merges and deletes the photos of one entity around its upsert
pub struct PhotoUploader {
    storage: Arc<dyn ObjectStorage>,
}

impl PhotoUploader {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self { storage }
    }

    /// `{inspection}/{category}/{entity|new}/{timestamp}_{random}.{ext}`
    pub fn storage_path(
        inspection_id: Uuid,
        category: PhotoCategory,
        entity_id: Option<Uuid>,
        file_name: &str,
        content_type: &str,
    ) -> String {
        let entity = entity_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| NEW_ENTITY_SEGMENT.to_string());
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(PHOTO_RANDOM_SUFFIX_LEN)
            .map(|c| char::from(c).to_ascii_lowercase())
            .collect();
        format!(
            "{}/{}/{}/{}_{}.{}",
            inspection_id,
            category,
            entity,
            Utc::now().timestamp_millis(),
            suffix,
            photo_extension(content_type, file_name)
        )
    }

    /// Storage path of a persisted attachment, falling back to its URL
    pub fn path_of(&self, photo: &PhotoAttachment) -> Option<String> {
        photo
            .storage_path
            .clone()
            .or_else(|| self.storage.path_from_url(&photo.url))
    }

    async fn upload_all(
        &self,
        inspection_id: Uuid,
        category: PhotoCategory,
        entity_id: Option<Uuid>,
        photos: Vec<LocalPhoto>,
    ) -> Result<Vec<PhotoAttachment>> {
        let mut uploaded = Vec::with_capacity(photos.len());
        for photo in photos {
            let path = Self::storage_path(
                inspection_id,
                category,
                entity_id,
                &photo.file_name,
                &photo.content_type,
            );
            let size = photo.data.len() as i64;
            match self.storage.upload(&path, photo.data, &photo.content_type).await {
                Ok(url) => {
                    debug!("Uploaded photo '{}' to '{}'", photo.file_name, path);
                    uploaded.push(PhotoAttachment {
                        id: Uuid::new_v4(),
                        name: photo.file_name,
                        size,
                        content_type: photo.content_type,
                        url,
                        description: photo.description,
                        category,
                        storage_path: Some(path),
                    });
                }
                Err(e) => {
                    self.remove_uploaded(&uploaded).await;
                    return Err(e);
                }
            }
        }
        Ok(uploaded)
    }

    async fn remove_uploaded(&self, uploaded: &[PhotoAttachment]) {
        if uploaded.is_empty() {
            return;
        }
        let paths: Vec<String> = uploaded.iter().filter_map(|p| self.path_of(p)).collect();
        let removed = self.storage.delete_best_effort(&paths).await;
        warn!("Rolled back {}/{} uploaded photos", removed, paths.len());
    }

    /// Save an entity together with its photos.
    ///
    /// New photos are uploaded first, then `upsert` receives the merged list
    /// and returns the confirmed value with the photo list it persisted.
    /// Objects of removed photos are deleted only after `upsert` succeeded.
    /// If anything fails, objects uploaded here are deleted again and `set`
    /// keeps its pending changes.
    pub async fn save_with_photos<T, F, Fut>(
        &self,
        set: &mut PhotoSet,
        inspection_id: Uuid,
        category: PhotoCategory,
        entity_id: Option<Uuid>,
        upsert: F,
    ) -> Result<T>
    where
        F: FnOnce(Vec<PhotoAttachment>) -> Fut,
        Fut: Future<Output = Result<(T, Vec<PhotoAttachment>)>>,
    {
        let batch = set.begin_upload();
        let uploaded = match self.upload_all(inspection_id, category, entity_id, batch).await {
            Ok(uploaded) => uploaded,
            Err(e) => {
                set.abort_upload();
                return Err(e);
            }
        };

        let merged = set.merged(&uploaded);
        let (confirmed, persisted) = match upsert(merged).await {
            Ok(result) => result,
            Err(e) => {
                self.remove_uploaded(&uploaded).await;
                set.abort_upload();
                return Err(e);
            }
        };

        let removed = set.commit(persisted);
        self.delete_photos(&removed).await;
        Ok(confirmed)
    }

    /// Best-effort removal of stored objects, failures are logged
    pub async fn delete_photos(&self, photos: &[PhotoAttachment]) -> usize {
        if photos.is_empty() {
            return 0;
        }
        let paths: Vec<String> = photos
            .iter()
            .filter_map(|p| {
                let path = self.path_of(p);
                if path.is_none() {
                    warn!("Photo {} has no resolvable storage path, skipping delete", p.id);
                }
                path
            })
            .collect();
        self.storage.delete_best_effort(&paths).await
    }
}

/// File extension from the content type, then the file name, then `bin`
pub fn photo_extension(content_type: &str, file_name: &str) -> String {
    let known = match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        "image/heif" => Some("heif"),
        _ => None,
    };
    known
        .map(str::to_string)
        .or_else(|| {
            file_name
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_ascii_lowercase())
                .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        })
        .unwrap_or_else(|| "bin".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::modules::storage::FakeObjectStorage;
    use std::sync::atomic::Ordering;

    fn jpeg(name: &str) -> LocalPhoto {
        LocalPhoto::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
    }

    #[test]
    fn test_storage_path_layout() {
        let inspection_id = Uuid::new_v4();
        let path = PhotoUploader::storage_path(
            inspection_id,
            PhotoCategory::Pieces,
            None,
            "salon.JPG",
            "image/jpeg",
        );
        let parts: Vec<&str> = path.split('/').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], inspection_id.to_string());
        assert_eq!(parts[1], "pieces");
        assert_eq!(parts[2], "new");

        let (stem, ext) = parts[3].split_once('.').unwrap();
        assert_eq!(ext, "jpg");
        let (timestamp, random) = stem.split_once('_').unwrap();
        assert!(timestamp.parse::<i64>().is_ok());
        assert_eq!(random.len(), PHOTO_RANDOM_SUFFIX_LEN);

        let entity_id = Uuid::new_v4();
        let path = PhotoUploader::storage_path(
            inspection_id,
            PhotoCategory::Gaz,
            Some(entity_id),
            "x.heic",
            "image/heic",
        );
        assert!(path.contains(&format!("/gaz/{}/", entity_id)));
    }

    #[test]
    fn test_photo_extension_fallbacks() {
        assert_eq!(photo_extension("image/png", "a.jpeg"), "png");
        assert_eq!(photo_extension("application/octet-stream", "a.JPEG"), "jpeg");
        assert_eq!(photo_extension("application/octet-stream", "noext"), "bin");
    }

    #[tokio::test]
    async fn test_save_uploads_before_upsert_and_deletes_removed_after() {
        let storage = Arc::new(FakeObjectStorage::default());
        let uploader = PhotoUploader::new(storage.clone());
        let inspection_id = Uuid::new_v4();

        // First save stores two photos
        let mut set = PhotoSet::default();
        set.add_local(jpeg("a.jpg")).unwrap();
        set.add_local(jpeg("b.jpg")).unwrap();
        let saved: Vec<PhotoAttachment> = uploader
            .save_with_photos(&mut set, inspection_id, PhotoCategory::Cles, None, |merged| async move {
                Ok((merged.clone(), merged))
            })
            .await
            .unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(storage.len(), 2);

        // Second save removes one, and the upsert sees the object still stored
        let removed = saved[0].clone();
        let removed_path = removed.storage_path.clone().unwrap();
        set.mark_for_removal(removed.id);
        let bucket = storage.clone();
        let still_there = removed_path.clone();
        uploader
            .save_with_photos(&mut set, inspection_id, PhotoCategory::Cles, None, |merged| async move {
                assert!(bucket.contains(&still_there));
                Ok(((), merged))
            })
            .await
            .unwrap();

        assert!(!storage.contains(&removed_path));
        assert_eq!(storage.len(), 1);
        assert_eq!(set.existing().len(), 1);
        assert!(!set.is_dirty());
    }

    #[tokio::test]
    async fn test_failed_upsert_rolls_back_uploads_and_keeps_removals() {
        let storage = Arc::new(FakeObjectStorage::default());
        let uploader = PhotoUploader::new(storage.clone());
        let inspection_id = Uuid::new_v4();

        let mut set = PhotoSet::default();
        set.add_local(jpeg("kept.jpg")).unwrap();
        let saved: Vec<PhotoAttachment> = uploader
            .save_with_photos(&mut set, inspection_id, PhotoCategory::Pieces, None, |m| async move {
                Ok((m.clone(), m))
            })
            .await
            .unwrap();

        set.mark_for_removal(saved[0].id);
        set.add_local(jpeg("new.jpg")).unwrap();
        let result: Result<()> = uploader
            .save_with_photos(&mut set, inspection_id, PhotoCategory::Pieces, None, |_| async {
                Err(AppError::Internal("upsert failed".to_string()))
            })
            .await;

        assert!(result.is_err());
        // Only the first photo remains stored, it is still referenced by the row
        assert_eq!(storage.len(), 1);
        assert!(storage.contains(saved[0].storage_path.as_ref().unwrap()));
        assert_eq!(set.pending_removal().len(), 1);
        assert_eq!(set.new_local().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_upload_aborts_before_upsert() {
        let storage = Arc::new(FakeObjectStorage::default());
        storage.fail_uploads.store(true, Ordering::SeqCst);
        let uploader = PhotoUploader::new(storage.clone());

        let mut set = PhotoSet::default();
        set.add_local(jpeg("a.jpg")).unwrap();
        let result: Result<()> = uploader
            .save_with_photos(&mut set, Uuid::new_v4(), PhotoCategory::General, None, |_| async {
                Err(AppError::Internal("upsert must not run".to_string()))
            })
            .await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert_eq!(set.new_local().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_photos_resolves_legacy_urls() {
        let storage = Arc::new(FakeObjectStorage::default());
        let uploader = PhotoUploader::new(storage.clone());
        let url = storage.upload("edl/general/new/1_abcdef.jpg", vec![1], "image/jpeg").await.unwrap();

        let legacy = PhotoAttachment {
            id: Uuid::new_v4(),
            name: "old.jpg".to_string(),
            size: 1,
            content_type: "image/jpeg".to_string(),
            url,
            description: None,
            category: PhotoCategory::General,
            storage_path: None,
        };
        assert_eq!(uploader.delete_photos(&[legacy]).await, 1);
        assert_eq!(storage.len(), 0);
    }
}
