//! Photo list of one entity between two saves.
//!
//! Removing an existing photo only marks it. The object is deleted from
//! storage after the next successful save, once the row no longer
//! references it. New photos stay local until that save uploads them.

use std::collections::HashSet;
use uuid::Uuid;

use super::models::{LocalPhoto, PhotoAttachment, PhotoPhase};
use crate::core::error::{AppError, Result};
use crate::shared::constants::{ALLOWED_PHOTO_TYPES, MAX_PHOTO_SIZE};

#[derive(Debug, Clone, Default)]
pub struct PhotoSet {
    existing: Vec<PhotoAttachment>,
    pending_removal: Vec<PhotoAttachment>,
    new_local: Vec<LocalPhoto>,
    uploading: HashSet<Uuid>,
}

impl PhotoSet {
    pub fn from_existing(photos: Vec<PhotoAttachment>) -> Self {
        Self {
            existing: dedup_by_id(photos),
            ..Self::default()
        }
    }

    pub fn existing(&self) -> &[PhotoAttachment] {
        &self.existing
    }

    pub fn pending_removal(&self) -> &[PhotoAttachment] {
        &self.pending_removal
    }

    pub fn new_local(&self) -> &[LocalPhoto] {
        &self.new_local
    }

    pub fn is_dirty(&self) -> bool {
        !self.pending_removal.is_empty() || !self.new_local.is_empty()
    }

    pub fn phase(&self, id: Uuid) -> Option<PhotoPhase> {
        if self.existing.iter().any(|p| p.id == id) {
            Some(PhotoPhase::Existing)
        } else if self.pending_removal.iter().any(|p| p.id == id) {
            Some(PhotoPhase::PendingRemoval)
        } else if self.new_local.iter().any(|p| p.local_id == id) {
            if self.uploading.contains(&id) {
                Some(PhotoPhase::Uploading)
            } else {
                Some(PhotoPhase::NewLocal)
            }
        } else {
            None
        }
    }

    pub fn add_local(&mut self, photo: LocalPhoto) -> Result<Uuid> {
        if !ALLOWED_PHOTO_TYPES.contains(&photo.content_type.as_str()) {
            return Err(AppError::Validation(format!(
                "File type '{}' is not allowed for '{}'. Allowed types: {}",
                photo.content_type,
                photo.file_name,
                ALLOWED_PHOTO_TYPES.join(", ")
            )));
        }
        if photo.data.is_empty() {
            return Err(AppError::Validation(format!("'{}' is empty", photo.file_name)));
        }
        if photo.data.len() > MAX_PHOTO_SIZE {
            return Err(AppError::Validation(format!(
                "'{}' exceeds the maximum photo size of {} MB",
                photo.file_name,
                MAX_PHOTO_SIZE / 1024 / 1024
            )));
        }

        let id = photo.local_id;
        self.new_local.push(photo);
        Ok(id)
    }

    /// Drop a photo that was never uploaded
    pub fn discard_local(&mut self, local_id: Uuid) -> bool {
        let before = self.new_local.len();
        self.new_local.retain(|p| p.local_id != local_id);
        before != self.new_local.len()
    }

    pub fn mark_for_removal(&mut self, id: Uuid) -> bool {
        match self.existing.iter().position(|p| p.id == id) {
            Some(index) => {
                let photo = self.existing.remove(index);
                self.pending_removal.push(photo);
                true
            }
            None => false,
        }
    }

    /// Undo `mark_for_removal` before the entity is saved
    pub fn restore(&mut self, id: Uuid) -> bool {
        match self.pending_removal.iter().position(|p| p.id == id) {
            Some(index) => {
                let photo = self.pending_removal.remove(index);
                self.existing.push(photo);
                true
            }
            None => false,
        }
    }

    pub fn set_description(&mut self, id: Uuid, description: Option<String>) -> bool {
        match self.existing.iter_mut().find(|p| p.id == id) {
            Some(photo) => {
                photo.description = description.filter(|d| !d.trim().is_empty());
                true
            }
            None => false,
        }
    }

    /// Keep exactly the existing photos listed in `kept`, in that order,
    /// taking their descriptions from it. Ids this set does not know are
    /// ignored so a client can never reference a foreign object.
    pub fn retain_kept(&mut self, kept: &[PhotoAttachment]) {
        let kept_ids: Vec<Uuid> = kept.iter().map(|p| p.id).collect();
        let removed: Vec<Uuid> = self
            .existing
            .iter()
            .filter(|p| !kept_ids.contains(&p.id))
            .map(|p| p.id)
            .collect();
        for id in removed {
            self.mark_for_removal(id);
        }
        for photo in kept {
            self.set_description(photo.id, photo.description.clone());
        }
        self.existing.sort_by_key(|p| {
            kept_ids
                .iter()
                .position(|id| *id == p.id)
                .unwrap_or(usize::MAX)
        });
    }

    /// Mark every local photo as uploading and hand them out
    pub fn begin_upload(&mut self) -> Vec<LocalPhoto> {
        for photo in &self.new_local {
            self.uploading.insert(photo.local_id);
        }
        self.new_local.clone()
    }

    /// Uploads failed or the save was rejected, photos are local again
    pub fn abort_upload(&mut self) {
        self.uploading.clear();
    }

    /// List to persist: kept existing photos followed by the uploaded ones.
    /// An id already present is not added twice.
    pub fn merged(&self, uploaded: &[PhotoAttachment]) -> Vec<PhotoAttachment> {
        let mut merged = self.existing.clone();
        merged.extend(uploaded.iter().cloned());
        dedup_by_id(merged)
    }

    /// Resynchronise from the list the server confirmed
    pub fn commit(&mut self, confirmed: Vec<PhotoAttachment>) -> Vec<PhotoAttachment> {
        self.existing = dedup_by_id(confirmed);
        self.new_local.clear();
        self.uploading.clear();
        std::mem::take(&mut self.pending_removal)
    }
}

fn dedup_by_id(photos: Vec<PhotoAttachment>) -> Vec<PhotoAttachment> {
    let mut seen = HashSet::new();
    photos.into_iter().filter(|p| seen.insert(p.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::photos::models::PhotoCategory;

    fn attachment(name: &str) -> PhotoAttachment {
        let id = Uuid::new_v4();
        PhotoAttachment {
            id,
            name: name.to_string(),
            size: 1024,
            content_type: "image/jpeg".to_string(),
            url: format!("http://storage.test/photos/{}", id),
            description: None,
            category: PhotoCategory::Pieces,
            storage_path: Some(format!("edl/pieces/new/{}.jpg", id)),
        }
    }

    fn jpeg(name: &str) -> LocalPhoto {
        LocalPhoto::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
    }

    #[test]
    fn test_removal_is_deferred_until_commit() {
        let a = attachment("a.jpg");
        let b = attachment("b.jpg");
        let mut set = PhotoSet::from_existing(vec![a.clone(), b.clone()]);

        assert!(set.mark_for_removal(a.id));
        assert_eq!(set.phase(a.id), Some(PhotoPhase::PendingRemoval));
        assert_eq!(set.existing(), &[b.clone()]);
        assert!(set.is_dirty());

        let removed = set.commit(vec![b.clone()]);
        assert_eq!(removed, vec![a.clone()]);
        assert_eq!(set.phase(a.id), None);
        assert!(!set.is_dirty());
    }

    #[test]
    fn test_restore_undoes_removal() {
        let a = attachment("a.jpg");
        let mut set = PhotoSet::from_existing(vec![a.clone()]);
        set.mark_for_removal(a.id);
        assert!(set.restore(a.id));
        assert_eq!(set.phase(a.id), Some(PhotoPhase::Existing));
        assert!(!set.is_dirty());
    }

    #[test]
    fn test_merge_is_existing_minus_removed_union_uploaded() {
        let a = attachment("a.jpg");
        let b = attachment("b.jpg");
        let c = attachment("c.jpg");
        let mut set = PhotoSet::from_existing(vec![a.clone(), b.clone()]);
        set.mark_for_removal(a.id);

        // `b` appears twice, once as kept and once as a replayed upload
        let merged = set.merged(&[c.clone(), b.clone()]);
        let ids: Vec<Uuid> = merged.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![b.id, c.id]);
    }

    #[test]
    fn test_upload_phases() {
        let mut set = PhotoSet::default();
        let local_id = set.add_local(jpeg("new.jpg")).unwrap();
        assert_eq!(set.phase(local_id), Some(PhotoPhase::NewLocal));

        let batch = set.begin_upload();
        assert_eq!(batch.len(), 1);
        assert_eq!(set.phase(local_id), Some(PhotoPhase::Uploading));

        set.abort_upload();
        assert_eq!(set.phase(local_id), Some(PhotoPhase::NewLocal));

        assert!(set.discard_local(local_id));
        assert_eq!(set.phase(local_id), None);
    }

    #[test]
    fn test_rejects_non_image_and_oversized() {
        let mut set = PhotoSet::default();
        assert!(set
            .add_local(LocalPhoto::new("doc.pdf", "application/pdf", vec![1, 2, 3]))
            .is_err());
        assert!(set
            .add_local(LocalPhoto::new("big.jpg", "image/jpeg", vec![0; MAX_PHOTO_SIZE + 1]))
            .is_err());
        assert!(set
            .add_local(LocalPhoto::new("empty.jpg", "image/jpeg", Vec::new()))
            .is_err());
        assert!(set.new_local().is_empty());
    }

    #[test]
    fn test_retain_kept_applies_descriptions_and_ignores_foreign_ids() {
        let a = attachment("a.jpg");
        let b = attachment("b.jpg");
        let foreign = attachment("foreign.jpg");
        let mut set = PhotoSet::from_existing(vec![a.clone(), b.clone()]);

        let mut edited_b = b.clone();
        edited_b.description = Some("Fissure au plafond".to_string());
        set.retain_kept(&[edited_b, foreign.clone()]);

        assert_eq!(set.phase(a.id), Some(PhotoPhase::PendingRemoval));
        assert_eq!(set.phase(foreign.id), None);
        assert_eq!(set.existing().len(), 1);
        assert_eq!(
            set.existing()[0].description.as_deref(),
            Some("Fissure au plafond")
        );
    }
}
