use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::photos::dtos::NewPhotoRefDto;
use crate::features::photos::PhotoAttachment;

/// One entry of a collection step as submitted with `wizard/next`
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EntryDraftDto<E> {
    /// Absent for entries added since the last save
    pub id: Option<Uuid>,
    pub details: E,
    /// Existing photos to keep with their descriptions. Omit to keep all.
    pub photos: Option<Vec<PhotoAttachment>>,
    /// File parts to upload for this entry
    #[serde(default)]
    pub new_photos: Vec<NewPhotoRefDto>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CollectionPayloadDto<E> {
    #[serde(default = "Vec::new")]
    pub entries: Vec<EntryDraftDto<E>>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateEntryDto<E> {
    pub details: E,
    /// Existing photos to keep with their descriptions. Omit to keep all.
    pub photos: Option<Vec<PhotoAttachment>>,
}
