use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::features::photos::models::LocalPhoto;

/// Reference from a JSON payload to a file part of the same request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewPhotoRefDto {
    /// Name of the multipart part carrying the file
    pub field: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// File parts of a multipart request, keyed by part name
#[derive(Debug, Default)]
pub struct UploadedFiles(HashMap<String, UploadedFile>);

impl UploadedFiles {
    /// Part names must be unique within one request
    pub fn insert(&mut self, field: String, file: UploadedFile) -> Result<()> {
        match self.0.entry(field) {
            Entry::Occupied(entry) => Err(AppError::BadRequest(format!(
                "Duplicate file part '{}'",
                entry.key()
            ))),
            Entry::Vacant(entry) => {
                entry.insert(file);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take the files referenced by `refs`. Each part can be used once.
    pub fn take_photos(&mut self, refs: &[NewPhotoRefDto]) -> Result<Vec<LocalPhoto>> {
        refs.iter()
            .map(|r| {
                let file = self.0.remove(&r.field).ok_or_else(|| {
                    AppError::BadRequest(format!("Missing file part '{}'", r.field))
                })?;
                Ok(LocalPhoto::new(file.file_name, file.content_type, file.data)
                    .with_description(r.description.clone()))
            })
            .collect()
    }
}

/// Multipart body for saves that carry photos, for Swagger UI only.
/// Handlers read the parts with axum's Multipart extractor.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct PhotoSaveFormDto {
    /// JSON document describing the save
    pub payload: String,
    /// Any number of file parts, referenced from `payload` by part name
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: Option<String>,
}
