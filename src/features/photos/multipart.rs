//! Reading `payload` + file parts from a multipart save request

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dtos::{UploadedFile, UploadedFiles};
use crate::core::error::{AppError, Result};

pub const PAYLOAD_FIELD: &str = "payload";

pub async fn read_payload_and_files<T: DeserializeOwned>(
    mut multipart: Multipart,
) -> Result<(T, UploadedFiles)> {
    let mut payload: Option<String> = None;
    let mut files = UploadedFiles::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| read_error("multipart data", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == PAYLOAD_FIELD {
            let text = field
                .text()
                .await
                .map_err(|e| read_error("payload field", e))?;
            payload = Some(text);
            continue;
        }

        if field.file_name().is_none() {
            debug!("Ignoring non-file field: {}", name);
            continue;
        }

        let file_name = field.file_name().unwrap_or("photo").to_string();
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| read_error(&format!("file '{}'", file_name), e))?;

        files.insert(
            name,
            UploadedFile {
                file_name,
                content_type,
                data: data.to_vec(),
            },
        )?;
    }

    let payload = payload
        .ok_or_else(|| AppError::BadRequest(format!("Missing '{}' field", PAYLOAD_FIELD)))?;
    let parsed = serde_json::from_str(&payload)
        .map_err(|e| AppError::BadRequest(format!("Invalid payload JSON: {}", e)))?;

    Ok((parsed, files))
}

/// The body limit surfaces here, while the parts are streamed
fn read_error(what: &str, e: MultipartError) -> AppError {
    debug!("Failed to read {}: {}", what, e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Request body is too large: {}", e.body_text()))
    } else {
        AppError::BadRequest(format!("Failed to read {}: {}", what, e.body_text()))
    }
}
