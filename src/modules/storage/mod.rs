//! Storage module for photo attachments
//!
//! `ObjectStorage` is the seam between the photo lifecycle and the bucket.
//! Production uses the MinIO/S3 client, tests use the in-memory fake.

use async_trait::async_trait;

use crate::core::error::AppError;

#[cfg(test)]
mod fake;
mod bucket_policy;
mod minio_client;

#[cfg(test)]
pub use fake::FakeObjectStorage;
pub use minio_client::MinIOClient;

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `data` at `path` and return its public URL
    async fn upload(&self, path: &str, data: Vec<u8>, content_type: &str) -> Result<String, AppError>;

    async fn delete(&self, path: &str) -> Result<(), AppError>;

    fn public_url(&self, path: &str) -> String;

    /// Inverse of `public_url`, `None` for URLs this storage did not produce
    fn path_from_url(&self, url: &str) -> Option<String>;

    /// Delete every path, logging failures instead of returning them.
    /// Returns the number of objects actually removed.
    async fn delete_best_effort(&self, paths: &[String]) -> usize {
        let mut removed = 0;
        for path in paths {
            match self.delete(path).await {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!("Failed to delete stored object '{}': {}", path, e),
            }
        }
        removed
    }
}
