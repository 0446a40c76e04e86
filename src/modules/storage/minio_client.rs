//! MinIO/S3-compatible storage for inspection photos
//!
//! Object keys are `{public_prefix}/{path}`, `path` being the storage path
//! kept on the photo attachment. The prefix is publicly readable so stored
//! URLs can be rendered directly.

use async_trait::async_trait;
use chrono::Utc;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};

use super::bucket_policy::{public_read_policy, sign_policy_request, SigningKeys};
use super::ObjectStorage;
use crate::core::config::MinIOConfig;
use crate::core::error::AppError;

pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    config: MinIOConfig,
    http: reqwest::Client,
}

impl MinIOClient {
    pub async fn new(config: MinIOConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Invalid storage credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Invalid bucket '{}': {}", config.bucket, e)))?;
        bucket.set_path_style();

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            bucket,
            region,
            credentials,
            config,
            http,
        })
    }

    /// Create the bucket when missing and open the photo prefix for reads.
    /// Neither step is fatal, an operator may have provisioned both.
    pub async fn ensure_bucket_exists(&self) -> Result<(), AppError> {
        let name = self.bucket.name();
        match Bucket::create_with_path_style(
            &name,
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await
        {
            Ok(_) => info!("Bucket '{}' created", name),
            Err(e) if is_already_there(&e.to_string()) => debug!("Bucket '{}' already exists", name),
            Err(e) => warn!("Could not create bucket '{}', assuming it exists: {}", name, e),
        }

        if let Err(e) = self.open_public_prefix().await {
            warn!(
                "Photos under '{}/{}' may not be publicly readable: {}",
                name, self.config.public_prefix, e
            );
        }
        Ok(())
    }

    async fn open_public_prefix(&self) -> Result<(), AppError> {
        let name = self.bucket.name();
        let keys = SigningKeys {
            access_key: &self.config.access_key,
            secret_key: &self.config.secret_key,
            region: &self.config.region,
        };
        let request = sign_policy_request(
            &self.config.endpoint,
            &name,
            public_read_policy(&name, &self.config.public_prefix),
            &keys,
            Utc::now(),
        )?;

        let mut builder = self.http.put(&request.url).body(request.body);
        for (header, value) in request.headers {
            builder = builder.header(header, value);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Bucket policy request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Storage(format!(
                "Bucket policy rejected: {} {}",
                status, body
            )));
        }
        info!("Public read enabled on {}/{}/*", name, self.config.public_prefix);
        Ok(())
    }

    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }

    fn object_key(&self, path: &str) -> String {
        format!("{}/{}", self.config.public_prefix, path.trim_start_matches('/'))
    }
}

fn is_already_there(message: &str) -> bool {
    ["BucketAlreadyOwnedByYou", "BucketAlreadyExists", "already own it"]
        .iter()
        .any(|marker| message.contains(marker))
}

#[async_trait]
impl ObjectStorage for MinIOClient {
    async fn upload(&self, path: &str, data: Vec<u8>, content_type: &str) -> Result<String, AppError> {
        let key = self.object_key(path);
        self.bucket
            .put_object_with_content_type(&key, &data, content_type)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to upload '{}': {}", path, e)))?;

        debug!("Uploaded '{}' ({} bytes)", key, data.len());
        Ok(self.public_url(path))
    }

    async fn delete(&self, path: &str) -> Result<(), AppError> {
        let key = self.object_key(path);
        self.bucket
            .delete_object(&key)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to delete '{}': {}", path, e)))?;

        debug!("Deleted '{}'", key);
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.public_endpoint,
            self.bucket.name(),
            self.object_key(path)
        )
    }

    /// Attachments saved before `storagePath` existed only carry their URL
    fn path_from_url(&self, url: &str) -> Option<String> {
        let bucket = self.bucket.name();
        [&self.config.public_endpoint, &self.config.endpoint]
            .iter()
            .map(|endpoint| format!("{}/{}/{}/", endpoint, bucket, self.config.public_prefix))
            .find_map(|prefix| url.strip_prefix(&prefix).map(str::to_string))
    }
}
