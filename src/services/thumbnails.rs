//! Blob Store for thumbnail images
//!
//! Stores image bytes in object storage under a random key and returns a
//! public URL. Content type and size are validated against an allow-list
//! before any bytes leave the process; `validate_thumbnail` is exposed
//! separately so the orchestrator can reject a bad thumbnail before the
//! video upload starts.

use async_trait::async_trait;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use uuid::Uuid;

use crate::config::ThumbnailStorageConfig;
use crate::error::{AppError, Result};

/// Image formats accepted for thumbnails
pub const ALLOWED_THUMBNAIL_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];

/// Maximum thumbnail payload (5 MiB)
pub const MAX_THUMBNAIL_BYTES: usize = 5 * 1024 * 1024;

/// Reject unsupported or oversized thumbnails before any upload happens.
pub fn validate_thumbnail(content_type: &str, size: usize) -> Result<()> {
    if !ALLOWED_THUMBNAIL_TYPES.contains(&content_type) {
        return Err(AppError::UnsupportedMedia(format!(
            "thumbnail type {content_type} not allowed; only JPEG, PNG and GIF are accepted"
        )));
    }
    if size > MAX_THUMBNAIL_BYTES {
        return Err(AppError::PayloadTooLarge(format!(
            "thumbnail is {size} bytes, limit is {MAX_THUMBNAIL_BYTES}"
        )));
    }
    Ok(())
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        _ => "bin",
    }
}

#[async_trait]
pub trait ThumbnailStore: Send + Sync {
    /// Validate and store image bytes; returns a retrievable URL.
    async fn store(&self, data: Bytes, content_type: &str) -> Result<String>;

    /// Delete a previously stored thumbnail by its URL. Callers treat
    /// failures as best-effort: log and move on.
    async fn delete(&self, url: &str) -> Result<()>;
}

/// S3-backed thumbnail storage
pub struct S3ThumbnailStore {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3ThumbnailStore {
    pub fn new(client: Client, cfg: &ThumbnailStorageConfig) -> Self {
        Self {
            client,
            bucket: cfg.bucket.clone(),
            public_base_url: cfg.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the S3 client from explicit configuration; falls back to the
    /// ambient AWS credential chain when no static keys are configured.
    pub async fn from_config(cfg: &ThumbnailStorageConfig) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()));

        if let (Some(key_id), Some(secret)) = (&cfg.access_key_id, &cfg.secret_access_key) {
            let credentials = Credentials::new(key_id, secret, None, None, "catalog-service");
            loader = loader.credentials_provider(credentials);
        }

        let shared_config = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if let Some(endpoint) = &cfg.endpoint {
            if !endpoint.trim().is_empty() {
                builder = builder.endpoint_url(endpoint);
            }
        }

        tracing::info!(bucket = %cfg.bucket, "thumbnail store initialized");

        Ok(Self::new(Client::from_conf(builder.build()), cfg))
    }

    fn key_from_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(&self.public_base_url)
            .map(|rest| rest.trim_start_matches('/'))
            .filter(|key| !key.is_empty())
    }
}

#[async_trait]
impl ThumbnailStore for S3ThumbnailStore {
    async fn store(&self, data: Bytes, content_type: &str) -> Result<String> {
        validate_thumbnail(content_type, data.len())?;

        let key = format!("{}.{}", Uuid::new_v4(), extension_for(content_type));

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("thumbnail upload failed: {e}")))?;

        tracing::info!(key = %key, "thumbnail stored");

        Ok(format!("{}/{}", self.public_base_url, key))
    }

    async fn delete(&self, url: &str) -> Result<()> {
        let key = self.key_from_url(url).ok_or_else(|| {
            AppError::Internal(format!("thumbnail URL {url} is outside the configured store"))
        })?;

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("thumbnail delete failed: {e}")))?;

        tracing::info!(key = %key, "thumbnail deleted");
        Ok(())
    }
}
