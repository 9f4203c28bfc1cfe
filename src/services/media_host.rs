//! Media Store Gateway
//!
//! Adapter to the external video-hosting provider. Upload failures and
//! deletion failures are surfaced to the caller untouched; retries are a
//! caller policy, never performed here. The provider does not guarantee an
//! idempotent delete, so the HTTP client treats a 404 as success.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;

use crate::config::MediaHostConfig;
use crate::error::{AppError, Result};

/// Opaque reference to an externally hosted media asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    pub id: String,
    pub url: String,
}

#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Upload a video file; returns the provider's stable reference.
    async fn upload(&self, file: Bytes, title: &str) -> Result<MediaRef>;

    /// Delete a remote asset. "Not found" counts as success.
    async fn delete(&self, media_id: &str) -> Result<()>;
}

/// REST client for a Vimeo-style hosting API.
pub struct HostedMediaClient {
    http: HttpClient,
    api_base: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    uri: String,
    link: String,
}

impl HostedMediaClient {
    pub fn from_config(cfg: &MediaHostConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {e}")))?;

        tracing::info!(api_base = %cfg.api_base, "media host client initialized");

        Ok(Self {
            http,
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            access_token: cfg.access_token.clone(),
        })
    }
}

#[async_trait]
impl MediaHost for HostedMediaClient {
    async fn upload(&self, file: Bytes, title: &str) -> Result<MediaRef> {
        let part =
            reqwest::multipart::Part::bytes(file.to_vec()).file_name(format!("{title}.bin"));
        let form = reqwest::multipart::Form::new()
            .text("name", title.to_string())
            .part("file_data", part);

        let response = self
            .http
            .post(format!("{}/me/videos", self.api_base))
            .bearer_auth(&self.access_token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upload(format!(
                "provider returned {status}: {body}"
            )));
        }

        let payload: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upload(format!("invalid provider response: {e}")))?;

        // The provider addresses assets as "/videos/{id}".
        let id = payload
            .uri
            .rsplit('/')
            .next()
            .unwrap_or(payload.uri.as_str())
            .to_string();

        tracing::info!(media_id = %id, "video uploaded to media host");

        Ok(MediaRef {
            id,
            url: payload.link,
        })
    }

    async fn delete(&self, media_id: &str) -> Result<()> {
        let response = self
            .http
            .delete(format!("{}/videos/{}", self.api_base, media_id))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| AppError::MediaDeletion(e.to_string()))?;

        let status = response.status();
        if status.is_success() || status.as_u16() == 404 {
            tracing::info!(media_id = %media_id, "remote media asset deleted");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::MediaDeletion(format!(
            "provider returned {status}: {body}"
        )))
    }
}
