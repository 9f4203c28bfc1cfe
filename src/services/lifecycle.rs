//! Video Lifecycle Orchestrator
//!
//! Coordinates create/update/delete of a video across the media host, the
//! thumbnail store and the catalog so that every exit path leaves the system
//! in a known state:
//!
//! - create: validate -> upload media -> store thumbnail -> persist. The
//!   media upload happens before any row exists, so an upload failure needs
//!   no compensation. A thumbnail failure after a successful upload is
//!   non-fatal; the video is persisted without a thumbnail. A persistence
//!   failure triggers a best-effort delete of the just-uploaded asset.
//! - update: only title/category/thumbnail are mutable; a replacement
//!   thumbnail is stored and committed before the old blob is removed.
//! - delete: the remote asset is removed first and any failure aborts the
//!   whole operation; comments, likes and the video row then go in one
//!   transaction; the thumbnail blob is removed last, best-effort.

use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use crate::db::CatalogStore;
use crate::error::{AppError, Result};
use crate::models::{NewVideo, Video, VideoChanges, VideoDetail};
use crate::services::media_host::MediaHost;
use crate::services::thumbnails::{validate_thumbnail, ThumbnailStore};

/// Video container types accepted for upload
pub const ALLOWED_VIDEO_TYPES: [&str; 3] = ["video/mp4", "video/quicktime", "video/x-msvideo"];

const MAX_TITLE_CHARS: usize = 100;

/// Raw thumbnail upload as received from the client.
#[derive(Debug, Clone)]
pub struct ThumbnailUpload {
    pub content_type: String,
    pub data: Bytes,
}

/// Incoming video creation request.
#[derive(Debug, Clone)]
pub struct NewVideoUpload {
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub content_type: String,
    pub data: Bytes,
    pub thumbnail: Option<ThumbnailUpload>,
}

pub struct VideoLifecycle {
    catalog: Arc<dyn CatalogStore>,
    media: Arc<dyn MediaHost>,
    thumbnails: Arc<dyn ThumbnailStore>,
}

impl VideoLifecycle {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        media: Arc<dyn MediaHost>,
        thumbnails: Arc<dyn ThumbnailStore>,
    ) -> Self {
        Self {
            catalog,
            media,
            thumbnails,
        }
    }

    /// Create a video: the row is persisted only after the external upload
    /// succeeded, so a provisioning video is never visible in the catalog.
    pub async fn create(&self, upload: NewVideoUpload) -> Result<VideoDetail> {
        validate_title(&upload.title)?;

        if !ALLOWED_VIDEO_TYPES.contains(&upload.content_type.as_str()) {
            return Err(AppError::UnsupportedMedia(format!(
                "video type {} not allowed; only MP4, MOV and AVI are accepted",
                upload.content_type
            )));
        }
        if upload.data.is_empty() {
            return Err(AppError::Validation("video file is empty".to_string()));
        }

        // A bad thumbnail must abort before any upload occurs.
        if let Some(thumb) = &upload.thumbnail {
            validate_thumbnail(&thumb.content_type, thumb.data.len())?;
        }

        if let Some(category_id) = upload.category_id {
            self.require_category(category_id).await?;
        }

        let media_ref = self.media.upload(upload.data.clone(), &upload.title).await?;

        // The video upload already succeeded; losing the thumbnail is a
        // recoverable cosmetic defect, discarding the upload is not.
        let thumbnail_url = match upload.thumbnail {
            Some(thumb) => match self.thumbnails.store(thumb.data, &thumb.content_type).await {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!(error = %e, "thumbnail store failed, creating video without thumbnail");
                    None
                }
            },
            None => None,
        };

        let new_video = NewVideo {
            title: upload.title,
            description: upload.description,
            category_id: upload.category_id,
            media_id: media_ref.id.clone(),
            media_url: media_ref.url.clone(),
            thumbnail_url,
        };

        let video = match self.persist_new_video(&new_video).await {
            Ok(video) => video,
            Err(e) => {
                // Compensate for the external upload; an orphaned remote
                // asset must not mask the persistence error.
                if let Err(cleanup) = self.media.delete(&media_ref.id).await {
                    tracing::error!(
                        media_id = %media_ref.id,
                        error = %cleanup,
                        "compensating media delete failed, remote asset orphaned"
                    );
                }
                if let Some(url) = &new_video.thumbnail_url {
                    if let Err(cleanup) = self.thumbnails.delete(url).await {
                        tracing::warn!(error = %cleanup, "orphaned thumbnail blob not removed");
                    }
                }
                return Err(e);
            }
        };

        tracing::info!(video_id = %video.id, media_id = %media_ref.id, "video published");
        Ok(VideoDetail::from_video(video, 0, 0))
    }

    /// Update title, category and/or thumbnail. An empty change set returns
    /// the unchanged record without touching the store.
    pub async fn update(
        &self,
        video_id: Uuid,
        mut changes: VideoChanges,
        new_thumbnail: Option<ThumbnailUpload>,
    ) -> Result<VideoDetail> {
        let existing = self.require_video(video_id).await?;

        if let Some(title) = &changes.title {
            validate_title(title)?;
        }
        if let Some(category_id) = changes.category_id {
            self.require_category(category_id).await?;
        }

        if changes.is_empty() && new_thumbnail.is_none() {
            return self.detail(existing).await;
        }

        // Store the replacement blob before the row is committed so there is
        // never a window where the record points at nothing.
        let previous_thumbnail = existing.thumbnail_url.clone();
        if let Some(thumb) = new_thumbnail {
            validate_thumbnail(&thumb.content_type, thumb.data.len())?;
            let url = self.thumbnails.store(thumb.data, &thumb.content_type).await?;
            changes.thumbnail_url = Some(url);
        }

        let mut tx = self.catalog.begin().await?;
        let updated = tx.update_video(video_id, &changes).await?;
        tx.commit().await?;

        if let (Some(new_url), Some(old_url)) = (&changes.thumbnail_url, &previous_thumbnail) {
            if new_url != old_url {
                if let Err(e) = self.thumbnails.delete(old_url).await {
                    tracing::warn!(video_id = %video_id, error = %e, "stale thumbnail not removed");
                }
            }
        }

        tracing::info!(video_id = %video_id, "video updated");
        self.detail(updated).await
    }

    /// Delete a video everywhere. Order is forced: remote asset first (a
    /// failure aborts with nothing touched), then comments/likes/row in one
    /// transaction, then the thumbnail blob best-effort.
    pub async fn delete(&self, video_id: Uuid) -> Result<()> {
        let video = self.require_video(video_id).await?;

        if let Some(media_id) = &video.media_id {
            self.media.delete(media_id).await?;
        }

        let mut tx = self.catalog.begin().await?;
        let comments = tx.delete_comments_for_video(video_id).await?;
        let likes = tx.delete_likes_for_video(video_id).await?;
        tx.delete_video(video_id).await?;
        tx.commit().await?;

        if let Some(url) = &video.thumbnail_url {
            if let Err(e) = self.thumbnails.delete(url).await {
                tracing::warn!(video_id = %video_id, error = %e, "thumbnail blob not removed");
            }
        }

        tracing::info!(
            video_id = %video_id,
            comments_removed = comments,
            likes_removed = likes,
            "video deleted"
        );
        Ok(())
    }

    /// Detail view with live engagement counts.
    pub async fn get(&self, video_id: Uuid) -> Result<VideoDetail> {
        let video = self.require_video(video_id).await?;
        self.detail(video).await
    }

    async fn persist_new_video(&self, new_video: &NewVideo) -> Result<Video> {
        let mut tx = self.catalog.begin().await?;
        let video = tx.insert_video(new_video).await?;
        tx.commit().await?;
        Ok(video)
    }

    async fn detail(&self, video: Video) -> Result<VideoDetail> {
        let likes = self.catalog.like_count(video.id).await?;
        let comments = self.catalog.comment_count(video.id).await?;
        Ok(VideoDetail::from_video(video, likes, comments))
    }

    async fn require_video(&self, video_id: Uuid) -> Result<Video> {
        self.catalog
            .get_video(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("video {} not found", video_id)))
    }

    async fn require_category(&self, category_id: Uuid) -> Result<()> {
        self.catalog
            .get_category(category_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("category {} not found", category_id)))
    }
}

fn validate_title(title: &str) -> Result<()> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::Validation(format!(
            "title exceeds {MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(())
}
