//! Engagement Aggregator
//!
//! Likes, comments, view counts and dashboard totals. Counts are always
//! computed live from the underlying rows; there is no denormalized counter
//! to keep in sync. Like uniqueness is enforced by the store's unique
//! constraint, so concurrent likes for the same pair resolve to exactly one
//! success.

use std::sync::Arc;

use uuid::Uuid;

use crate::db::CatalogStore;
use crate::error::{AppError, Result};
use crate::middleware::CallerIdentity;
use crate::models::{Comment, DashboardStats, Like};

const MAX_COMMENT_CHARS: usize = 1000;

pub struct Engagement {
    catalog: Arc<dyn CatalogStore>,
}

impl Engagement {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    /// Like a video; a second like by the same user is a conflict.
    pub async fn like(&self, video_id: Uuid, user_id: Uuid) -> Result<Like> {
        self.require_video(video_id).await?;

        match self.catalog.insert_like(video_id, user_id).await {
            Ok(like) => Ok(like),
            Err(AppError::Conflict(_)) => Err(AppError::Conflict(
                "user has already liked this video".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    /// Remove a like; absent pairs are a not-found error.
    pub async fn unlike(&self, video_id: Uuid, user_id: Uuid) -> Result<()> {
        let removed = self.catalog.delete_like(video_id, user_id).await?;
        if !removed {
            return Err(AppError::NotFound(
                "no like by this user on this video".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn like_count(&self, video_id: Uuid) -> Result<i64> {
        self.require_video(video_id).await?;
        self.catalog.like_count(video_id).await
    }

    pub async fn comment_count(&self, video_id: Uuid) -> Result<i64> {
        self.require_video(video_id).await?;
        self.catalog.comment_count(video_id).await
    }

    pub async fn add_comment(
        &self,
        video_id: Uuid,
        caller: &CallerIdentity,
        text: &str,
    ) -> Result<Comment> {
        validate_comment_text(text)?;
        self.require_video(video_id).await?;
        self.catalog
            .insert_comment(video_id, caller.user_id, text.trim())
            .await
    }

    /// Only the authoring user or an admin may edit a comment.
    pub async fn update_comment(
        &self,
        comment_id: Uuid,
        caller: &CallerIdentity,
        text: &str,
    ) -> Result<Comment> {
        validate_comment_text(text)?;
        let comment = self.require_comment(comment_id).await?;
        self.authorize_comment_mutation(&comment.user_id, caller)?;
        self.catalog.update_comment(comment_id, text.trim()).await
    }

    /// Only the authoring user or an admin may delete a comment.
    pub async fn delete_comment(&self, comment_id: Uuid, caller: &CallerIdentity) -> Result<()> {
        let comment = self.require_comment(comment_id).await?;
        self.authorize_comment_mutation(&comment.user_id, caller)?;
        self.catalog.delete_comment(comment_id).await
    }

    pub async fn comments_for(
        &self,
        video_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>> {
        self.require_video(video_id).await?;
        self.catalog
            .comments_for_video(video_id, limit.clamp(1, 100), offset.max(0))
            .await
    }

    /// Bump the monotonic view counter; returns the new count.
    pub async fn record_view(&self, video_id: Uuid) -> Result<i64> {
        self.catalog
            .record_view(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("video {} not found", video_id)))
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.catalog.dashboard_stats().await
    }

    fn authorize_comment_mutation(&self, author: &Uuid, caller: &CallerIdentity) -> Result<()> {
        if caller.is_admin || caller.user_id == *author {
            return Ok(());
        }
        Err(AppError::Forbidden(
            "only the comment author or an admin may modify it".to_string(),
        ))
    }

    async fn require_video(&self, video_id: Uuid) -> Result<()> {
        self.catalog
            .get_video(video_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("video {} not found", video_id)))
    }

    async fn require_comment(&self, comment_id: Uuid) -> Result<Comment> {
        self.catalog
            .get_comment(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {} not found", comment_id)))
    }
}

fn validate_comment_text(text: &str) -> Result<()> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(
            "comment text must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_COMMENT_CHARS {
        return Err(AppError::Validation(format!(
            "comment exceeds {MAX_COMMENT_CHARS} characters"
        )));
    }
    Ok(())
}
