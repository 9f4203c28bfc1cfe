//! Data models for catalog-service
//!
//! Entities map 1:1 to the Postgres schema; response DTOs carry the
//! joined/derived fields (category name, live engagement counts) that the
//! listing and detail endpoints expose.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ========================================
// Entities
// ========================================

/// Video database entity
///
/// `media_id`/`media_url` are NULL while the external upload is in flight
/// ("provisioning"); such rows never appear in listings.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub media_id: Option<String>,
    pub media_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    /// A video is published once the external media reference exists.
    pub fn is_published(&self) -> bool {
        self.media_id.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Like {
    pub id: Uuid,
    pub user_id: Uuid,
    pub video_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub video_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ========================================
// Repository inputs
// ========================================

/// Row values for a newly persisted video. The orchestrator fills the media
/// reference from the upload result before this ever reaches the store.
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub media_id: String,
    pub media_url: String,
    pub thumbnail_url: Option<String>,
}

/// Partial update for a video row. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct VideoChanges {
    pub title: Option<String>,
    pub category_id: Option<Uuid>,
    pub thumbnail_url: Option<String>,
}

impl VideoChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.category_id.is_none() && self.thumbnail_url.is_none()
    }
}

/// Listing filter: free-text title match, category filter, offset+limit.
#[derive(Debug, Clone, Default)]
pub struct VideoFilter {
    pub query: Option<String>,
    pub category_id: Option<Uuid>,
    pub offset: i64,
    pub limit: i64,
}

// ========================================
// Response DTOs
// ========================================

/// Intermediate listing row: video joined with its category name. Engagement
/// counts are attached afterwards from a batched read.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VideoWithCategory {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub media_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub category: Option<String>,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
}

impl VideoWithCategory {
    pub fn into_list_item(self, like_count: i64, comment_count: i64) -> VideoListItem {
        VideoListItem {
            id: self.id,
            title: self.title,
            description: self.description,
            media_url: self.media_url,
            thumbnail_url: self.thumbnail_url,
            category: self.category,
            view_count: self.view_count,
            like_count,
            comment_count,
            created_at: self.created_at,
        }
    }
}

/// Listing row: video joined with category name and live counts.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VideoListItem {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub media_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub category: Option<String>,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Detail view returned by create/get/update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDetail {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub media_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoDetail {
    pub fn from_video(video: Video, like_count: i64, comment_count: i64) -> Self {
        Self {
            id: video.id,
            title: video.title,
            description: video.description,
            category_id: video.category_id,
            media_url: video.media_url,
            thumbnail_url: video.thumbnail_url,
            view_count: video.view_count,
            like_count,
            comment_count,
            created_at: video.created_at,
            updated_at: video.updated_at,
        }
    }
}

/// Catalog-wide totals for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_videos: i64,
    pub total_categories: i64,
    pub total_likes: i64,
    pub total_comments: i64,
}
