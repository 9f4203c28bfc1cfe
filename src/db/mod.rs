//! Catalog Repository
//!
//! Transactional CRUD over Video/Category/Like/Comment rows. The store is
//! exposed as a trait pair: `CatalogStore` for reads and single-row writes,
//! `CatalogTx` for the multi-row write sequences that must commit or roll
//! back as one unit (video insert, cascade delete). The orchestrator opens a
//! transaction at operation start and every exit path either commits it or
//! drops it, which rolls back.

pub mod category_repo;
pub mod comment_repo;
pub mod like_repo;
pub mod video_repo;

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    Category, Comment, DashboardStats, Like, NewVideo, Video, VideoChanges, VideoFilter,
    VideoListItem,
};

/// Transactional write handle. Dropping without `commit` rolls back.
#[async_trait]
pub trait CatalogTx: Send {
    async fn insert_video(&mut self, video: &NewVideo) -> Result<Video>;
    async fn update_video(&mut self, video_id: Uuid, changes: &VideoChanges) -> Result<Video>;
    async fn delete_comments_for_video(&mut self, video_id: Uuid) -> Result<u64>;
    async fn delete_likes_for_video(&mut self, video_id: Uuid) -> Result<u64>;
    async fn delete_video(&mut self, video_id: Uuid) -> Result<()>;
    async fn commit(self: Box<Self>) -> Result<()>;
}

/// Abstract relational store over the catalog entities.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn CatalogTx>>;

    async fn get_video(&self, video_id: Uuid) -> Result<Option<Video>>;
    async fn get_category(&self, category_id: Uuid) -> Result<Option<Category>>;

    async fn insert_like(&self, video_id: Uuid, user_id: Uuid) -> Result<Like>;
    /// Returns true if a like existed and was removed.
    async fn delete_like(&self, video_id: Uuid, user_id: Uuid) -> Result<bool>;
    async fn like_count(&self, video_id: Uuid) -> Result<i64>;

    async fn insert_comment(&self, video_id: Uuid, user_id: Uuid, text: &str) -> Result<Comment>;
    async fn get_comment(&self, comment_id: Uuid) -> Result<Option<Comment>>;
    async fn update_comment(&self, comment_id: Uuid, text: &str) -> Result<Comment>;
    async fn delete_comment(&self, comment_id: Uuid) -> Result<()>;
    async fn comments_for_video(
        &self,
        video_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>>;
    async fn comment_count(&self, video_id: Uuid) -> Result<i64>;

    /// Returns the new view count, or None if the video does not exist.
    async fn record_view(&self, video_id: Uuid) -> Result<Option<i64>>;

    async fn list_videos(&self, filter: &VideoFilter) -> Result<Vec<VideoListItem>>;
    async fn suggest_titles(&self, prefix: &str, limit: i64) -> Result<Vec<String>>;
    async fn dashboard_stats(&self) -> Result<DashboardStats>;
}

// ========================================
// Postgres implementation
// ========================================

#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub struct PgCatalogTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl CatalogTx for PgCatalogTx {
    async fn insert_video(&mut self, video: &NewVideo) -> Result<Video> {
        Ok(video_repo::insert_video(&mut *self.tx, video).await?)
    }

    async fn update_video(&mut self, video_id: Uuid, changes: &VideoChanges) -> Result<Video> {
        Ok(video_repo::update_video(&mut *self.tx, video_id, changes).await?)
    }

    async fn delete_comments_for_video(&mut self, video_id: Uuid) -> Result<u64> {
        Ok(comment_repo::delete_comments_for_video(&mut *self.tx, video_id).await?)
    }

    async fn delete_likes_for_video(&mut self, video_id: Uuid) -> Result<u64> {
        Ok(like_repo::delete_likes_for_video(&mut *self.tx, video_id).await?)
    }

    async fn delete_video(&mut self, video_id: Uuid) -> Result<()> {
        let removed = video_repo::delete_video(&mut *self.tx, video_id).await?;
        if removed == 0 {
            return Err(AppError::NotFound(format!("video {} not found", video_id)));
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for PgCatalog {
    async fn begin(&self) -> Result<Box<dyn CatalogTx>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgCatalogTx { tx }))
    }

    async fn get_video(&self, video_id: Uuid) -> Result<Option<Video>> {
        Ok(video_repo::get_video(&self.pool, video_id).await?)
    }

    async fn get_category(&self, category_id: Uuid) -> Result<Option<Category>> {
        Ok(category_repo::get_category(&self.pool, category_id).await?)
    }

    async fn insert_like(&self, video_id: Uuid, user_id: Uuid) -> Result<Like> {
        Ok(like_repo::insert_like(&self.pool, video_id, user_id).await?)
    }

    async fn delete_like(&self, video_id: Uuid, user_id: Uuid) -> Result<bool> {
        let removed = like_repo::delete_like(&self.pool, video_id, user_id).await?;
        Ok(removed > 0)
    }

    async fn like_count(&self, video_id: Uuid) -> Result<i64> {
        Ok(like_repo::count_likes(&self.pool, video_id).await?)
    }

    async fn insert_comment(&self, video_id: Uuid, user_id: Uuid, text: &str) -> Result<Comment> {
        Ok(comment_repo::insert_comment(&self.pool, video_id, user_id, text).await?)
    }

    async fn get_comment(&self, comment_id: Uuid) -> Result<Option<Comment>> {
        Ok(comment_repo::get_comment(&self.pool, comment_id).await?)
    }

    async fn update_comment(&self, comment_id: Uuid, text: &str) -> Result<Comment> {
        Ok(comment_repo::update_comment(&self.pool, comment_id, text).await?)
    }

    async fn delete_comment(&self, comment_id: Uuid) -> Result<()> {
        let removed = comment_repo::delete_comment(&self.pool, comment_id).await?;
        if removed == 0 {
            return Err(AppError::NotFound(format!(
                "comment {} not found",
                comment_id
            )));
        }
        Ok(())
    }

    async fn comments_for_video(
        &self,
        video_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>> {
        Ok(comment_repo::comments_for_video(&self.pool, video_id, limit, offset).await?)
    }

    async fn comment_count(&self, video_id: Uuid) -> Result<i64> {
        Ok(comment_repo::count_comments(&self.pool, video_id).await?)
    }

    async fn record_view(&self, video_id: Uuid) -> Result<Option<i64>> {
        Ok(video_repo::record_view(&self.pool, video_id).await?)
    }

    async fn list_videos(&self, filter: &VideoFilter) -> Result<Vec<VideoListItem>> {
        let rows = video_repo::list_videos(&self.pool, filter).await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        // Two batched reads instead of per-row subqueries: the query count
        // stays constant per page and the aggregation stays observable.
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let like_counts: HashMap<Uuid, i64> = like_repo::count_likes_batch(&self.pool, &ids)
            .await?
            .into_iter()
            .collect();
        let comment_counts: HashMap<Uuid, i64> =
            comment_repo::count_comments_batch(&self.pool, &ids)
                .await?
                .into_iter()
                .collect();

        Ok(rows
            .into_iter()
            .map(|row| {
                let likes = like_counts.get(&row.id).copied().unwrap_or(0);
                let comments = comment_counts.get(&row.id).copied().unwrap_or(0);
                row.into_list_item(likes, comments)
            })
            .collect())
    }

    async fn suggest_titles(&self, prefix: &str, limit: i64) -> Result<Vec<String>> {
        Ok(video_repo::suggest_titles(&self.pool, prefix, limit).await?)
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        Ok(DashboardStats {
            total_videos: video_repo::count_videos(&self.pool).await?,
            total_categories: category_repo::count_categories(&self.pool).await?,
            total_likes: like_repo::count_all_likes(&self.pool).await?,
            total_comments: comment_repo::count_all_comments(&self.pool).await?,
        })
    }
}
