//! In-memory test doubles for the catalog store and the two gateways.
//!
//! The memory transaction buffers its writes and applies them on commit, so
//! protocol tests can abort mid-sequence and assert all-or-none behavior.
//! Gateways count their calls and can be switched into failure modes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use catalog_service::db::{CatalogStore, CatalogTx};
use catalog_service::error::{AppError, Result};
use catalog_service::models::{
    Category, Comment, DashboardStats, Like, NewVideo, Video, VideoChanges, VideoFilter,
    VideoListItem,
};
use catalog_service::services::media_host::{MediaHost, MediaRef};
use catalog_service::services::thumbnails::{validate_thumbnail, ThumbnailStore};

// ========================================
// Catalog store
// ========================================

#[derive(Default)]
pub struct CatalogState {
    pub videos: HashMap<Uuid, Video>,
    pub categories: HashMap<Uuid, Category>,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
}

#[derive(Default)]
pub struct MemoryCatalog {
    pub state: Arc<Mutex<CatalogState>>,
    /// Make CatalogTx::insert_video fail (persistence failure injection).
    pub fail_insert_video: AtomicBool,
    /// Make the delete-likes step of the cascade fail mid-transaction.
    pub fail_delete_likes: AtomicBool,
}

impl MemoryCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed_category(&self, name: &str) -> Category {
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.state
            .lock()
            .unwrap()
            .categories
            .insert(category.id, category.clone());
        category
    }

    pub fn seed_video(&self, title: &str, category_id: Option<Uuid>) -> Video {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            category_id,
            media_id: Some(format!("media-{}", Uuid::new_v4())),
            media_url: Some("https://host.test/video".to_string()),
            thumbnail_url: None,
            view_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.state
            .lock()
            .unwrap()
            .videos
            .insert(video.id, video.clone());
        video
    }

    pub fn set_created_at(&self, video_id: Uuid, created_at: chrono::DateTime<Utc>) {
        let mut state = self.state.lock().unwrap();
        let video = state.videos.get_mut(&video_id).unwrap();
        video.created_at = created_at;
    }

    pub fn seed_provisioning_video(&self, title: &str) -> Video {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            category_id: None,
            media_id: None,
            media_url: None,
            thumbnail_url: None,
            view_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.state
            .lock()
            .unwrap()
            .videos
            .insert(video.id, video.clone());
        video
    }

    pub fn set_thumbnail(&self, video_id: Uuid, url: &str) {
        let mut state = self.state.lock().unwrap();
        let video = state.videos.get_mut(&video_id).unwrap();
        video.thumbnail_url = Some(url.to_string());
    }

    pub fn seed_comment(&self, video_id: Uuid, user_id: Uuid, text: &str) -> Comment {
        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            user_id,
            video_id,
            text: text.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.state.lock().unwrap().comments.push(comment.clone());
        comment
    }

    pub fn seed_like(&self, video_id: Uuid, user_id: Uuid) -> Like {
        let like = Like {
            id: Uuid::new_v4(),
            user_id,
            video_id,
            created_at: Utc::now(),
        };
        self.state.lock().unwrap().likes.push(like.clone());
        like
    }

    pub fn video_count(&self) -> usize {
        self.state.lock().unwrap().videos.len()
    }
}

enum Staged {
    InsertVideo(Video),
    UpdateVideo(Video),
    DeleteCommentsFor(Uuid),
    DeleteLikesFor(Uuid),
    DeleteVideo(Uuid),
}

pub struct MemoryTx {
    state: Arc<Mutex<CatalogState>>,
    staged: Vec<Staged>,
    fail_insert_video: bool,
    fail_delete_likes: bool,
}

#[async_trait]
impl CatalogTx for MemoryTx {
    async fn insert_video(&mut self, video: &NewVideo) -> Result<Video> {
        if self.fail_insert_video {
            return Err(AppError::Database("injected insert failure".to_string()));
        }
        let now = Utc::now();
        let row = Video {
            id: Uuid::new_v4(),
            title: video.title.clone(),
            description: video.description.clone(),
            category_id: video.category_id,
            media_id: Some(video.media_id.clone()),
            media_url: Some(video.media_url.clone()),
            thumbnail_url: video.thumbnail_url.clone(),
            view_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.staged.push(Staged::InsertVideo(row.clone()));
        Ok(row)
    }

    async fn update_video(&mut self, video_id: Uuid, changes: &VideoChanges) -> Result<Video> {
        let mut row = {
            let state = self.state.lock().unwrap();
            state
                .videos
                .get(&video_id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("video {} not found", video_id)))?
        };
        if let Some(title) = &changes.title {
            row.title = title.clone();
        }
        if let Some(category_id) = changes.category_id {
            row.category_id = Some(category_id);
        }
        if let Some(url) = &changes.thumbnail_url {
            row.thumbnail_url = Some(url.clone());
        }
        row.updated_at = Utc::now();
        self.staged.push(Staged::UpdateVideo(row.clone()));
        Ok(row)
    }

    async fn delete_comments_for_video(&mut self, video_id: Uuid) -> Result<u64> {
        let count = {
            let state = self.state.lock().unwrap();
            state
                .comments
                .iter()
                .filter(|c| c.video_id == video_id)
                .count() as u64
        };
        self.staged.push(Staged::DeleteCommentsFor(video_id));
        Ok(count)
    }

    async fn delete_likes_for_video(&mut self, video_id: Uuid) -> Result<u64> {
        if self.fail_delete_likes {
            return Err(AppError::Database(
                "injected like-cascade failure".to_string(),
            ));
        }
        let count = {
            let state = self.state.lock().unwrap();
            state.likes.iter().filter(|l| l.video_id == video_id).count() as u64
        };
        self.staged.push(Staged::DeleteLikesFor(video_id));
        Ok(count)
    }

    async fn delete_video(&mut self, video_id: Uuid) -> Result<()> {
        let exists = self.state.lock().unwrap().videos.contains_key(&video_id);
        if !exists {
            return Err(AppError::NotFound(format!("video {} not found", video_id)));
        }
        self.staged.push(Staged::DeleteVideo(video_id));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        for op in self.staged {
            match op {
                Staged::InsertVideo(video) | Staged::UpdateVideo(video) => {
                    state.videos.insert(video.id, video);
                }
                Staged::DeleteCommentsFor(id) => state.comments.retain(|c| c.video_id != id),
                Staged::DeleteLikesFor(id) => state.likes.retain(|l| l.video_id != id),
                Staged::DeleteVideo(id) => {
                    state.videos.remove(&id);
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn begin(&self) -> Result<Box<dyn CatalogTx>> {
        Ok(Box::new(MemoryTx {
            state: self.state.clone(),
            staged: Vec::new(),
            fail_insert_video: self.fail_insert_video.load(Ordering::SeqCst),
            fail_delete_likes: self.fail_delete_likes.load(Ordering::SeqCst),
        }))
    }

    async fn get_video(&self, video_id: Uuid) -> Result<Option<Video>> {
        Ok(self.state.lock().unwrap().videos.get(&video_id).cloned())
    }

    async fn get_category(&self, category_id: Uuid) -> Result<Option<Category>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .categories
            .get(&category_id)
            .cloned())
    }

    async fn insert_like(&self, video_id: Uuid, user_id: Uuid) -> Result<Like> {
        let mut state = self.state.lock().unwrap();
        if state
            .likes
            .iter()
            .any(|l| l.video_id == video_id && l.user_id == user_id)
        {
            return Err(AppError::Conflict("duplicate like".to_string()));
        }
        let like = Like {
            id: Uuid::new_v4(),
            user_id,
            video_id,
            created_at: Utc::now(),
        };
        state.likes.push(like.clone());
        Ok(like)
    }

    async fn delete_like(&self, video_id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.likes.len();
        state
            .likes
            .retain(|l| !(l.video_id == video_id && l.user_id == user_id));
        Ok(state.likes.len() < before)
    }

    async fn like_count(&self, video_id: Uuid) -> Result<i64> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .likes
            .iter()
            .filter(|l| l.video_id == video_id)
            .count() as i64)
    }

    async fn insert_comment(&self, video_id: Uuid, user_id: Uuid, text: &str) -> Result<Comment> {
        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            user_id,
            video_id,
            text: text.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.state.lock().unwrap().comments.push(comment.clone());
        Ok(comment)
    }

    async fn get_comment(&self, comment_id: Uuid) -> Result<Option<Comment>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .comments
            .iter()
            .find(|c| c.id == comment_id)
            .cloned())
    }

    async fn update_comment(&self, comment_id: Uuid, text: &str) -> Result<Comment> {
        let mut state = self.state.lock().unwrap();
        let comment = state
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| AppError::NotFound(format!("comment {} not found", comment_id)))?;
        comment.text = text.to_string();
        comment.updated_at = Utc::now();
        Ok(comment.clone())
    }

    async fn delete_comment(&self, comment_id: Uuid) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let before = state.comments.len();
        state.comments.retain(|c| c.id != comment_id);
        if state.comments.len() == before {
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
        let state = self.state.lock().unwrap();
        let mut comments: Vec<Comment> = state
            .comments
            .iter()
            .filter(|c| c.video_id == video_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(comments
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn comment_count(&self, video_id: Uuid) -> Result<i64> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .comments
            .iter()
            .filter(|c| c.video_id == video_id)
            .count() as i64)
    }

    async fn record_view(&self, video_id: Uuid) -> Result<Option<i64>> {
        let mut state = self.state.lock().unwrap();
        Ok(state.videos.get_mut(&video_id).map(|v| {
            v.view_count += 1;
            v.view_count
        }))
    }

    async fn list_videos(&self, filter: &VideoFilter) -> Result<Vec<VideoListItem>> {
        let state = self.state.lock().unwrap();
        let mut published: Vec<&Video> = state
            .videos
            .values()
            .filter(|v| v.media_id.is_some())
            .filter(|v| match &filter.query {
                Some(q) => v.title.to_lowercase().contains(&q.to_lowercase()),
                None => true,
            })
            .filter(|v| match filter.category_id {
                Some(id) => v.category_id == Some(id),
                None => true,
            })
            .collect();
        published.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        Ok(published
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .map(|v| VideoListItem {
                id: v.id,
                title: v.title.clone(),
                description: v.description.clone(),
                media_url: v.media_url.clone(),
                thumbnail_url: v.thumbnail_url.clone(),
                category: v
                    .category_id
                    .and_then(|id| state.categories.get(&id))
                    .map(|c| c.name.clone()),
                view_count: v.view_count,
                like_count: state.likes.iter().filter(|l| l.video_id == v.id).count() as i64,
                comment_count: state
                    .comments
                    .iter()
                    .filter(|c| c.video_id == v.id)
                    .count() as i64,
                created_at: v.created_at,
            })
            .collect())
    }

    async fn suggest_titles(&self, prefix: &str, limit: i64) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        let lower = prefix.to_lowercase();
        let mut titles: Vec<String> = state
            .videos
            .values()
            .filter(|v| v.media_id.is_some() && v.title.to_lowercase().starts_with(&lower))
            .map(|v| v.title.clone())
            .collect();
        titles.sort();
        titles.dedup();
        titles.truncate(limit.max(0) as usize);
        Ok(titles)
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let state = self.state.lock().unwrap();
        Ok(DashboardStats {
            total_videos: state.videos.values().filter(|v| v.media_id.is_some()).count() as i64,
            total_categories: state.categories.len() as i64,
            total_likes: state.likes.len() as i64,
            total_comments: state.comments.len() as i64,
        })
    }
}

// ========================================
// Gateways
// ========================================

#[derive(Default)]
pub struct MockMediaHost {
    pub uploads: AtomicUsize,
    pub deletes: Mutex<Vec<String>>,
    pub fail_upload: AtomicBool,
    pub fail_delete: AtomicBool,
}

impl MockMediaHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn upload_calls(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn deleted_ids(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaHost for MockMediaHost {
    async fn upload(&self, _file: Bytes, title: &str) -> Result<MediaRef> {
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(AppError::Upload("injected upload failure".to_string()));
        }
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(MediaRef {
            id: format!("asset-{n}"),
            url: format!("https://host.test/videos/asset-{n}?title={title}"),
        })
    }

    async fn delete(&self, media_id: &str) -> Result<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(AppError::MediaDeletion(
                "injected delete failure".to_string(),
            ));
        }
        self.deletes.lock().unwrap().push(media_id.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockThumbnailStore {
    pub stored: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
    pub fail_store: AtomicBool,
}

impl MockThumbnailStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn stored_urls(&self) -> Vec<String> {
        self.stored.lock().unwrap().clone()
    }

    pub fn deleted_urls(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ThumbnailStore for MockThumbnailStore {
    async fn store(&self, data: Bytes, content_type: &str) -> Result<String> {
        validate_thumbnail(content_type, data.len())?;
        if self.fail_store.load(Ordering::SeqCst) {
            return Err(AppError::Internal("injected store failure".to_string()));
        }
        let url = format!("https://thumbs.test/{}", Uuid::new_v4());
        self.stored.lock().unwrap().push(url.clone());
        Ok(url)
    }

    async fn delete(&self, url: &str) -> Result<()> {
        self.deleted.lock().unwrap().push(url.to_string());
        Ok(())
    }
}
