//! Search/Listing Service
//!
//! Paginated, filterable listing over published videos, joined with category
//! names and live engagement counts. Ordering is newest-created first with
//! the id as a stable tie-break so pagination stays deterministic under
//! timestamp ties.

use std::sync::Arc;

use uuid::Uuid;

use crate::db::CatalogStore;
use crate::error::{AppError, Result};
use crate::models::{VideoFilter, VideoListItem};

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;
const RECENT_LIMIT: i64 = 5;
const MAX_SUGGESTION_QUERY_CHARS: usize = 50;

pub struct Listing {
    catalog: Arc<dyn CatalogStore>,
}

impl Listing {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    /// Search published videos by title substring and/or category.
    pub async fn search(
        &self,
        query: Option<String>,
        category_id: Option<Uuid>,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<VideoListItem>> {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let query = query.map(|q| q.trim().to_string()).filter(|q| !q.is_empty());

        let filter = VideoFilter {
            query,
            category_id,
            offset: page.saturating_sub(1).saturating_mul(limit),
            limit,
        };
        self.catalog.list_videos(&filter).await
    }

    /// Most recently uploaded videos, for the dashboard.
    pub async fn recent(&self) -> Result<Vec<VideoListItem>> {
        let filter = VideoFilter {
            limit: RECENT_LIMIT,
            ..VideoFilter::default()
        };
        self.catalog.list_videos(&filter).await
    }

    /// Title autocomplete suggestions.
    pub async fn suggestions(&self, prefix: &str, limit: Option<i64>) -> Result<Vec<String>> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(AppError::Validation(
                "suggestion query must not be empty".to_string(),
            ));
        }
        if prefix.chars().count() > MAX_SUGGESTION_QUERY_CHARS {
            return Err(AppError::Validation(format!(
                "suggestion query exceeds {MAX_SUGGESTION_QUERY_CHARS} characters"
            )));
        }
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 20);
        self.catalog.suggest_titles(prefix, limit).await
    }
}
