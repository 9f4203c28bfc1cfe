//! Video handlers - HTTP endpoints for video lifecycle and listing

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::handlers::AppState;
use crate::middleware::CallerIdentity;
use crate::models::VideoChanges;
use crate::services::{NewVideoUpload, ThumbnailUpload};

/// Fields collected from a multipart video form. Create and update share the
/// same shape; update simply leaves most of it unset.
#[derive(Default)]
struct VideoForm {
    title: Option<String>,
    description: Option<String>,
    category_id: Option<Uuid>,
    file: Option<(String, Bytes)>,
    thumbnail: Option<(String, Bytes)>,
}

async fn read_video_form(mut payload: Multipart) -> Result<VideoForm> {
    let mut form = VideoForm::default();

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::Validation(format!("multipart error: {}", e)))?;
        let name = field.name().to_string();
        let content_type = field.content_type().essence_str().to_string();

        let mut data = BytesMut::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::Validation(format!("multipart read error: {}", e)))?;
            data.extend_from_slice(&chunk);
        }
        let data = data.freeze();

        match name.as_str() {
            "title" => form.title = Some(utf8_field(&data, "title")?),
            "description" => form.description = Some(utf8_field(&data, "description")?),
            "category_id" => {
                let raw = utf8_field(&data, "category_id")?;
                let id = Uuid::parse_str(raw.trim()).map_err(|_| {
                    AppError::Validation("category_id is not a valid UUID".to_string())
                })?;
                form.category_id = Some(id);
            }
            "file" => form.file = Some((content_type, data)),
            "thumbnail" => form.thumbnail = Some((content_type, data)),
            _ => {
                // Ignore unknown fields
            }
        }
    }

    Ok(form)
}

fn utf8_field(data: &Bytes, name: &str) -> Result<String> {
    String::from_utf8(data.to_vec())
        .map_err(|_| AppError::Validation(format!("{} must be valid UTF-8", name)))
}

/// Create a new video from a multipart form (title, category, file, optional
/// thumbnail)
pub async fn create_video(
    state: web::Data<AppState>,
    _caller: CallerIdentity,
    payload: Multipart,
) -> Result<HttpResponse> {
    let form = read_video_form(payload).await?;

    let title = form
        .title
        .ok_or_else(|| AppError::Validation("title is required".to_string()))?;
    let (content_type, data) = form
        .file
        .ok_or_else(|| AppError::Validation("video file is required".to_string()))?;

    let upload = NewVideoUpload {
        title,
        description: form.description,
        category_id: form.category_id,
        content_type,
        data,
        thumbnail: form.thumbnail.map(|(content_type, data)| ThumbnailUpload {
            content_type,
            data,
        }),
    };

    let video = state.lifecycle.create(upload).await?;
    Ok(HttpResponse::Created().json(video))
}

/// Update title, category and/or thumbnail
pub async fn update_video(
    state: web::Data<AppState>,
    _caller: CallerIdentity,
    video_id: web::Path<Uuid>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let form = read_video_form(payload).await?;
    if form.file.is_some() {
        return Err(AppError::Validation(
            "the media file is immutable; delete and re-create the video instead".to_string(),
        ));
    }

    let changes = VideoChanges {
        title: form.title,
        category_id: form.category_id,
        thumbnail_url: None,
    };
    let thumbnail = form.thumbnail.map(|(content_type, data)| ThumbnailUpload {
        content_type,
        data,
    });

    let video = state
        .lifecycle
        .update(*video_id, changes, thumbnail)
        .await?;
    Ok(HttpResponse::Ok().json(video))
}

/// Delete a video everywhere (remote asset, engagement rows, thumbnail)
pub async fn delete_video(
    state: web::Data<AppState>,
    _caller: CallerIdentity,
    video_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    state.lifecycle.delete(*video_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Get a single video with live engagement counts
pub async fn get_video(
    state: web::Data<AppState>,
    video_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video = state.lifecycle.get(*video_id).await?;
    Ok(HttpResponse::Ok().json(video))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub query: Option<String>,
    pub category_id: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// List published videos
pub async fn list_videos(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let videos = state
        .listing
        .search(query.query, query.category_id, query.page, query.limit)
        .await?;
    Ok(HttpResponse::Ok().json(videos))
}

/// Search published videos (same contract as listing)
pub async fn search_videos(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    list_videos(state, query).await
}

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    pub query: String,
    pub limit: Option<i64>,
}

/// Title autocomplete
pub async fn suggest_titles(
    state: web::Data<AppState>,
    query: web::Query<SuggestQuery>,
) -> Result<HttpResponse> {
    let suggestions = state
        .listing
        .suggestions(&query.query, query.limit)
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "suggestions": suggestions })))
}

/// Most recently uploaded videos
pub async fn recent_videos(state: web::Data<AppState>) -> Result<HttpResponse> {
    let videos = state.listing.recent().await?;
    Ok(HttpResponse::Ok().json(videos))
}

/// Catalog-wide totals
pub async fn dashboard_stats(state: web::Data<AppState>) -> Result<HttpResponse> {
    let stats = state.engagement.dashboard_stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// Record a playback view
pub async fn record_view(
    state: web::Data<AppState>,
    video_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let views = state.engagement.record_view(*video_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "view_count": views })))
}
