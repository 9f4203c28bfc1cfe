//! Comment handlers - HTTP endpoints for comment operations

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::handlers::AppState;
use crate::middleware::CallerIdentity;

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentPage {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Add a comment to a video
pub async fn add_comment(
    state: web::Data<AppState>,
    caller: CallerIdentity,
    video_id: web::Path<Uuid>,
    body: web::Json<CommentBody>,
) -> Result<HttpResponse> {
    let comment = state
        .engagement
        .add_comment(*video_id, &caller, &body.text)
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

/// Comments for a video, newest first
pub async fn list_comments(
    state: web::Data<AppState>,
    video_id: web::Path<Uuid>,
    page: web::Query<CommentPage>,
) -> Result<HttpResponse> {
    let comments = state
        .engagement
        .comments_for(*video_id, page.limit.unwrap_or(50), page.offset.unwrap_or(0))
        .await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// Edit a comment (author or admin)
pub async fn update_comment(
    state: web::Data<AppState>,
    caller: CallerIdentity,
    comment_id: web::Path<Uuid>,
    body: web::Json<CommentBody>,
) -> Result<HttpResponse> {
    let comment = state
        .engagement
        .update_comment(*comment_id, &caller, &body.text)
        .await?;
    Ok(HttpResponse::Ok().json(comment))
}

/// Delete a comment (author or admin)
pub async fn delete_comment(
    state: web::Data<AppState>,
    caller: CallerIdentity,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    state.engagement.delete_comment(*comment_id, &caller).await?;
    Ok(HttpResponse::NoContent().finish())
}
