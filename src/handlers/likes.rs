//! Like handlers - HTTP endpoints for like/unlike and counts

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::Result;
use crate::handlers::AppState;
use crate::middleware::CallerIdentity;

/// Like a video; a repeat like returns 409.
pub async fn like_video(
    state: web::Data<AppState>,
    caller: CallerIdentity,
    video_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let like = state.engagement.like(*video_id, caller.user_id).await?;
    Ok(HttpResponse::Created().json(like))
}

/// Remove the caller's like from a video
pub async fn unlike_video(
    state: web::Data<AppState>,
    caller: CallerIdentity,
    video_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    state.engagement.unlike(*video_id, caller.user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Live like count for a video
pub async fn like_count(
    state: web::Data<AppState>,
    video_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let count = state.engagement.like_count(*video_id).await?;
    Ok(HttpResponse::Ok().json(count))
}
