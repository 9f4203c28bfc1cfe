//! HTTP handlers for the video-management API surface

pub mod comments;
pub mod likes;
pub mod videos;

use std::sync::Arc;

use actix_web::web;

use crate::services::{Engagement, Listing, VideoLifecycle};

/// Shared handler state: the three services behind the API.
pub struct AppState {
    pub lifecycle: Arc<VideoLifecycle>,
    pub engagement: Arc<Engagement>,
    pub listing: Arc<Listing>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/videos")
            .route("", web::post().to(videos::create_video))
            .route("", web::get().to(videos::list_videos))
            .route("/search", web::get().to(videos::search_videos))
            .route("/suggestions", web::get().to(videos::suggest_titles))
            .route("/recent", web::get().to(videos::recent_videos))
            .route("/dashboard/stats", web::get().to(videos::dashboard_stats))
            .route("/{video_id}", web::get().to(videos::get_video))
            .route("/{video_id}", web::put().to(videos::update_video))
            .route("/{video_id}", web::delete().to(videos::delete_video))
            .route("/{video_id}/view", web::post().to(videos::record_view))
            .route("/{video_id}/likes", web::post().to(likes::like_video))
            .route("/{video_id}/likes", web::delete().to(likes::unlike_video))
            .route("/{video_id}/likes/count", web::get().to(likes::like_count))
            .route("/{video_id}/comments", web::post().to(comments::add_comment))
            .route("/{video_id}/comments", web::get().to(comments::list_comments)),
    )
    .service(
        web::scope("/comments")
            .route("/{comment_id}", web::put().to(comments::update_comment))
            .route("/{comment_id}", web::delete().to(comments::delete_comment)),
    );
}
