//! Error types for catalog-service
//!
//! Every error carries a machine-distinguishable kind plus a human-readable
//! message; the `ResponseError` impl maps kinds to HTTP responses.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use std::fmt;

/// Result type for catalog-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Bad input shape or value, rejected before any external effect
    Validation(String),

    /// Referenced entity absent
    NotFound(String),

    /// Uniqueness violation (duplicate like)
    Conflict(String),

    /// External media provider rejected or failed an upload
    Upload(String),

    /// External media provider rejected or failed an asset deletion
    MediaDeletion(String),

    /// Content type outside the allow-list
    UnsupportedMedia(String),

    /// Payload exceeds the configured size limit
    PayloadTooLarge(String),

    /// Caller lacks identity headers
    Unauthorized(String),

    /// Caller is neither the owner nor an admin
    Forbidden(String),

    /// Database operation failed
    Database(String),

    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Stable machine-readable kind for API clients.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Upload(_) => "upload_error",
            AppError::MediaDeletion(_) => "deletion_error",
            AppError::UnsupportedMedia(_) => "unsupported_media",
            AppError::PayloadTooLarge(_) => "payload_too_large",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::Database(_) => "database_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Upload(msg) => write!(f, "Media upload failed: {}", msg),
            AppError::MediaDeletion(msg) => write!(f, "Media deletion failed: {}", msg),
            AppError::UnsupportedMedia(msg) => write!(f, "Unsupported media type: {}", msg),
            AppError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// JSON error body
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    status: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upload(_) | AppError::MediaDeletion(_) => StatusCode::BAD_GATEWAY,
            AppError::UnsupportedMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorBody {
            error: self.kind(),
            message: self.to_string(),
            status: status.as_u16(),
        })
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(db.to_string())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::Validation(db.to_string())
            }
            sqlx::Error::RowNotFound => AppError::NotFound("row not found".to_string()),
            _ => AppError::Database(err.to_string()),
        }
    }
}
