//! Caller identity extraction
//!
//! Authentication itself is out of scope: an upstream gateway verifies the
//! session and forwards the caller as `x-user-id` / `x-is-admin` headers.
//! This extractor only parses those headers.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;

/// Verified caller as asserted by the upstream auth layer.
#[derive(Debug, Clone, Copy)]
pub struct CallerIdentity {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl FromRequest for CallerIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_identity(req))
    }
}

fn extract_identity(req: &HttpRequest) -> Result<CallerIdentity, AppError> {
    let user_id = req
        .headers()
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing x-user-id header".to_string()))?;

    let user_id = Uuid::parse_str(user_id)
        .map_err(|_| AppError::Unauthorized("x-user-id is not a valid UUID".to_string()))?;

    let is_admin = req
        .headers()
        .get("x-is-admin")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    Ok(CallerIdentity { user_id, is_admin })
}
