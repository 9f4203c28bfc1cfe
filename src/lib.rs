//! Catalog Service
//!
//! Video-catalog backend: video metadata, categories, likes and comments over
//! Postgres, with the media file hosted by an external streaming provider and
//! thumbnails in object storage. The lifecycle orchestrator keeps the three
//! systems consistent across create/update/delete.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

// Public re-exports
pub use config::Config;
pub use error::{AppError, Result};
