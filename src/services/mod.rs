//! Business services for catalog-service
//!
//! - lifecycle: create/update/delete orchestration across the external
//!   media host, the thumbnail store and the catalog
//! - engagement: likes, comments, view counts, dashboard totals
//! - listing: filtered, paginated search over published videos
//! - media_host / thumbnails: gateway adapters to the external systems

pub mod engagement;
pub mod lifecycle;
pub mod listing;
pub mod media_host;
pub mod thumbnails;

pub use engagement::Engagement;
pub use lifecycle::{NewVideoUpload, ThumbnailUpload, VideoLifecycle};
pub use listing::Listing;
pub use media_host::{HostedMediaClient, MediaHost, MediaRef};
pub use thumbnails::{S3ThumbnailStore, ThumbnailStore};
