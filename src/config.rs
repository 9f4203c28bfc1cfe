//! Configuration management for catalog-service
//!
//! Loads configuration from environment variables with sensible defaults.
//! Gateway credentials are explicit config objects handed to the gateway
//! constructors, never process-wide state.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub media_host: MediaHostConfig,
    pub thumbnails: ThumbnailStorageConfig,
    pub cors: CorsConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub env: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// External video-hosting provider (Vimeo-style REST API).
#[derive(Clone, Debug, Deserialize)]
pub struct MediaHostConfig {
    pub api_base: String,
    pub access_token: String,
    /// Upload/delete call timeout in seconds.
    pub timeout_secs: u64,
}

/// Object storage for thumbnail images.
#[derive(Clone, Debug, Deserialize)]
pub struct ThumbnailStorageConfig {
    pub bucket: String,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub endpoint: Option<String>,
    /// Base URL thumbnails are served from, e.g. a CDN distribution.
    pub public_base_url: String,
}

/// Cross-origin policy for the HTTP surface. `*` opens it up for local
/// development; production deployments list their frontends explicitly.
#[derive(Clone, Debug, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            app: AppConfig {
                host: std::env::var("CATALOG_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("CATALOG_SERVICE_PORT")
                    .unwrap_or_else(|_| "8083".to_string())
                    .parse()
                    .unwrap_or(8083),
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/catalog".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
            },
            media_host: MediaHostConfig {
                api_base: std::env::var("MEDIA_HOST_API_BASE")
                    .unwrap_or_else(|_| "https://api.vimeo.com".to_string()),
                access_token: std::env::var("MEDIA_HOST_ACCESS_TOKEN").unwrap_or_default(),
                timeout_secs: std::env::var("MEDIA_HOST_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "300".to_string())
                    .parse()
                    .unwrap_or(300),
            },
            thumbnails: ThumbnailStorageConfig {
                bucket: std::env::var("THUMBNAIL_BUCKET")
                    .unwrap_or_else(|_| "catalog-thumbnails".to_string()),
                region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                access_key_id: std::env::var("AWS_ACCESS_KEY_ID").ok(),
                secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY").ok(),
                endpoint: std::env::var("THUMBNAIL_S3_ENDPOINT").ok(),
                public_base_url: std::env::var("THUMBNAIL_PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| "https://cdn.example.com/thumbnails".to_string()),
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(
                    &std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
                ),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_list_is_comma_separated() {
        assert_eq!(
            parse_origins("https://a.example, https://b.example ,"),
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn wildcard_allows_any_origin() {
        let cfg = CorsConfig {
            allowed_origins: parse_origins("*"),
        };
        assert!(cfg.allows_any_origin());

        let cfg = CorsConfig {
            allowed_origins: parse_origins("https://a.example"),
        };
        assert!(!cfg.allows_any_origin());
    }
}
