use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use catalog_service::db::{CatalogStore, PgCatalog};
use catalog_service::handlers::{self, AppState};
use catalog_service::services::{
    Engagement, HostedMediaClient, Listing, MediaHost, S3ThumbnailStore, ThumbnailStore,
    VideoLifecycle,
};
use catalog_service::Config;

async fn health(pool: web::Data<sqlx::PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "catalog-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "catalog-service"
        })),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("failed to load configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("failed to connect to PostgreSQL")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    let catalog: Arc<dyn CatalogStore> = Arc::new(PgCatalog::new(pool.clone()));
    let media: Arc<dyn MediaHost> = Arc::new(HostedMediaClient::from_config(&config.media_host)?);
    let thumbnails: Arc<dyn ThumbnailStore> =
        Arc::new(S3ThumbnailStore::from_config(&config.thumbnails).await?);

    let state = web::Data::new(AppState {
        lifecycle: Arc::new(VideoLifecycle::new(
            catalog.clone(),
            media.clone(),
            thumbnails.clone(),
        )),
        engagement: Arc::new(Engagement::new(catalog.clone())),
        listing: Arc::new(Listing::new(catalog.clone())),
    });

    let bind_addr = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!(addr = %bind_addr, env = %config.app.env, "starting catalog-service");

    let pool_data = web::Data::new(pool);
    let cors_config = config.cors.clone();
    HttpServer::new(move || {
        let cors = if cors_config.allows_any_origin() {
            Cors::permissive()
        } else {
            cors_config
                .allowed_origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
                .allow_any_header()
                .max_age(3600)
        };
        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(state.clone())
            .app_data(pool_data.clone())
            .route("/health", web::get().to(health))
            .configure(handlers::configure)
    })
    .bind(&bind_addr)
    .context("failed to bind HTTP listener")?
    .run()
    .await?;

    Ok(())
}
