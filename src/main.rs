//! Warmapper Backend Server
//!
//! Parses Wigle WiFi scan exports, serves dashboard statistics and stores
//! shared access points.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    WARMAPPER SERVER                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────────┐  ┌──────────────────┐ │
//! │  │  API      │  │  WiFi Core       │  │  Data Service    │ │
//! │  │  Router   │─►│  parse/classify/ │◄─│  (records cache) │ │
//! │  │  (Axum)   │  │  aggregate       │  │                  │ │
//! │  └─────┬─────┘  └──────────────────┘  └──────────────────┘ │
//! │        ▼                                                    │
//! │  ┌─────────────┐  unreachable  ┌──────────────────────┐    │
//! │  │ PostgreSQL  │ ────────────► │ data-fallback.json   │    │
//! │  └─────────────┘               └──────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod error;
mod fallback;
mod handlers;
mod models;
mod wifi;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, delete},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::net::SocketAddr;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging, JSON lines in production
    let production = config.is_production();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warmapper_server=debug,tower_http=debug".into()))
        .with((!production).then(tracing_subscriber::fmt::layer))
        .with(production.then(|| tracing_subscriber::fmt::layer().json()))
        .init();

    tracing::info!("Warmapper server starting ({})...", config.environment);

    let pool = match &config.database_url {
        Some(url) => {
            tracing::info!("Database: {}", url.split('@').last().unwrap_or("***"));
            connect_database(url, &config).await
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using fallback storage only");
            None
        }
    };
    tracing::info!("Fallback storage: {}", config.fallback_storage_path.display());

    // Build application state
    let state = AppState {
        pool,
        wifi: wifi::WifiDataService::new(&config.sample_data_path),
        fallback: fallback::FallbackStore::new(&config.fallback_storage_path),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Lazy pool plus schema. Any failure leaves the server on fallback storage.
async fn connect_database(url: &str, config: &config::Config) -> Option<sqlx::PgPool> {
    let pool = match db::create_pool(url, config.db_acquire_timeout) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Invalid DATABASE_URL, using fallback storage: {}", e);
            return None;
        }
    };

    tracing::info!("Running database migrations...");
    if let Err(e) = db::run_migrations(&pool).await {
        tracing::warn!("Database unavailable at startup, requests will retry: {}", e);
    }

    Some(pool)
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: Option<sqlx::PgPool>,
    pub config: config::Config,
    pub wifi: wifi::WifiDataService,
    pub fallback: fallback::FallbackStore,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    // Shared access points
    let storage_routes = Router::new()
        .route("/api/access-points", get(handlers::access_points::list))
        .route("/api/access-points", post(handlers::access_points::create))
        .layer(body_limit);

    // Dashboard data over the service cache
    let dashboard_routes = Router::new()
        .route("/api/upload", post(handlers::wifi::upload))
        .route("/api/sample", get(handlers::wifi::sample))
        .route("/api/dashboard", get(handlers::wifi::dashboard))
        .route("/api/table", get(handlers::wifi::table))
        .route("/api/cache", delete(handlers::wifi::clear_cache))
        .layer(body_limit);

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health::check))
        .merge(storage_routes)
        .merge(dashboard_routes)
        .fallback(handlers::not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
