use actix_web::middleware::{from_fn, NormalizePath};
use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;
mod domain;
mod metrics;
mod models;
mod store;

use api::AppState;
use config::Settings;
use store::SqliteStore;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,storefront=debug"))
        )
        .init();

    tracing::info!("🚀 Starting storefront order service");

    // === 1. Settings ===
    let settings = Settings::from_env()?;
    tracing::info!(
        host = %settings.server.host,
        port = settings.server.port,
        database = %settings.database.url,
        request_timeout_secs = settings.database.request_timeout.as_secs(),
        "Configuration loaded"
    );

    // === 2. Entity store (pool + schema) ===
    let store = Arc::new(SqliteStore::connect(&settings.database).await?);

    // === 3. Prometheus metrics ===
    let metrics = Arc::new(metrics::Metrics::new()?);
    tracing::info!("📊 Metrics registry created with {} metrics", metrics.registry().gather().len());

    // === 4. Services ===
    let state = web::Data::new(AppState::new(store, metrics.clone()));
    let metrics_data = web::Data::new(metrics);

    // === 5. HTTP server ===
    // actix installs the SIGINT/SIGTERM handlers and drains in-flight
    // requests for up to `shutdown_timeout` seconds.
    tracing::info!(
        "🌐 Listening on http://{}:{}/api/v1",
        settings.server.host,
        settings.server.port
    );
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(metrics_data.clone())
            .wrap(from_fn(api::recover_panics))
            .wrap(api::cors())
            .wrap(from_fn(api::observe_request))
            .wrap(NormalizePath::trim())
            .configure(api::configure)
    })
    .shutdown_timeout(settings.shutdown_timeout.as_secs())
    .bind((settings.server.host.as_str(), settings.server.port))?
    .run()
    .await?;

    tracing::info!("👋 Server stopped");
    Ok(())
}
