// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use axum::{
    Router,
    routing::{delete, get},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::clock::Clock;
use crate::application::live_service::LiveFeedService;
use crate::application::page_service::PageService;
use crate::application::random_source::ThreadRandom;
use crate::application::session::{SessionDefaults, SessionStore};
use crate::application::snapshot_builder::DatasetCatalog;
use crate::infrastructure::config::load_config;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    clear_datasets, get_session, health_check, invalidate_history, invalidate_snapshot,
    list_locations, list_pages, render_page, stream_live, update_session,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;
    config.validate()?;

    let clock: Arc<dyn Clock> = Arc::new(config.live.clock()?);

    // Shared dataset caches
    let catalog = Arc::new(Mutex::new(DatasetCatalog::new(
        Box::new(ThreadRandom::new()),
        clock.clone(),
        config.datasets.max_history_days,
        config.datasets.sensor_cluster_ttl(),
    )));

    let state = Arc::new(AppState {
        sessions: SessionStore::new(
            SessionDefaults {
                default_location: config.live.default_location.clone(),
                retention: config.live.retention(),
                fallback_count: config.live.fallback_count,
                idle_ttl: config.live.session_idle_ttl(),
            },
            clock.clone(),
        ),
        page_service: PageService::new(catalog.clone(), clock.clone()),
        live_service: LiveFeedService::new(clock, config.live.refresh_interval()),
        catalog,
    });

    // Compression is applied per response and per chunk by the handlers,
    // so no CompressionLayer here
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/pages", get(list_pages))
        .route("/pages/:slug", get(render_page))
        .route("/locations", get(list_locations))
        .route("/session", get(get_session).put(update_session))
        .route("/live", get(stream_live))
        .route("/datasets", delete(clear_datasets))
        .route("/datasets/snapshot/:flag", delete(invalidate_snapshot))
        .route("/datasets/history/:days", delete(invalidate_history))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(config.server.bind.as_str()).await?;
    tracing::info!("Starting city-pulse dashboard on {}", listener.local_addr()?);

    axum::serve(listener, router).await?;

    Ok(())
}
