// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::reading_source::ReadingSource;
use crate::infrastructure::config::{load_settings, SourceSettings};
use crate::infrastructure::file_source::FileReadingSource;
use crate::infrastructure::http_source::HttpReadingSource;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    api_details, api_overview, details_events, details_page, health_check, overview_events,
    overview_page,
};

fn reading_source(settings: &SourceSettings) -> anyhow::Result<Arc<dyn ReadingSource>> {
    Ok(match &settings.url {
        Some(url) => Arc::new(
            HttpReadingSource::new(url.clone(), settings.timeout())
                .context("Failed to build HTTP client")?,
        ),
        None => Arc::new(FileReadingSource::new(&settings.path)),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let settings = load_settings().context("Failed to load dashboard configuration")?;

    // Create reading source (infrastructure layer)
    let source = reading_source(&settings.source)?;
    tracing::info!("Reading air quality data from {}", source.describe());

    // Create application state
    let state = Arc::new(AppState {
        dashboard_service: DashboardService::new(source),
        display: settings.display.clone(),
        refresh_interval: settings.refresh.interval(),
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/", get(overview_page))
        .route("/details", get(details_page))
        .route("/events/overview", get(overview_events))
        .route("/events/details", get(details_events))
        .route("/api/overview", get(api_overview))
        .route("/api/details", get(api_details))
        .route("/healthz", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = settings
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", settings.server.bind))?;
    tracing::info!(
        "Starting air quality dashboard on {} (refresh every {}s)",
        addr,
        settings.refresh.interval().as_secs()
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
