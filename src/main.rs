//! campus-league server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use campus_league::app_state::AppState;
use campus_league::build_app;
use campus_league::config::{LogFormat, PortalConfig, StoreBackend};
use campus_league::domain::EventBus;
use campus_league::persistence::{Stores, postgres};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = PortalConfig::from_env()
        .map_err(|e| anyhow::anyhow!(e))
        .context("invalid configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::info!(
        addr = %config.listen_addr,
        backend = ?config.store_backend,
        "starting campus-league"
    );

    // Build persistence layer
    let stores = match config.store_backend {
        StoreBackend::Memory => Stores::in_memory(),
        StoreBackend::Postgres => {
            let pool = postgres::connect(&config)
                .await
                .context("failed to connect to PostgreSQL")?;
            Stores::postgres(pool)
        }
    };

    // Build service layer and application state
    let event_bus = EventBus::new(config.event_bus_capacity);
    let app_state = AppState::new(&stores, event_bus);

    // Build router
    let app = build_app(app_state, Duration::from_secs(config.request_timeout_secs));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
