//! Haven Server - always-on backend for risk evaluation and alerting

mod api;
mod config;
mod persistence;
mod state;

use anyhow::{Context, Result};
use axum::routing::get;
use haven_core::{StaticZones, ZoneSource};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("haven_server=debug".parse()?),
        )
        .init();

    tracing::info!("Starting Haven Server...");

    let config = Config::from_env();
    let port = config.server_port;

    let db = persistence::init_database(&config.database_path, config.database_max_connections)
        .await
        .context("database init failed")?;

    let fallback = load_fallback_zones(&config)?;
    let state = Arc::new(AppState::new(db, fallback));
    state.load_from_database().await?;

    // Build the app
    let app = api::routes()
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(CorsLayer::permissive());

    // Run server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Fallback zone source used while the store is empty. Loaded from the
/// optional seed file; nothing is compiled in.
fn load_fallback_zones(config: &Config) -> Result<Box<dyn ZoneSource>> {
    let Some(path) = config.seed_zones_path.as_deref() else {
        return Ok(Box::new(StaticZones::default()));
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading seed zones from {path}"))?;
    let source = StaticZones::from_json(&json)?;
    tracing::info!("Loaded fallback zones from {}", path);
    Ok(Box::new(source))
}
