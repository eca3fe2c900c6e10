//! autovia HTTP server - thin transport wrapper around the routing core.
//!
//! The road network is built synchronously before the listener binds, so
//! no request is accepted against a half-built graph; a construction
//! failure aborts startup.

mod api;
mod config;
mod state;

use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use autovia_core::loading::{RoadModelConfig, create_road_network};

use config::{Args, ServerConfig};
use state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::resolve(Args::parse())?;

    info!("Building road network from {}", config.nodes.display());
    let model_config = RoadModelConfig {
        nodes_path: config.nodes.clone(),
        edges_path: config.edges.clone(),
        speeds: config.speeds.clone(),
    };
    let network = create_road_network(&model_config)?;
    info!("Road network ready");

    let state = AppState {
        network: Arc::new(network),
    };
    let router = api::build_router(state, config.web_dir.clone());

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    info!("Listening on {}", config.listen);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install ctrl-c handler: {error}");
        return;
    }
    info!("Shutdown signal received");
}
