// ABOUTME: HTTP server binary for the CookAI kitchen API
// ABOUTME: Loads .env, initializes logging, then reads configuration and serves the axum router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `CookAI` Server Binary
//!
//! Starts the kitchen API: recipe suggestions, substitutions, nutrition
//! estimates, narration, voice input, share cards and favorites.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cookai::{
    config::environment::{self, ServerConfig},
    logging,
    resources::ServerResources,
    routes,
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "cookai-server")]
#[command(about = "CookAI - AI recipe suggestions from the ingredients you have")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override the favorites file location
    #[arg(long)]
    favorites_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // .env may carry the log settings, so it is read before logging starts
    let dotenv = environment::load_dotenv();
    logging::init_from_env()?;
    match dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) => warn!("No .env file found or failed to load: {}", e),
    }

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(favorites_path) = args.favorites_path {
        config.favorites_path = favorites_path;
    }

    info!("Starting CookAI server");
    info!("{}", config.summary());

    let resources = Arc::new(ServerResources::from_config(&config).await?);
    let app = routes::router(resources);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind HTTP port {}", config.http_port))?;
    info!("HTTP server listening on http://{addr}");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
