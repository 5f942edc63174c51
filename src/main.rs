use anyhow::{Context, Result};
use std::{env, net::SocketAddr, sync::Arc};
use tracing::{info, warn};

mod api;
mod badge;
mod error;
mod providers;
mod state;

use providers::Providers;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file, ignore errors if .env is missing
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    // --- Configuration ---
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port_str = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let port: u16 = port_str
        .parse()
        .with_context(|| format!("Invalid PORT value: {}", port_str))?;

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid HOST/PORT combination: {}:{}", host, port))?;

    // The GitHub token is read once here and handed to the client;
    // adapters never read process environment themselves.
    let github_token = env::var("GITHUB_TOKEN").ok();
    if github_token.is_none() {
        warn!("GITHUB_TOKEN is not set, GitHub API requests will be unauthenticated");
    }
    let providers = Arc::new(Providers::new(github_token));

    // --- Axum Router Setup ---
    let app = api::create_router(providers);

    // --- Start Server ---
    info!("Starting server, listening on http://{}", addr);
    info!("Access Scalar UI at http://{}/scalar", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")?;

    Ok(())
}

/// Stop accepting new connections on CTRL+C and drain in-flight requests.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    info!("Shutdown signal received, terminating...");
}
