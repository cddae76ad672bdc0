// Expense Tracker - Web Server
// REST API with Axum

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use expense_tracker::api::{router, AppState};
use expense_tracker::config::ServerConfig;
use expense_tracker::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = ServerConfig::parse();

    let store = config.db.open_store()?;
    tracing::info!(database = %config.db.database, "database opened");

    let state = AppState::new(Arc::new(store), config.request_timeout());
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    tracing::info!(addr = %config.bind, version = expense_tracker::VERSION, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
