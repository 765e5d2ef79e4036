// This is the server entry point. The lib.rs file exposes the router and
// processing modules for tests and external consumers.

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{debug, info};

use image_magic_lib::utils::init_logger;
use image_magic_lib::{AppState, Config, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logger(config.verbose, config.json_logs);

    info!("=== Image Magic Pro starting ===");
    debug!(
        "Upload limit: {} MB, JSON logs: {}",
        config.max_upload_mb, config.json_logs
    );

    let bind = config.bind;
    let app = router(AppState::new(config));

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
