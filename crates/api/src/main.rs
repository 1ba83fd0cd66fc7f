//! EsignBridge server entry point

use std::sync::Arc;

use anyhow::Context;
use esignbridge_api::utils::logging::init_tracing;
use esignbridge_api::{build_router, AppContext};
use esignbridge_infra::config;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    let config = config::load().context("failed to load configuration")?;
    // Guard flushes the file appender on drop
    let _guard = init_tracing(&config.logging).context("failed to initialise tracing")?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(err) => warn!(error = %err, "No .env file loaded"),
    }

    let addr = format!("{}:{}", config.app.host, config.app.port);
    let ctx = Arc::new(AppContext::new(config).context("failed to initialise application")?);
    ctx.folders.ensure_directories().await.context("failed to create document folders")?;

    let listener = TcpListener::bind(&addr).await.with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "EsignBridge listening");

    axum::serve(listener, build_router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("EsignBridge stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
    }
}
