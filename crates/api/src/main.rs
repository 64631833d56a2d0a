//! Report Store - Main Entry Point

use anyhow::Context;
use api::{run_server, telemetry::init_logging, ApiConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::load().context("Failed to load configuration")?;

    init_logging(config.log_format, &config.log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        store = ?config.store,
        "Starting report store"
    );

    run_server(config).await
}
