//! # Finality Node
//!
//! Opens the block index, holds it until Ctrl+C, then closes it.
//!
//! Configuration comes from the environment only (`FG_DATA_DIR`,
//! `FG_DB_OPEN_TIMEOUT_MS`, `FG_ACTIVATED_TIMESTAMP`, `FG_LOG_LEVEL`, ...).

use anyhow::{Context, Result};
use tracing::info;

use fg_node::{FinalityNode, NodeConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::from_env()?;
    fg_telemetry::init_telemetry(&config.telemetry)?;

    info!(
        data_dir = %config.store.data_dir.display(),
        "Starting finality node"
    );

    // Opening may wait on the directory lock; keep it off the async workers.
    let node = tokio::task::spawn_blocking(move || FinalityNode::start(&config))
        .await
        .context("startup task panicked")??;

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    info!("Initiating graceful shutdown...");
    tokio::task::spawn_blocking(move || node.shutdown())
        .await
        .context("shutdown task panicked")??;

    Ok(())
}
