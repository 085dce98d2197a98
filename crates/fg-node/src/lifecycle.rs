//! # Startup and Shutdown
//!
//! ## Startup Sequence
//!
//! 1. Open the block index (waits for the directory lock)
//! 2. Create the schema (idempotent)
//! 3. Record the activation timestamp, if configured and not yet stored
//! 4. Log the current finalized range
//!
//! Shutdown closes the store, which releases the directory lock.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use fg_block_index::{
    BlockIndexApi, BlockIndexStore, FinalityQueryHandler, RocksDbStore, StorageError,
};
use fg_telemetry::log_block_event;
use tracing::{info, warn};

use crate::config::NodeConfig;

/// The store as opened by the node.
pub type NodeStore = BlockIndexStore<RocksDbStore>;

/// A started node: the open store and the query surface over it.
pub struct FinalityNode {
    store: Arc<NodeStore>,
    handler: FinalityQueryHandler<NodeStore>,
}

impl FinalityNode {
    /// Run the startup sequence.
    pub fn start(config: &NodeConfig) -> Result<Self> {
        let store = BlockIndexStore::open(config.store.clone()).with_context(|| {
            format!(
                "failed to open block index at {}",
                config.store.data_dir.display()
            )
        })?;

        store
            .create_initial_schema()
            .context("failed to create block index schema")?;

        if let Some(timestamp) = config.activated_timestamp {
            record_activation_timestamp(&store, timestamp)?;
        }

        log_finalized_range(&store)?;

        let store = Arc::new(store);
        let handler = FinalityQueryHandler::new(Arc::clone(&store));
        Ok(Self { store, handler })
    }

    /// Shared handle to the store.
    pub fn store(&self) -> &Arc<NodeStore> {
        &self.store
    }

    /// Query surface over the store.
    pub fn handler(&self) -> &FinalityQueryHandler<NodeStore> {
        &self.handler
    }

    /// Close the store and release the directory lock.
    ///
    /// Fails if another component still holds a handle to the store.
    pub fn shutdown(self) -> Result<()> {
        let Self { store, handler } = self;
        drop(handler);

        let store = Arc::try_unwrap(store)
            .map_err(|_| anyhow!("block index still in use at shutdown"))?;
        store.close().context("failed to close block index")?;
        info!("Shutdown complete");
        Ok(())
    }
}

/// Save `timestamp` unless one is already stored.
///
/// Returns whether it was written. A stored value that differs is kept.
pub fn record_activation_timestamp<S: BlockIndexApi>(store: &S, timestamp: u64) -> Result<bool> {
    match store.get_activated_timestamp() {
        Ok(existing) if existing == timestamp => Ok(false),
        Ok(existing) => {
            warn!(
                stored = existing,
                configured = timestamp,
                "Activated timestamp already recorded, keeping stored value"
            );
            Ok(false)
        }
        Err(StorageError::ActivatedTimestampNotFound) => {
            store
                .save_activated_timestamp(timestamp)
                .context("failed to save activated timestamp")?;
            Ok(true)
        }
        Err(e) => Err(e).context("failed to read activated timestamp"),
    }
}

fn log_finalized_range<S: BlockIndexApi>(store: &S) -> Result<()> {
    match store.query_earliest_finalized_block() {
        Ok(block) => log_block_event!(info, "Earliest finalized block", block.height, block.hash),
        Err(e) if e.is_not_found() => info!("No finalized blocks indexed yet"),
        Err(e) => return Err(e).context("failed to read earliest finalized block"),
    }

    if let Some(block) = store
        .query_latest_finalized_block()
        .context("failed to read latest finalized block")?
    {
        log_block_event!(info, "Latest finalized block", block.height, block.hash);
    }
    Ok(())
}
