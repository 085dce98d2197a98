//! # Block Index Service
//!
//! The main service implementing the Block Index API.
//!
//! ## Architecture
//!
//! This service:
//! 1. Implements `BlockIndexApi` on top of any `KeyValueStore`
//! 2. Runs every operation as exactly one engine transaction
//! 3. Keeps no state of its own between calls (no cache, no open transaction)

mod helpers;
mod storage;

use crate::domain::errors::StorageError;
use crate::ports::outbound::KeyValueStore;

#[cfg(feature = "rocksdb")]
use crate::adapters::storage::RocksDbStore;
#[cfg(feature = "rocksdb")]
use crate::domain::config::StoreConfig;

/// The Block Index Store.
///
/// `Send + Sync` whenever the engine is; share it behind `Arc`.
pub struct BlockIndexStore<KV: KeyValueStore> {
    /// Transactional engine holding all persisted state.
    pub(crate) kv_store: KV,
}

impl<KV: KeyValueStore> BlockIndexStore<KV> {
    /// Create a store over an already opened engine.
    pub fn new(kv_store: KV) -> Self {
        Self { kv_store }
    }

    /// Borrow the underlying engine.
    pub fn kv_store(&self) -> &KV {
        &self.kv_store
    }
}

#[cfg(feature = "rocksdb")]
impl BlockIndexStore<RocksDbStore> {
    /// Open the RocksDB engine in `config.data_dir` and wrap it.
    ///
    /// Fails with `StorageError::Engine` if another handle holds the
    /// directory for longer than `config.open_timeout`.
    pub fn open(config: StoreConfig) -> Result<Self, StorageError> {
        Ok(Self::new(RocksDbStore::open(config)?))
    }
}
