//! # Finality Gadget Block Index
//!
//! Durable index of finalized blocks. Answers, in O(1) lookups, whether a
//! block (by height or by hash) has reached finality, and which blocks bound
//! the known-finalized range.
//!
//! ## Layout on disk
//!
//! Three regions, all updated atomically per batch insert:
//!
//! ```text
//! blocks         height (u64 BE) ──→ Block (JSON)
//! block_heights  hash            ──→ height (u64 BE)
//! indexer        earliest / latest / activated_timestamp ──→ u64 BE
//! ```
//!
//! ## Invariants
//!
//! | Invariant | Description |
//! |-----------|-------------|
//! | Coupled indexes | Every stored block has exactly one hash entry naming its height |
//! | First batch wins | `earliest` is the minimum of the first batch ever inserted |
//! | Monotonic latest | `latest` never decreases |
//! | Atomic batches | A batch, its index entries and the bounds commit together |
//! | Single process | One open handle per data directory |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Pure domain logic (blocks, keys, bounds, config, errors)
//! - `ports/` - Port traits (inbound API, outbound engine)
//! - `adapters/` - RocksDB and in-memory engines, directory lock, query handler
//! - `service/` - `BlockIndexStore`, implementing the API over any engine
//!
//! ## Usage
//!
//! ```ignore
//! use fg_block_index::{Block, BlockIndexApi, BlockIndexStore, StoreConfig};
//!
//! let store = BlockIndexStore::open(StoreConfig::from_env())?;
//! store.create_initial_schema()?;
//!
//! store.insert_blocks(&[Block::new(5, "0x05", 1718332131)])?;
//! assert!(store.query_is_block_finalized_by_height(5)?);
//!
//! store.close()?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(test)]
mod test_utils;

// Re-export key types for convenience
pub use domain::block::{blocks_from_views, Block, BlockView, HeightRange};
pub use domain::config::StoreConfig;
pub use domain::errors::{BoundKind, KVStoreError, LockError, LookupKey, StorageError};
pub use domain::keys::Bucket;
pub use ports::inbound::BlockIndexApi;
pub use ports::outbound::{KeyValueStore, ReadTransaction, WriteTransaction};
pub use service::BlockIndexStore;

pub use adapters::{FaultyKVStore, InMemoryKVStore};
#[cfg(feature = "rocksdb")]
pub use adapters::{DatabaseLock, RocksDbStore};

#[cfg(feature = "api")]
pub use adapters::api_handler::{
    handle_api_query, ApiQueryError, FinalityQueryHandler, FinalizedRange, RpcError,
};
