//! # Adapters Module
//!
//! Contains adapter implementations for the block index.
//!
//! ## Modules
//!
//! - `api_handler`: JSON-RPC style query surface
//! - `lock`: Database directory locking (single-process guard)
//! - `storage`: Engine implementations (RocksDB, in-memory, fault-injecting)

#[cfg(feature = "api")]
pub mod api_handler;
#[cfg(feature = "rocksdb")]
pub mod lock;
pub mod storage;

#[cfg(feature = "api")]
pub use api_handler::{handle_api_query, ApiQueryError, FinalityQueryHandler};
#[cfg(feature = "rocksdb")]
pub use lock::DatabaseLock;
pub use storage::{FaultyKVStore, InMemoryKVStore};
#[cfg(feature = "rocksdb")]
pub use storage::RocksDbStore;
