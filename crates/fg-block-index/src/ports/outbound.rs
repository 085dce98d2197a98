//! # Outbound Ports (Driven Ports)
//!
//! The transactional key-value engine the block index is built on.
//!
//! Every public store operation runs as exactly one `view` (read-only) or
//! `update` (read-write) transaction. The engine guarantees:
//!
//! - `update` commits all staged writes or none of them
//! - writers are serialized
//! - a `view` never observes a partially committed `update`

use crate::domain::errors::{KVStoreError, StorageError};
use crate::domain::keys::Bucket;

/// Read access inside a transaction.
pub trait ReadTransaction {
    /// Get a value by key from `bucket`.
    ///
    /// Fails with `KVStoreError::MissingRegion` before the schema exists.
    fn get(&self, bucket: Bucket, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;
}

/// Read-write access inside a transaction.
///
/// Reads observe writes staged earlier in the same transaction.
pub trait WriteTransaction: ReadTransaction {
    /// Stage a put.
    fn put(&mut self, bucket: Bucket, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Stage a delete. Deleting an absent key is not an error.
    fn delete(&mut self, bucket: Bucket, key: &[u8]) -> Result<(), KVStoreError>;
}

/// Abstract interface for the transactional engine.
///
/// Production: `RocksDbStore`
/// Testing: `InMemoryKVStore`, `FaultyKVStore`
pub trait KeyValueStore: Send + Sync {
    /// Create every missing region in `buckets`. Existing regions and their
    /// contents are left untouched.
    fn ensure_buckets(&self, buckets: &[Bucket]) -> Result<(), KVStoreError>;

    /// Run `f` against a consistent read-only view.
    fn view<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&dyn ReadTransaction) -> Result<T, StorageError>;

    /// Run `f` in a read-write transaction.
    ///
    /// ## Atomicity
    ///
    /// Staged writes are committed only if `f` returns `Ok`. On any error,
    /// from `f` or from the commit itself, nothing is applied.
    fn update<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<T, StorageError>;

    /// Release the engine and any directory lock it holds.
    fn close(self) -> Result<(), KVStoreError>
    where
        Self: Sized;
}
