//! Storage Adapters
//!
//! Implementations of the `KeyValueStore` trait.

mod faulty;
mod memory;
#[cfg(feature = "rocksdb")]
mod rocksdb_adapter;

pub use faulty::FaultyKVStore;
pub use memory::InMemoryKVStore;
#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::RocksDbStore;

use std::collections::BTreeMap;

use crate::domain::keys::Bucket;

/// Writes staged by an open read-write transaction.
///
/// Keyed by region and key so that a later write to the same key replaces
/// the earlier one and reads inside the transaction see the latest value.
/// `None` marks a delete.
#[derive(Debug, Default)]
pub(crate) struct StagedWrites {
    entries: BTreeMap<(Bucket, Vec<u8>), Option<Vec<u8>>>,
}

impl StagedWrites {
    /// `Some(..)` if the key was written in this transaction.
    pub(crate) fn lookup(&self, bucket: Bucket, key: &[u8]) -> Option<Option<Vec<u8>>> {
        self.entries.get(&(bucket, key.to_vec())).cloned()
    }

    pub(crate) fn put(&mut self, bucket: Bucket, key: &[u8], value: &[u8]) {
        self.entries
            .insert((bucket, key.to_vec()), Some(value.to_vec()));
    }

    pub(crate) fn delete(&mut self, bucket: Bucket, key: &[u8]) {
        self.entries.insert((bucket, key.to_vec()), None);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> impl Iterator<Item = (Bucket, Vec<u8>, Option<Vec<u8>>)> {
        self.entries
            .into_iter()
            .map(|((bucket, key), value)| (bucket, key, value))
    }
}
