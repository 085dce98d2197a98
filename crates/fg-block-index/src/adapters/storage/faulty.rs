use std::sync::atomic::{AtomicUsize, Ordering};

use super::memory::InMemoryKVStore;
use crate::domain::errors::{KVStoreError, StorageError};
use crate::domain::keys::Bucket;
use crate::ports::outbound::{KeyValueStore, ReadTransaction, WriteTransaction};

/// Fault-injecting engine for atomicity tests.
///
/// Wraps `InMemoryKVStore` and, when armed, fails the Nth staged write
/// (put or delete, 1-based) of every read-write transaction.
#[derive(Default)]
pub struct FaultyKVStore {
    inner: InMemoryKVStore,
    /// 0 = disarmed.
    fail_at: AtomicUsize,
}

impl FaultyKVStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `nth` write of each subsequent transaction.
    pub fn fail_on_write(&self, nth: usize) {
        self.fail_at.store(nth, Ordering::SeqCst);
    }

    /// Stop injecting faults.
    pub fn disarm(&self) {
        self.fail_at.store(0, Ordering::SeqCst);
    }

    /// The wrapped engine, for inspecting committed state.
    pub fn inner(&self) -> &InMemoryKVStore {
        &self.inner
    }
}

struct FaultyWriteTx<'a> {
    inner: &'a mut dyn WriteTransaction,
    writes: usize,
    fail_at: usize,
}

impl FaultyWriteTx<'_> {
    fn count_write(&mut self) -> Result<(), KVStoreError> {
        self.writes += 1;
        if self.writes == self.fail_at {
            return Err(KVStoreError::Injected {
                message: format!("write #{} rejected", self.writes),
            });
        }
        Ok(())
    }
}

impl ReadTransaction for FaultyWriteTx<'_> {
    fn get(&self, bucket: Bucket, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.inner.get(bucket, key)
    }
}

impl WriteTransaction for FaultyWriteTx<'_> {
    fn put(&mut self, bucket: Bucket, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.count_write()?;
        self.inner.put(bucket, key, value)
    }

    fn delete(&mut self, bucket: Bucket, key: &[u8]) -> Result<(), KVStoreError> {
        self.count_write()?;
        self.inner.delete(bucket, key)
    }
}

impl KeyValueStore for FaultyKVStore {
    fn ensure_buckets(&self, buckets: &[Bucket]) -> Result<(), KVStoreError> {
        self.inner.ensure_buckets(buckets)
    }

    fn view<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&dyn ReadTransaction) -> Result<T, StorageError>,
    {
        self.inner.view(f)
    }

    fn update<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<T, StorageError>,
    {
        let fail_at = self.fail_at.load(Ordering::SeqCst);
        self.inner.update(|tx| {
            let mut faulty = FaultyWriteTx {
                inner: tx,
                writes: 0,
                fail_at,
            };
            f(&mut faulty)
        })
    }

    fn close(self) -> Result<(), KVStoreError> {
        self.inner.close()
    }
}
