use std::collections::{BTreeMap, HashMap};

use parking_lot::{Mutex, RwLock};

use super::StagedWrites;
use crate::domain::errors::{KVStoreError, StorageError};
use crate::domain::keys::Bucket;
use crate::ports::outbound::{KeyValueStore, ReadTransaction, WriteTransaction};

type Region = BTreeMap<Vec<u8>, Vec<u8>>;

/// In-memory key-value store for unit tests.
///
/// Same transaction semantics as `RocksDbStore`: writers are serialized and
/// apply their staged writes under the write lock, so a `view` sees either
/// all of a batch or none of it.
#[derive(Default)]
pub struct InMemoryKVStore {
    regions: RwLock<HashMap<Bucket, Region>>,
    writer: Mutex<()>,
}

impl InMemoryKVStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys in `bucket`, 0 if the region does not exist.
    pub fn entry_count(&self, bucket: Bucket) -> usize {
        self.regions.read().get(&bucket).map_or(0, |r| r.len())
    }

    /// Whether `bucket` has been created.
    pub fn has_bucket(&self, bucket: Bucket) -> bool {
        self.regions.read().contains_key(&bucket)
    }
}

fn region_get(
    regions: &HashMap<Bucket, Region>,
    bucket: Bucket,
    key: &[u8],
) -> Result<Option<Vec<u8>>, KVStoreError> {
    regions
        .get(&bucket)
        .map(|region| region.get(key).cloned())
        .ok_or(KVStoreError::MissingRegion {
            region: bucket.name(),
        })
}

struct MemoryReadTx<'a> {
    regions: &'a HashMap<Bucket, Region>,
}

impl ReadTransaction for MemoryReadTx<'_> {
    fn get(&self, bucket: Bucket, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        region_get(self.regions, bucket, key)
    }
}

struct MemoryWriteTx<'a> {
    store: &'a InMemoryKVStore,
    staged: StagedWrites,
}

impl MemoryWriteTx<'_> {
    fn require_region(&self, bucket: Bucket) -> Result<(), KVStoreError> {
        if self.store.has_bucket(bucket) {
            Ok(())
        } else {
            Err(KVStoreError::MissingRegion {
                region: bucket.name(),
            })
        }
    }
}

impl ReadTransaction for MemoryWriteTx<'_> {
    fn get(&self, bucket: Bucket, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        if let Some(staged) = self.staged.lookup(bucket, key) {
            return Ok(staged);
        }
        region_get(&self.store.regions.read(), bucket, key)
    }
}

impl WriteTransaction for MemoryWriteTx<'_> {
    fn put(&mut self, bucket: Bucket, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.require_region(bucket)?;
        self.staged.put(bucket, key, value);
        Ok(())
    }

    fn delete(&mut self, bucket: Bucket, key: &[u8]) -> Result<(), KVStoreError> {
        self.require_region(bucket)?;
        self.staged.delete(bucket, key);
        Ok(())
    }
}

impl KeyValueStore for InMemoryKVStore {
    fn ensure_buckets(&self, buckets: &[Bucket]) -> Result<(), KVStoreError> {
        let mut regions = self.regions.write();
        for bucket in buckets {
            regions.entry(*bucket).or_default();
        }
        Ok(())
    }

    fn view<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&dyn ReadTransaction) -> Result<T, StorageError>,
    {
        let regions = self.regions.read();
        f(&MemoryReadTx { regions: &regions })
    }

    fn update<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<T, StorageError>,
    {
        let _writer = self.writer.lock();
        let mut tx = MemoryWriteTx {
            store: self,
            staged: StagedWrites::default(),
        };
        let out = f(&mut tx)?;
        if tx.staged.is_empty() {
            return Ok(out);
        }

        // Regions are never dropped, so every staged region still exists.
        let mut regions = self.regions.write();
        for (bucket, key, value) in tx.staged.into_entries() {
            if let Some(region) = regions.get_mut(&bucket) {
                match value {
                    Some(value) => {
                        region.insert(key, value);
                    }
                    None => {
                        region.remove(&key);
                    }
                }
            }
        }
        Ok(out)
    }

    fn close(self) -> Result<(), KVStoreError> {
        Ok(())
    }
}
