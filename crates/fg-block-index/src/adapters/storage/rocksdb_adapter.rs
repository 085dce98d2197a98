//! # RocksDB Storage Adapter
//!
//! Production implementation of the KeyValueStore trait.
//!
//! ## Features
//!
//! - One column family per region (`blocks`, `block_heights`, `indexer`)
//! - Atomic commits (WriteBatch)
//! - Snapshot reads, so readers never see half a batch
//! - Snappy compression and bloom filters
//! - fsync on commit for durability (configurable)
//!
//! Column families are created by `ensure_buckets`, not at open, so that
//! touching a region before the schema exists fails the same way it does
//! on every other engine.

use std::fs;
use std::path::Path;

use parking_lot::{Mutex, RwLock};
use rocksdb::{
    BlockBasedOptions, Cache, ColumnFamily, ColumnFamilyDescriptor, DBCompressionType, Options,
    Snapshot, WriteBatch, WriteOptions, DB,
};
use tracing::{debug, error, info};

use super::StagedWrites;
use crate::adapters::lock::DatabaseLock;
use crate::domain::config::StoreConfig;
use crate::domain::errors::{KVStoreError, StorageError};
use crate::domain::keys::Bucket;
use crate::ports::outbound::{KeyValueStore, ReadTransaction, WriteTransaction};

/// Marker RocksDB writes once a database exists in a directory.
const CURRENT_FILE: &str = "CURRENT";

/// RocksDB-backed key-value store implementing the KeyValueStore trait.
///
/// Field order matters: the database closes before the directory lock is
/// released.
pub struct RocksDbStore {
    db: RwLock<DB>,
    /// Serializes read-write transactions.
    writer: Mutex<()>,
    config: StoreConfig,
    _lock: DatabaseLock,
}

impl RocksDbStore {
    /// Open or create the database in `config.data_dir`.
    ///
    /// Waits up to `config.open_timeout` for another handle to release the
    /// directory.
    pub fn open(config: StoreConfig) -> Result<Self, KVStoreError> {
        config.validate()?;

        fs::create_dir_all(&config.data_dir).map_err(|e| KVStoreError::IOError {
            message: format!(
                "Failed to create data directory {}: {}",
                config.data_dir.display(),
                e
            ),
        })?;

        let lock = DatabaseLock::acquire(&config.data_dir, config.open_timeout)?;

        let opts = db_options(&config);

        // Reopen whatever regions already exist; a fresh directory has none.
        let existing = if config.data_dir.join(CURRENT_FILE).exists() {
            DB::list_cf(&opts, &config.data_dir).map_err(|e| {
                error!(path = %config.data_dir.display(), error = %e, "Failed to list column families");
                engine_error("list column families", e)
            })?
        } else {
            Vec::new()
        };
        let cf_descriptors: Vec<ColumnFamilyDescriptor> = existing
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(name, cf_options()))
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.data_dir, cf_descriptors).map_err(|e| {
            error!(path = %config.data_dir.display(), error = %e, "Failed to open RocksDB");
            engine_error("open", e)
        })?;

        info!(
            path = %config.data_dir.display(),
            column_families = existing.len(),
            sync_writes = config.sync_writes,
            "Opened block index database"
        );

        Ok(Self {
            db: RwLock::new(db),
            writer: Mutex::new(()),
            config,
            _lock: lock,
        })
    }

    /// Directory this store was opened on.
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    fn commit(&self, db: &DB, staged: StagedWrites) -> Result<(), KVStoreError> {
        let mut batch = WriteBatch::default();
        for (bucket, key, value) in staged.into_entries() {
            let cf = column_family(db, bucket)?;
            match value {
                Some(value) => batch.put_cf(cf, &key, &value),
                None => batch.delete_cf(cf, &key),
            }
        }

        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);

        let ops = batch.len();
        db.write_opt(batch, &write_opts).map_err(|e| {
            error!(error = %e, ops, "RocksDB batch commit failed");
            engine_error("batch write", e)
        })?;
        debug!(ops, "Committed write batch");
        Ok(())
    }
}

fn db_options(config: &StoreConfig) -> Options {
    let mut opts = Options::default();
    opts.create_if_missing(true);

    opts.set_write_buffer_size(config.write_buffer_size);
    opts.set_compression_type(DBCompressionType::Snappy);

    // Bloom filter for faster point lookups
    let mut block_opts = BlockBasedOptions::default();
    block_opts.set_bloom_filter(10.0, false);
    block_opts.set_block_cache(&Cache::new_lru_cache(config.block_cache_size));
    opts.set_block_based_table_factory(&block_opts);

    opts
}

fn cf_options() -> Options {
    let mut cf_opts = Options::default();
    cf_opts.set_compression_type(DBCompressionType::Snappy);
    cf_opts
}

fn column_family(db: &DB, bucket: Bucket) -> Result<&ColumnFamily, KVStoreError> {
    db.cf_handle(bucket.name())
        .ok_or(KVStoreError::MissingRegion {
            region: bucket.name(),
        })
}

fn engine_error(operation: &str, err: rocksdb::Error) -> KVStoreError {
    KVStoreError::IOError {
        message: format!("RocksDB {} failed: {}", operation, err),
    }
}

struct RocksReadTx<'a> {
    db: &'a DB,
    snapshot: Snapshot<'a>,
}

impl ReadTransaction for RocksReadTx<'_> {
    fn get(&self, bucket: Bucket, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        let cf = column_family(self.db, bucket)?;
        self.snapshot
            .get_cf(cf, key)
            .map_err(|e| engine_error("get", e))
    }
}

/// Writers are serialized, so reading the live database (plus our own
/// staged writes) is consistent for the duration of the transaction.
struct RocksWriteTx<'a> {
    db: &'a DB,
    staged: StagedWrites,
}

impl ReadTransaction for RocksWriteTx<'_> {
    fn get(&self, bucket: Bucket, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        if let Some(staged) = self.staged.lookup(bucket, key) {
            return Ok(staged);
        }
        let cf = column_family(self.db, bucket)?;
        self.db.get_cf(cf, key).map_err(|e| engine_error("get", e))
    }
}

impl WriteTransaction for RocksWriteTx<'_> {
    fn put(&mut self, bucket: Bucket, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        column_family(self.db, bucket)?;
        self.staged.put(bucket, key, value);
        Ok(())
    }

    fn delete(&mut self, bucket: Bucket, key: &[u8]) -> Result<(), KVStoreError> {
        column_family(self.db, bucket)?;
        self.staged.delete(bucket, key);
        Ok(())
    }
}

impl KeyValueStore for RocksDbStore {
    fn ensure_buckets(&self, buckets: &[Bucket]) -> Result<(), KVStoreError> {
        let mut db = self.db.write();
        for bucket in buckets {
            if db.cf_handle(bucket.name()).is_none() {
                db.create_cf(bucket.name(), &cf_options())
                    .map_err(|e| engine_error("create column family", e))?;
                debug!(region = bucket.name(), "Created column family");
            }
        }
        Ok(())
    }

    fn view<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&dyn ReadTransaction) -> Result<T, StorageError>,
    {
        let guard = self.db.read();
        let db: &DB = &guard;
        let tx = RocksReadTx {
            db,
            snapshot: db.snapshot(),
        };
        f(&tx)
    }

    fn update<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<T, StorageError>,
    {
        let _writer = self.writer.lock();
        let guard = self.db.read();
        let db: &DB = &guard;

        let mut tx = RocksWriteTx {
            db,
            staged: StagedWrites::default(),
        };
        let out = f(&mut tx)?;

        if !tx.staged.is_empty() {
            self.commit(db, tx.staged)?;
        }
        Ok(out)
    }

    fn close(self) -> Result<(), KVStoreError> {
        self.db
            .read()
            .flush_wal(true)
            .map_err(|e| engine_error("WAL flush", e))?;
        info!(path = %self.config.data_dir.display(), "Closed block index database");
        Ok(())
    }
}
