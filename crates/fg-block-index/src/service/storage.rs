//! # Block Index API Implementation
//!
//! Implements the BlockIndexApi trait for insert and query operations.

use tracing::{debug, error, info, warn};

use super::helpers::{
    find_block, find_height, read_block, read_block_by_hash, read_bounds, read_scalar,
};
use super::BlockIndexStore;
use crate::domain::block::{Block, HeightRange};
use crate::domain::errors::{BoundKind, StorageError};
use crate::domain::keys::{
    encode_u64, hash_key, height_key, Bucket, ACTIVATED_TIMESTAMP_KEY, EARLIEST_BLOCK_KEY,
    LATEST_BLOCK_KEY,
};
use crate::ports::inbound::BlockIndexApi;
use crate::ports::outbound::{KeyValueStore, WriteTransaction};

/// Downgrade `NotFound` to `false`; every other error propagates.
fn presence(result: Result<(), StorageError>) -> Result<bool, StorageError> {
    match result {
        Ok(()) => Ok(true),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Stage one block: primary record plus hash index entry.
///
/// When the height already holds a block with a different hash, that hash's
/// index entry is removed so it no longer resolves to the replacement.
fn stage_block<W>(tx: &mut W, block: &Block) -> Result<(), StorageError>
where
    W: WriteTransaction + ?Sized,
{
    let key = height_key(block.height);

    if let Some(previous) = find_block(&*tx, block.height)? {
        if previous.hash != block.hash && find_height(&*tx, &previous.hash)? == Some(block.height)
        {
            debug!(
                height = block.height,
                old_hash = %previous.hash,
                new_hash = %block.hash,
                "Replacing block at height"
            );
            tx.delete(Bucket::BlockHeights, hash_key(&previous.hash))?;
        }
    }

    tx.put(Bucket::Blocks, &key, &block.to_bytes()?)?;
    tx.put(Bucket::BlockHeights, hash_key(&block.hash), &key)?;
    debug!(height = block.height, hash = %block.hash, "Staged block");
    Ok(())
}

impl<KV: KeyValueStore> BlockIndexApi for BlockIndexStore<KV> {
    fn create_initial_schema(&self) -> Result<(), StorageError> {
        self.kv_store.ensure_buckets(&Bucket::ALL).map_err(|e| {
            error!(error = %e, "Failed to create block index schema");
            StorageError::from(e)
        })?;
        info!(
            regions = ?Bucket::ALL.map(|b| b.name()),
            "Block index schema ready"
        );
        Ok(())
    }

    fn insert_blocks(&self, blocks: &[Block]) -> Result<(), StorageError> {
        let Some(range) = HeightRange::of(blocks) else {
            return Ok(());
        };

        let result = self.kv_store.update(|tx| {
            for block in blocks {
                stage_block(&mut *tx, block)?;
            }

            let update = read_bounds(&*tx)?.advance(range);
            if let Some(earliest) = update.earliest {
                tx.put(Bucket::Indexer, EARLIEST_BLOCK_KEY, &encode_u64(earliest))?;
                debug!(earliest, "Set earliest finalized height");
            }
            if let Some(latest) = update.latest {
                tx.put(Bucket::Indexer, LATEST_BLOCK_KEY, &encode_u64(latest))?;
                debug!(latest, "Advanced latest finalized height");
            }
            Ok(())
        });

        match result {
            Ok(()) => {
                info!(
                    count = blocks.len(),
                    min_height = range.min,
                    max_height = range.max,
                    "Inserted finalized blocks"
                );
                Ok(())
            }
            Err(e) => {
                error!(count = blocks.len(), error = %e, "Block batch rolled back");
                Err(e)
            }
        }
    }

    fn get_block_by_height(&self, height: u64) -> Result<Block, StorageError> {
        self.kv_store.view(|tx| read_block(tx, height))
    }

    fn get_block_by_hash(&self, hash: &str) -> Result<Block, StorageError> {
        self.kv_store
            .view(|tx| read_block_by_hash(tx, hash))
            .inspect_err(|e| {
                if let StorageError::InvariantViolation { .. } = e {
                    error!(hash, error = %e, "Hash index is inconsistent");
                }
            })
    }

    fn query_is_block_finalized_by_height(&self, height: u64) -> Result<bool, StorageError> {
        presence(self.get_block_by_height(height).map(|_| ()))
    }

    fn query_is_block_finalized_by_hash(&self, hash: &str) -> Result<bool, StorageError> {
        presence(self.get_block_by_hash(hash).map(|_| ()))
    }

    fn query_earliest_finalized_block(&self) -> Result<Block, StorageError> {
        self.kv_store.view(|tx| {
            let height = read_bounds(tx)?
                .earliest
                .ok_or_else(|| StorageError::bound_not_found(BoundKind::Earliest))?;
            read_block(tx, height)
        })
    }

    fn query_latest_finalized_block(&self) -> Result<Option<Block>, StorageError> {
        self.kv_store.view(|tx| match read_bounds(tx)?.latest {
            Some(height) => read_block(tx, height).map(Some),
            None => Ok(None),
        })
    }

    fn get_activated_timestamp(&self) -> Result<u64, StorageError> {
        self.kv_store.view(|tx| {
            read_scalar(tx, ACTIVATED_TIMESTAMP_KEY)?
                .ok_or(StorageError::ActivatedTimestampNotFound)
        })
    }

    fn save_activated_timestamp(&self, timestamp: u64) -> Result<(), StorageError> {
        self.kv_store.update(|tx| {
            tx.put(Bucket::Indexer, ACTIVATED_TIMESTAMP_KEY, &encode_u64(timestamp))?;
            Ok(())
        })?;
        info!(timestamp, "Saved activated timestamp");
        Ok(())
    }

    fn close(self) -> Result<(), StorageError> {
        self.kv_store.close().map_err(|e| {
            warn!(error = %e, "Error while closing block index");
            StorageError::from(e)
        })
    }
}
