//! # Block Index Service - Transaction Helpers
//!
//! Reads shared by the query and insert paths. Generic over the transaction
//! so they run unchanged inside `view` and `update`.

use crate::domain::block::Block;
use crate::domain::bounds::FinalizedBounds;
use crate::domain::errors::StorageError;
use crate::domain::keys::{
    decode_u64, hash_key, height_key, Bucket, EARLIEST_BLOCK_KEY, LATEST_BLOCK_KEY,
};
use crate::ports::outbound::ReadTransaction;

/// Read an `indexer` scalar, `None` if never written.
pub(crate) fn read_scalar<T>(tx: &T, key: &[u8]) -> Result<Option<u64>, StorageError>
where
    T: ReadTransaction + ?Sized,
{
    tx.get(Bucket::Indexer, key)?
        .map(|raw| decode_u64(&raw))
        .transpose()
}

/// Read both finalized-range pointers.
pub(crate) fn read_bounds<T>(tx: &T) -> Result<FinalizedBounds, StorageError>
where
    T: ReadTransaction + ?Sized,
{
    Ok(FinalizedBounds {
        earliest: read_scalar(tx, EARLIEST_BLOCK_KEY)?,
        latest: read_scalar(tx, LATEST_BLOCK_KEY)?,
    })
}

/// Read the primary record at `height`, `None` if absent.
pub(crate) fn find_block<T>(tx: &T, height: u64) -> Result<Option<Block>, StorageError>
where
    T: ReadTransaction + ?Sized,
{
    tx.get(Bucket::Blocks, &height_key(height))?
        .map(|raw| Block::from_bytes(&raw))
        .transpose()
}

/// Read the primary record at `height`, `NotFound` if absent.
pub(crate) fn read_block<T>(tx: &T, height: u64) -> Result<Block, StorageError>
where
    T: ReadTransaction + ?Sized,
{
    find_block(tx, height)?.ok_or_else(|| StorageError::height_not_found(height))
}

/// Resolve a hash through the index, `None` if not indexed.
pub(crate) fn find_height<T>(tx: &T, hash: &str) -> Result<Option<u64>, StorageError>
where
    T: ReadTransaction + ?Sized,
{
    tx.get(Bucket::BlockHeights, hash_key(hash))?
        .map(|raw| decode_u64(&raw))
        .transpose()
}

/// Resolve a hash and read its primary record.
///
/// The index and primary storage are written together, so an index entry
/// without a matching record is corruption, not absence.
pub(crate) fn read_block_by_hash<T>(tx: &T, hash: &str) -> Result<Block, StorageError>
where
    T: ReadTransaction + ?Sized,
{
    let height = find_height(tx, hash)?.ok_or_else(|| StorageError::hash_not_found(hash))?;

    let block = find_block(tx, height)?.ok_or_else(|| StorageError::InvariantViolation {
        hash: hash.to_string(),
        height,
        reason: "no block stored at that height",
    })?;

    if block.hash != hash {
        return Err(StorageError::InvariantViolation {
            hash: hash.to_string(),
            height,
            reason: "block at that height has a different hash",
        });
    }
    Ok(block)
}
