//! # Inbound Ports (Driving Ports)
//!
//! The primary API of the block index.

use crate::domain::block::Block;
use crate::domain::errors::StorageError;

/// Primary API of the block index.
///
/// Every method is one engine transaction. Implementations are shared
/// across threads, so all methods take `&self`.
pub trait BlockIndexApi {
    /// Ensure the `blocks`, `block_heights` and `indexer` regions exist.
    ///
    /// Idempotent. Never destroys data.
    fn create_initial_schema(&self) -> Result<(), StorageError>;

    /// Insert a batch of finalized blocks.
    ///
    /// ## Atomicity
    ///
    /// The whole batch, both indexes and both bounds commit together or not
    /// at all. An empty batch is a no-op.
    ///
    /// ## Bounds
    ///
    /// - `earliest` is set to the batch minimum only if it was never set
    /// - `latest` advances to the batch maximum only if that is higher
    ///
    /// Duplicate heights overwrite; within a batch the last one wins.
    fn insert_blocks(&self, blocks: &[Block]) -> Result<(), StorageError>;

    /// Read a block by height.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: no block at this height
    fn get_block_by_height(&self, height: u64) -> Result<Block, StorageError>;

    /// Read a block by hash, via the hash index.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: hash not indexed
    /// - `InvariantViolation`: index entry without a matching primary record
    fn get_block_by_hash(&self, hash: &str) -> Result<Block, StorageError>;

    /// `true` iff a block exists at `height`. Only `NotFound` maps to `false`.
    fn query_is_block_finalized_by_height(&self, height: u64) -> Result<bool, StorageError>;

    /// `true` iff `hash` is indexed. Only `NotFound` maps to `false`.
    fn query_is_block_finalized_by_hash(&self, hash: &str) -> Result<bool, StorageError>;

    /// The block at the first-seen lower bound.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: nothing was ever inserted
    fn query_earliest_finalized_block(&self) -> Result<Block, StorageError>;

    /// The block at the highest inserted height, `None` if nothing was
    /// ever inserted.
    fn query_latest_finalized_block(&self) -> Result<Option<Block>, StorageError>;

    /// ## Errors
    ///
    /// - `ActivatedTimestampNotFound`: never saved
    fn get_activated_timestamp(&self) -> Result<u64, StorageError>;

    /// Record the activation timestamp, replacing any previous value.
    fn save_activated_timestamp(&self, timestamp: u64) -> Result<(), StorageError>;

    /// Release the engine and the directory lock.
    fn close(self) -> Result<(), StorageError>
    where
        Self: Sized;
}
