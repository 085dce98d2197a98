//! # Key Layout
//!
//! Logical regions of the engine and the byte encoding of their keys.
//!
//! | Region | Key | Value |
//! |--------|-----|-------|
//! | `blocks` | height (8-byte BE) | JSON-encoded [`Block`](super::Block) |
//! | `block_heights` | hash (UTF-8 bytes) | height (8-byte BE) |
//! | `indexer` | `earliest` / `latest` / `activated_timestamp` | `u64` (8-byte BE) |
//!
//! Big-endian keeps numeric order identical to the engine's byte order.

use crate::domain::errors::StorageError;

/// A logical region of the key space (a column family in RocksDB).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    /// Primary storage: height -> block.
    Blocks,
    /// Secondary index: hash -> height.
    BlockHeights,
    /// Bounds and auxiliary scalars.
    Indexer,
}

impl Bucket {
    /// Every region the schema must contain.
    pub const ALL: [Bucket; 3] = [Bucket::Blocks, Bucket::BlockHeights, Bucket::Indexer];

    /// Engine-level name of this region.
    pub const fn name(&self) -> &'static str {
        match self {
            Bucket::Blocks => "blocks",
            Bucket::BlockHeights => "block_heights",
            Bucket::Indexer => "indexer",
        }
    }
}

/// `indexer` key of the first-seen lower bound.
pub const EARLIEST_BLOCK_KEY: &[u8] = b"earliest";

/// `indexer` key of the highest inserted height.
pub const LATEST_BLOCK_KEY: &[u8] = b"latest";

/// `indexer` key of the activation timestamp.
pub const ACTIVATED_TIMESTAMP_KEY: &[u8] = b"activated_timestamp";

/// Width of every encoded scalar.
pub const SCALAR_LEN: usize = 8;

/// Encode a scalar (height, bound, timestamp) as fixed-width big-endian.
#[inline]
pub fn encode_u64(value: u64) -> [u8; SCALAR_LEN] {
    value.to_be_bytes()
}

/// Decode a fixed-width big-endian scalar.
///
/// A stored value of any other width is corruption, not absence.
pub fn decode_u64(bytes: &[u8]) -> Result<u64, StorageError> {
    let raw: [u8; SCALAR_LEN] = bytes.try_into().map_err(|_| StorageError::Encoding {
        message: format!(
            "expected {}-byte scalar, found {} bytes",
            SCALAR_LEN,
            bytes.len()
        ),
    })?;
    Ok(u64::from_be_bytes(raw))
}

/// Primary-storage key for a block height.
#[inline]
pub fn height_key(height: u64) -> [u8; SCALAR_LEN] {
    encode_u64(height)
}

/// Secondary-index key for a block hash.
#[inline]
pub fn hash_key(hash: &str) -> &[u8] {
    hash.as_bytes()
}
