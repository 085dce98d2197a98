//! # Block
//!
//! The persisted unit, and its conversion from the chain node's view type.
//!
//! The store interprets only `height` and `hash`. Everything else the chain
//! follower attaches travels in `extra` and is persisted verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::errors::StorageError;

/// Stored field names of the block itself; metadata may not reuse them.
pub const RESERVED_FIELDS: [&str; 3] = ["block_height", "block_hash", "block_timestamp"];

/// A finalized block as handed over by the chain follower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block height (unique, totally ordered).
    #[serde(rename = "block_height")]
    pub height: u64,
    /// Opaque block hash.
    #[serde(rename = "block_hash")]
    pub hash: String,
    /// Block time in seconds since epoch, as reported by the chain.
    #[serde(rename = "block_timestamp", default)]
    pub timestamp: u64,
    /// Additional chain metadata, flattened into the stored object.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Block {
    /// Create a block with no extra metadata.
    pub fn new(height: u64, hash: impl Into<String>, timestamp: u64) -> Self {
        Self {
            height,
            hash: hash.into(),
            timestamp,
            extra: Map::new(),
        }
    }

    /// Attach a metadata field.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Encode for primary storage.
    ///
    /// Metadata under a reserved field name would serialize as a duplicate
    /// key that can never be decoded, so it is rejected here.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StorageError> {
        if let Some(field) = RESERVED_FIELDS.iter().find(|f| self.extra.contains_key(**f)) {
            return Err(StorageError::Encoding {
                message: format!(
                    "block {} metadata reuses reserved field '{}'",
                    self.height, field
                ),
            });
        }
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode from primary storage.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StorageError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Block as reported by the chain node: every number is a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockView {
    pub block_hash: String,
    pub block_height: String,
    pub block_time: String,
}

impl TryFrom<BlockView> for Block {
    type Error = StorageError;

    fn try_from(view: BlockView) -> Result<Self, Self::Error> {
        let height = parse_decimal("block_height", &view.block_height)?;
        let timestamp = parse_decimal("block_time", &view.block_time)?;
        Ok(Block::new(height, view.block_hash, timestamp))
    }
}

/// Convert a page of views, preserving order. Fails on the first malformed view.
pub fn blocks_from_views(views: impl IntoIterator<Item = BlockView>) -> Result<Vec<Block>, StorageError> {
    views.into_iter().map(Block::try_from).collect()
}

fn parse_decimal(field: &'static str, raw: &str) -> Result<u64, StorageError> {
    raw.trim().parse::<u64>().map_err(|e| StorageError::Encoding {
        message: format!("invalid {} '{}': {}", field, raw, e),
    })
}

/// Local minimum and maximum height of one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightRange {
    pub min: u64,
    pub max: u64,
}

impl HeightRange {
    /// Single pass over the batch. `None` for an empty batch.
    pub fn of(blocks: &[Block]) -> Option<Self> {
        let first = blocks.first()?.height;
        Some(
            blocks
                .iter()
                .fold(HeightRange { min: first, max: first }, |range, block| HeightRange {
                    min: range.min.min(block.height),
                    max: range.max.max(block.height),
                }),
        )
    }
}
