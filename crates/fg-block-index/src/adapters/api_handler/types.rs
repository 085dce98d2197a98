//! # API Handler Types
//!
//! Data types for query responses.

use serde::{Deserialize, Serialize};

use crate::domain::errors::StorageError;

/// JSON-RPC server error code, used for every storage fault.
pub const SERVER_ERROR_CODE: i64 = -32000;

/// Error object returned in place of a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl From<&StorageError> for RpcError {
    fn from(err: &StorageError) -> Self {
        Self {
            code: SERVER_ERROR_CODE,
            message: err.to_string(),
        }
    }
}

/// Snapshot of the finalized range, for health checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedRange {
    /// Height of the first-seen finalized block.
    pub earliest_height: Option<u64>,
    /// Highest finalized height.
    pub latest_height: Option<u64>,
    /// When the finality gadget was activated (seconds since epoch).
    pub activated_timestamp: Option<u64>,
}
