//! # Finality Query Handler
//!
//! Maps JSON-RPC style requests onto the block index queries.
//!
//! Absence is never an error at this boundary: a missing block is `null`,
//! an unknown hash is `false`. Storage faults become an error object with
//! code `-32000`.

use std::sync::Arc;

use serde_json::{json, Value};
use thiserror::Error;
use tracing::warn;

use super::types::{FinalizedRange, RpcError};
use crate::domain::block::Block;
use crate::domain::errors::StorageError;
use crate::ports::inbound::BlockIndexApi;

/// Query handler for the finality gadget.
///
/// Holds the store behind `Arc` so the lifecycle layer can keep its own
/// handle.
pub struct FinalityQueryHandler<S: BlockIndexApi> {
    service: Arc<S>,
}

fn error_response(method: &str, err: &StorageError) -> Value {
    warn!(method, error = %err, "Query failed");
    json!({ "error": RpcError::from(err) })
}

fn respond<T: Into<Value>>(method: &str, result: Result<T, StorageError>) -> Value {
    match result {
        Ok(value) => {
            let value: Value = value.into();
            json!({ "result": value })
        }
        Err(e) => error_response(method, &e),
    }
}

/// `NotFound` becomes `null`.
fn optional(result: Result<Block, StorageError>) -> Result<Option<Block>, StorageError> {
    match result {
        Ok(block) => Ok(Some(block)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

fn block_value(block: Option<Block>) -> Result<Value, StorageError> {
    Ok(serde_json::to_value(block)?)
}

impl<S: BlockIndexApi> FinalityQueryHandler<S> {
    /// Create a new query handler.
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }

    /// Handle `fg_isBlockFinalizedByHeight`.
    pub fn handle_is_finalized_by_height(&self, height: u64) -> Value {
        respond(
            "fg_isBlockFinalizedByHeight",
            self.service.query_is_block_finalized_by_height(height),
        )
    }

    /// Handle `fg_isBlockFinalizedByHash`.
    pub fn handle_is_finalized_by_hash(&self, hash: &str) -> Value {
        respond(
            "fg_isBlockFinalizedByHash",
            self.service.query_is_block_finalized_by_hash(hash),
        )
    }

    /// Handle `fg_getBlockByHeight` - block or `null`.
    pub fn handle_get_block_by_height(&self, height: u64) -> Value {
        respond(
            "fg_getBlockByHeight",
            optional(self.service.get_block_by_height(height)).and_then(block_value),
        )
    }

    /// Handle `fg_getBlockByHash` - block or `null`.
    pub fn handle_get_block_by_hash(&self, hash: &str) -> Value {
        respond(
            "fg_getBlockByHash",
            optional(self.service.get_block_by_hash(hash)).and_then(block_value),
        )
    }

    /// Handle `fg_earliestFinalizedBlock` - block or `null`.
    pub fn handle_earliest_finalized_block(&self) -> Value {
        respond(
            "fg_earliestFinalizedBlock",
            optional(self.service.query_earliest_finalized_block()).and_then(block_value),
        )
    }

    /// Handle `fg_latestFinalizedBlock` - block or `null`.
    pub fn handle_latest_finalized_block(&self) -> Value {
        respond(
            "fg_latestFinalizedBlock",
            self.service
                .query_latest_finalized_block()
                .and_then(block_value),
        )
    }

    /// Handle `fg_activatedTimestamp` - number or `null`.
    pub fn handle_activated_timestamp(&self) -> Value {
        let result = match self.service.get_activated_timestamp() {
            Ok(ts) => Ok(Some(ts)),
            Err(StorageError::ActivatedTimestampNotFound) => Ok(None),
            Err(e) => Err(e),
        };
        respond("fg_activatedTimestamp", result.map(|ts| json!(ts)))
    }

    /// Current finalized range. Unset values are `None`; faults propagate.
    pub fn finalized_range(&self) -> Result<FinalizedRange, StorageError> {
        let earliest_height = optional(self.service.query_earliest_finalized_block())?
            .map(|b| b.height);
        let latest_height = self
            .service
            .query_latest_finalized_block()?
            .map(|b| b.height);
        let activated_timestamp = match self.service.get_activated_timestamp() {
            Ok(ts) => Some(ts),
            Err(StorageError::ActivatedTimestampNotFound) => None,
            Err(e) => return Err(e),
        };
        Ok(FinalizedRange {
            earliest_height,
            latest_height,
            activated_timestamp,
        })
    }

    /// Handle `ping` - health check. A storage fault is a server error.
    pub fn handle_ping(&self) -> Value {
        match self.finalized_range() {
            Ok(range) => json!({
                "result": "pong",
                "subsystem": "fg-block-index",
                "earliest_height": range.earliest_height,
                "latest_height": range.latest_height,
            }),
            Err(e) => error_response("ping", &e),
        }
    }

    /// Get reference to underlying service
    pub fn service(&self) -> &Arc<S> {
        &self.service
    }
}

/// Query rejected before reaching the store.
#[derive(Debug, Error)]
pub enum ApiQueryError {
    /// Unknown method
    #[error("Unknown method: {0}")]
    UnknownMethod(String),
    /// Invalid parameters
    #[error("Invalid params: {0}")]
    InvalidParams(String),
}

/// Parse a height given as a number, a decimal string or a `0x` hex string.
fn height_param(params: &Value) -> Result<u64, ApiQueryError> {
    let raw = params
        .get(0)
        .ok_or_else(|| ApiQueryError::InvalidParams("Missing block height".into()))?;

    let parsed = match raw {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => match s.strip_prefix("0x") {
            Some(hex) => u64::from_str_radix(hex, 16).ok(),
            None => s.parse().ok(),
        },
        _ => None,
    };
    parsed.ok_or_else(|| ApiQueryError::InvalidParams(format!("Invalid block height: {}", raw)))
}

fn hash_param(params: &Value) -> Result<&str, ApiQueryError> {
    match params.get(0).and_then(|v| v.as_str()) {
        Some(hash) if !hash.is_empty() => Ok(hash),
        _ => Err(ApiQueryError::InvalidParams("Missing block hash".into())),
    }
}

/// Handle a query.
///
/// Dispatches to the appropriate handler method based on the JSON-RPC
/// method name.
pub fn handle_api_query<S: BlockIndexApi>(
    handler: &FinalityQueryHandler<S>,
    method: &str,
    params: &Value,
) -> Result<Value, ApiQueryError> {
    match method {
        "fg_isBlockFinalizedByHeight" => {
            Ok(handler.handle_is_finalized_by_height(height_param(params)?))
        }
        "fg_isBlockFinalizedByHash" => Ok(handler.handle_is_finalized_by_hash(hash_param(params)?)),
        "fg_getBlockByHeight" => Ok(handler.handle_get_block_by_height(height_param(params)?)),
        "fg_getBlockByHash" => Ok(handler.handle_get_block_by_hash(hash_param(params)?)),
        "fg_earliestFinalizedBlock" => Ok(handler.handle_earliest_finalized_block()),
        "fg_latestFinalizedBlock" => Ok(handler.handle_latest_finalized_block()),
        "fg_activatedTimestamp" => Ok(handler.handle_activated_timestamp()),
        "ping" => Ok(handler.handle_ping()),
        _ => Err(ApiQueryError::UnknownMethod(method.to_string())),
    }
}
