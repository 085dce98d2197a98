//! # Query Handler
//!
//! JSON-RPC style query surface over the block index.
//!
//! ## Modules
//!
//! - `handler`: FinalityQueryHandler and method dispatch
//! - `types`: response and error payloads

mod handler;
mod types;

pub use handler::{handle_api_query, ApiQueryError, FinalityQueryHandler};
pub use types::{FinalizedRange, RpcError, SERVER_ERROR_CODE};
