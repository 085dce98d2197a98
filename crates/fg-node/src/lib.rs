//! # Finality Node
//!
//! Lifecycle layer for the block index: configuration from the environment,
//! startup, and shutdown. The binary in `main.rs` wires these to telemetry
//! and Ctrl+C.

pub mod config;
pub mod lifecycle;

pub use config::NodeConfig;
pub use lifecycle::{record_activation_timestamp, FinalityNode, NodeStore};
