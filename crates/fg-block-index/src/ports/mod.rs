//! # Ports Layer
//!
//! Defines the port traits for the block index.
//!
//! ## Hexagonal Architecture
//!
//! - `inbound.rs` - Driving ports (API exposed to the query and lifecycle layers)
//! - `outbound.rs` - Driven ports (the transactional engine)

pub mod inbound;
pub mod outbound;

pub use inbound::BlockIndexApi;
pub use outbound::{KeyValueStore, ReadTransaction, WriteTransaction};
