//! # Domain Layer
//!
//! Pure domain logic for the block index.
//! Nothing here touches the engine; adapters and the service do.
//!
//! ## Modules
//!
//! - `block` - Block, BlockView conversion, batch height range
//! - `bounds` - Earliest/latest pointer rules
//! - `keys` - Region names and key encoding
//! - `config` - Store configuration
//! - `errors` - Domain error types

pub mod block;
pub mod bounds;
pub mod config;
pub mod errors;
pub mod keys;

pub use block::{blocks_from_views, Block, BlockView, HeightRange};
pub use bounds::{BoundsUpdate, FinalizedBounds};
pub use config::{StoreConfig, DEFAULT_OPEN_TIMEOUT};
pub use errors::{BoundKind, KVStoreError, LockError, LookupKey, StorageError};
pub use keys::Bucket;
