//! # Domain Errors
//!
//! Error types for the block index.
//!
//! ## Design Principles
//!
//! - Closed taxonomy: callers match exhaustively instead of probing strings
//! - Absence is an ordinary outcome (`NotFound`), engine faults are not
//! - No panics in domain logic (use Result instead)

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Which finalized-range pointer a lookup was after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundKind {
    /// First-seen lower bound.
    Earliest,
    /// Highest height ever inserted.
    Latest,
}

impl fmt::Display for BoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundKind::Earliest => write!(f, "earliest"),
            BoundKind::Latest => write!(f, "latest"),
        }
    }
}

/// The key that was absent when a lookup returned `NotFound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    /// Primary storage, by height.
    Height(u64),
    /// Secondary index, by hash.
    Hash(String),
    /// One of the finalized-range pointers.
    Bound(BoundKind),
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKey::Height(height) => write!(f, "block at height {}", height),
            LookupKey::Hash(hash) => write!(f, "block with hash {}", hash),
            LookupKey::Bound(kind) => write!(f, "{} finalized block pointer", kind),
        }
    }
}

/// Errors that can occur during block index operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested key is absent.
    #[error("Not found: {key}")]
    NotFound { key: LookupKey },

    /// The activation timestamp has never been saved.
    #[error("Activated timestamp not found")]
    ActivatedTimestampNotFound,

    /// A stored payload or scalar could not be encoded or decoded.
    #[error("Encoding error: {message}")]
    Encoding { message: String },

    /// Underlying engine failure (I/O, lock, missing region, commit).
    #[error("Engine error: {0}")]
    Engine(#[from] KVStoreError),

    /// The hash index names a height whose primary record is missing or
    /// carries a different hash.
    #[error("Index invariant violated: hash {hash} maps to height {height}: {reason}")]
    InvariantViolation {
        hash: String,
        height: u64,
        reason: &'static str,
    },
}

impl StorageError {
    /// Shorthand for a missing block at `height`.
    pub fn height_not_found(height: u64) -> Self {
        StorageError::NotFound {
            key: LookupKey::Height(height),
        }
    }

    /// Shorthand for a missing hash index entry.
    pub fn hash_not_found(hash: &str) -> Self {
        StorageError::NotFound {
            key: LookupKey::Hash(hash.to_string()),
        }
    }

    /// Shorthand for an unset bound.
    pub fn bound_not_found(kind: BoundKind) -> Self {
        StorageError::NotFound {
            key: LookupKey::Bound(kind),
        }
    }

    /// Whether this is an ordinary absence (as opposed to a fault).
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Encoding {
            message: err.to_string(),
        }
    }
}

/// Key-value engine errors.
#[derive(Debug, Error)]
pub enum KVStoreError {
    /// I/O error during read/write/commit.
    #[error("I/O error: {message}")]
    IOError { message: String },

    /// A region was accessed before the schema was created.
    #[error("Region '{region}' does not exist (schema not initialized)")]
    MissingRegion { region: &'static str },

    /// The database directory could not be locked.
    #[error(transparent)]
    Lock(#[from] LockError),

    /// Engine configuration was rejected before opening.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A fault raised on purpose by a test engine.
    #[error("Injected fault: {message}")]
    Injected { message: String },
}

/// Errors from database directory locking.
#[derive(Debug, Error)]
pub enum LockError {
    /// Lock file could not be created.
    #[error("Failed to create lock file: {0}")]
    CreateFailed(#[source] io::Error),

    /// Another handle still holds the lock after the open timeout elapsed.
    #[error("Database already in use ({})", path.display())]
    AlreadyLocked { pid: Option<u32>, path: PathBuf },

    /// Failed to write PID to lock file.
    #[error("Failed to write PID to lock file: {0}")]
    WriteFailed(#[source] io::Error),
}
