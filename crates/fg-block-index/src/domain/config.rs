//! # Store Configuration
//!
//! Engine location and tuning for the block index.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FG_DATA_DIR` | `./data/finality` | Database directory |
//! | `FG_DB_OPEN_TIMEOUT_MS` | `1000` | Bounded wait for the directory lock |
//! | `FG_DB_SYNC_WRITES` | `true` | fsync every committed batch |

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::errors::KVStoreError;

/// Default bounded wait for exclusive access to the database directory.
pub const DEFAULT_OPEN_TIMEOUT: Duration = Duration::from_secs(1);

/// Configuration for opening the block index engine.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Database directory.
    pub data_dir: PathBuf,
    /// How long `open` waits for another handle to release the directory.
    pub open_timeout: Duration,
    /// fsync after each committed write (default: true for durability).
    pub sync_writes: bool,
    /// Write buffer size in bytes (default: 16MB).
    pub write_buffer_size: usize,
    /// Block cache size in bytes (default: 64MB).
    pub block_cache_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/finality"),
            open_timeout: DEFAULT_OPEN_TIMEOUT,
            sync_writes: true,
            write_buffer_size: 16 * 1024 * 1024, // 16MB
            block_cache_size: 64 * 1024 * 1024,  // 64MB
        }
    }
}

impl StoreConfig {
    /// Create config for testing (smaller buffers, no sync, short timeout).
    pub fn for_testing(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            open_timeout: Duration::from_millis(200),
            sync_writes: false,
            write_buffer_size: 1024 * 1024,   // 1MB
            block_cache_size: 4 * 1024 * 1024, // 4MB
        }
    }

    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_dir: env::var("FG_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            open_timeout: env::var("FG_DB_OPEN_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.open_timeout),
            sync_writes: env::var("FG_DB_SYNC_WRITES")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.sync_writes),
            ..defaults
        }
    }

    /// Set the database directory.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Set the bounded wait for the directory lock.
    pub fn with_open_timeout(mut self, timeout: Duration) -> Self {
        self.open_timeout = timeout;
        self
    }

    /// Reject configurations the engine cannot open.
    pub fn validate(&self) -> Result<(), KVStoreError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(KVStoreError::InvalidConfig {
                message: "data_dir must not be empty".to_string(),
            });
        }
        if self.open_timeout.is_zero() {
            return Err(KVStoreError::InvalidConfig {
                message: "open_timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
