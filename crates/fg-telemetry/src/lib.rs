//! # Finality Gadget Telemetry
//!
//! Structured logging setup shared by every binary in the workspace.
//! Library crates only emit `tracing` events; installing the subscriber is
//! the binary's job, through [`init_telemetry`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fg_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     // Your application code here
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FG_SERVICE_NAME` | `finality-gadget` | Service name in logs |
//! | `FG_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `FG_CONSOLE_OUTPUT` | `true` | Write events to stdout |
//! | `FG_JSON_LOGS` | `false` (`true` in containers) | JSON formatted events |

mod config;
mod logging;

pub use config::TelemetryConfig;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install the global tracing subscriber.
///
/// Fails if the filter does not parse or a subscriber is already installed.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    logging::init_logging(config)?;

    tracing::info!(
        service = %config.service_name,
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );
    Ok(())
}
