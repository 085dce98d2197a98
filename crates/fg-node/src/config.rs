//! Node configuration, read from the environment only.

use std::env;

use anyhow::{Context, Result};
use fg_block_index::StoreConfig;
use fg_telemetry::TelemetryConfig;

/// Everything the node needs to start.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Block index engine settings.
    pub store: StoreConfig,
    /// Log output settings.
    pub telemetry: TelemetryConfig,
    /// Activation timestamp to record on first start (`FG_ACTIVATED_TIMESTAMP`).
    pub activated_timestamp: Option<u64>,
}

impl NodeConfig {
    /// Load configuration from environment variables.
    ///
    /// Fails only on a malformed `FG_ACTIVATED_TIMESTAMP` or a store
    /// configuration that cannot be opened.
    pub fn from_env() -> Result<Self> {
        let activated_timestamp = match env::var("FG_ACTIVATED_TIMESTAMP") {
            Ok(raw) => Some(parse_timestamp(&raw)?),
            Err(_) => None,
        };

        let config = Self {
            store: StoreConfig::from_env(),
            telemetry: TelemetryConfig::from_env(),
            activated_timestamp,
        };
        config
            .store
            .validate()
            .context("invalid block index configuration")?;
        Ok(config)
    }
}

fn parse_timestamp(raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .with_context(|| format!("FG_ACTIVATED_TIMESTAMP must be seconds since epoch, got '{}'", raw))
}
