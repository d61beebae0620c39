//! Logging setup
//!
//! Library code only emits `tracing` events. Binaries and tools call
//! `init_tracing` once to install a subscriber.

use mien_core::{MienError, MienResult};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter directives used when RUST_LOG is not set
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            format: LogFormat::Pretty,
            filter: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// RUST_LOG wins over the configured filter
    pub fn env_filter(&self) -> MienResult<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.filter)
                .map_err(|e| MienError::InvalidConfig(format!("log filter: {}", e))),
        }
    }
}

/// Install the global subscriber
/// Fails if one is already installed
pub fn init_tracing(config: &LoggingConfig) -> MienResult<()> {
    let filter = config.env_filter()?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let result = match config.format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| MienError::InvalidConfig(format!("tracing subscriber: {}", e)))
}
