//! Global subscriber setup for the binary. Library crates only emit events.

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::errors::ClientError;

/// Installs the global fmt subscriber. `RUST_LOG` overrides the configured level.
pub fn init(config: &LogConfig) -> Result<(), ClientError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| ClientError::Config(format!("log level `{}`: {}", config.level, e)))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| ClientError::Config(e.to_string()))
}
