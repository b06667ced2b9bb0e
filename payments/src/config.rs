use std::path::{Path, PathBuf};
use std::time::Duration;

use ledger::Environment;
use serde::{Deserialize, Serialize};

use crate::errors::ClientError;

/*
Example config file:

[ledger]
subsidizer = "9wB8...base58"
time_authority = "2yVj...base58"
mint = "HAB6...base58"
lock_duration = 21
app_index = 0
max_dust_amount = 1

[poll]
max_attempts = 50
base_delay_ms = 50

[log]
level = "info"

[wallet]
seed_path = "cascade/seed.hex"
state_path = "cascade/tray.json"

*/

/// Configuration file for the client.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Server constants
    #[serde(default)]
    pub ledger: Environment,

    /// Confirmation polling options
    #[serde(default)]
    pub poll: PollConfig,

    /// Logging options
    #[serde(default)]
    pub log: LogConfig,

    /// Local wallet files
    #[serde(default)]
    pub wallet: WalletConfig,
}

/// Confirmation polling options
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Attempts before giving up.
    #[serde(default = "PollConfig::default_max_attempts")]
    pub max_attempts: usize,

    /// Delay step in milliseconds. Attempt `n` waits `base_delay_ms * (n / 10)`.
    #[serde(default = "PollConfig::default_base_delay_ms")]
    pub base_delay_ms: u64,
}

/// Logging options
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive, e.g. `info` or `payments=debug,intents=trace`.
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "LogConfig::default_level")]
    pub level: String,
}

/// Local wallet files
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// File holding the hex-encoded master seed.
    #[serde(default = "WalletConfig::default_seed_path")]
    pub seed_path: PathBuf,

    /// File holding the committed tray state.
    #[serde(default = "WalletConfig::default_state_path")]
    pub state_path: PathBuf,
}

impl Config {
    /// Reads a TOML config file.
    pub fn load(path: &Path) -> Result<Config, ClientError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(toml::from_str(&text)?)
    }

    /// Renders the config as TOML.
    pub fn to_toml(&self) -> Result<String, ClientError> {
        toml::to_string(self).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Returns a documentation for the config file.
    pub fn documentation() -> &'static str {
        r##"
    [ledger]
    subsidizer = "<base58>"          # fee payer of every transaction
    time_authority = "<base58>"      # co-signer of time-lock commands
    mint = "<base58>"                # token held by the vaults
    lock_duration = 21               # vault unlock delay in days
    app_index = 0                    # app index written into memos
    max_dust_amount = 1              # largest dust burned when closing an empty account

    [poll]
    max_attempts = 50                # status checks before giving up
    base_delay_ms = 50               # attempt n waits base_delay_ms * (n / 10)

    [log]
    level = "info"                   # tracing filter, overridden by RUST_LOG

    [wallet]
    seed_path = "cascade/seed.hex"   # hex-encoded 32-byte master seed
    state_path = "cascade/tray.json" # committed tray balances and indices
"##
    }
}

impl PollConfig {
    /// Fifty attempts.
    pub fn default_max_attempts() -> usize {
        50
    }

    /// Fifty milliseconds.
    pub fn default_base_delay_ms() -> u64 {
        50
    }

    /// Wait before attempt number `attempt`, counting from zero.
    pub fn delay_for(&self, attempt: usize) -> Duration {
        Duration::from_millis(self.base_delay_ms.saturating_mul((attempt / 10) as u64))
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            max_attempts: Self::default_max_attempts(),
            base_delay_ms: Self::default_base_delay_ms(),
        }
    }
}

impl LogConfig {
    /// Informational messages and above.
    pub fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: Self::default_level(),
        }
    }
}

impl WalletConfig {
    /// Seed file relative to the working directory.
    pub fn default_seed_path() -> PathBuf {
        PathBuf::from("cascade/seed.hex")
    }

    /// State file relative to the working directory.
    pub fn default_state_path() -> PathBuf {
        PathBuf::from("cascade/tray.json")
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        WalletConfig {
            seed_path: Self::default_seed_path(),
            state_path: Self::default_state_path(),
        }
    }
}
