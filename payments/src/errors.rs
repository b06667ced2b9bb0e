use std::io;

use accounts::TrayError;
use intents::IntentError;
use keytree::PublicKey;
use thiserror::Error;

/// Represents an error reported by, or while talking to, a remote service.
/// Callers rebuild the intent and retry.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ServiceError {
    /// Occurs when the service cannot be reached or times out.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Occurs when the service refuses the request.
    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Represents an error in the client driving intents end to end.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Occurs when an intent cannot be built or advanced.
    #[error("Intent error: {0}")]
    IntentError(#[from] IntentError),

    /// Occurs when the stored tray cannot be restored.
    #[error("Tray error: {0}")]
    TrayError(#[from] TrayError),

    /// Occurs when a remote service fails.
    #[error("Service error: {0}")]
    ServiceError(#[from] ServiceError),

    /// Occurs when the ledger rejects a submitted intent.
    #[error("Intent {0} failed")]
    IntentFailed(PublicKey),

    /// Occurs when the intent is still unconfirmed after the last poll attempt.
    /// The intent may still land; this is not a failure.
    #[error("No result after {attempts} poll attempts")]
    PollLimitReached {
        /// Attempts made.
        attempts: usize,
    },

    /// Occurs when the seed file is malformed.
    #[error("Seed file must hold 32 hex-encoded bytes")]
    InvalidSeed,

    /// Occurs when the configuration cannot be read.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Occurs when persisted state cannot be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Occurs when reading or writing local files fails.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(e: toml::de::Error) -> Self {
        ClientError::Config(e.to_string())
    }
}
