#![deny(missing_docs)]
//! Client side of the payment flow.
//!
//! Intents are built offline by the `intents` crate. This crate connects them
//! to the outside world: it asks the server for per-action parameters, signs,
//! submits, polls for confirmation and persists the committed tray.
//! The remote collaborators sit behind async traits so that tests and
//! alternative transports can plug in their own implementations.

mod client;
mod config;
mod errors;
pub mod logging;
mod poll;
pub mod services;
mod store;

#[cfg(test)]
mod tests;

pub use self::client::Client;
pub use self::config::{Config, LogConfig, PollConfig, WalletConfig};
pub use self::errors::{ClientError, ServiceError};
pub use self::poll::poll_until;
pub use self::services::{
    DestinationMetadataService, IntentStatus, ParameterService, Submission, SubmissionService, TrayStore,
};
pub use self::store::{create_seed, load_seed, open_wallet, JsonFileStore, MemoryStore};
