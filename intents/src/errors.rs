use accounts::{Role, TrayError};
use ledger::LedgerError;
use thiserror::Error;

use crate::intent::IntentState;

/// Represents an error in constructing an intent or driving it through its states.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum IntentError {
    /// Occurs when an amount is zero.
    #[error("Amount must be positive")]
    InvalidAmount,

    /// Occurs when a fee is not below the amount it is charged on.
    #[error("Fee {fee} is not below the amount {amount}")]
    InvalidFee {
        /// Requested fee.
        fee: u64,
        /// Amount of the payment.
        amount: u64,
    },

    /// Occurs when funds are requested from an account that cannot fund the operation.
    #[error("Account {0} cannot fund this operation")]
    InvalidSource(Role),

    /// Occurs when the destination cannot receive funds.
    #[error("Destination is not a valid token account")]
    InvalidDestination,

    /// Occurs when the built actions do not move exactly the requested amount.
    #[error("Actions move {actual}, expected {expected}")]
    BalanceMismatch {
        /// Requested amount.
        expected: u64,
        /// Amount the actions move.
        actual: u64,
    },

    /// Occurs when the server returns a different number of parameters than actions.
    #[error("Expected {expected} parameters, received {actual}")]
    InvalidParameterCount {
        /// Number of actions.
        expected: usize,
        /// Number of parameters.
        actual: usize,
    },

    /// Occurs when a parameter does not belong to the action at its position.
    #[error("Parameter does not match action {0}")]
    ActionParameterMismatch(u32),

    /// Occurs when compiling an action that has no parameter bound.
    #[error("Action {0} has no server parameter")]
    MissingParameter(u32),

    /// Occurs when a transition is requested out of order.
    #[error("Intent is {actual:?}, expected {expected:?}")]
    InvalidState {
        /// State the transition starts from.
        expected: IntentState,
        /// Current state.
        actual: IntentState,
    },

    /// Occurs when the action list cannot be serialized for signing.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Occurs when the tray cannot cover the intent.
    #[error("Tray error: {0}")]
    TrayError(#[from] TrayError),

    /// Occurs when a transaction cannot be built or signed.
    #[error("Ledger error: {0}")]
    LedgerError(#[from] LedgerError),
}
