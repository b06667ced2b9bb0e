use ledger::LedgerError;
use thiserror::Error;

use crate::role::Role;

/// Represents an error in deriving clusters or moving funds within a tray.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum TrayError {
    /// Occurs when moving a zero amount.
    #[error("Amount must be positive")]
    InvalidAmount,

    /// Occurs when the buckets together hold less than the requested amount.
    #[error("Buckets hold {available}, requested {requested}")]
    InsufficientTrayBalance {
        /// Sum of all bucket balances.
        available: u64,
        /// Requested amount.
        requested: u64,
    },

    /// Occurs when an account holds less than it is asked to send.
    #[error("Account {0} has insufficient balance")]
    InsufficientBalance(Role),

    /// Occurs when a bucket holds fewer bills than a step requires.
    #[error("Bucket {0} holds too few bills")]
    InvalidSlotBalance(Role),

    /// Occurs when no larger bucket is left to break a bill from.
    #[error("No bucket can cover the remaining amount")]
    InvalidStepIndex,

    /// Occurs when the bucket chosen for breaking a bill is empty.
    #[error("Bucket {0} is empty")]
    SlotAtIndexEmpty(Role),

    /// Occurs when the largest-first pass cannot assemble the amount.
    #[error("Amount cannot be assembled from whole bills")]
    NaiveWithdrawFailed,

    /// Occurs when a role has no account in the tray.
    #[error("Account {0} is not part of the tray")]
    UnknownAccount(Role),

    /// Occurs when a balance would exceed the representable range.
    #[error("Balance overflow")]
    BalanceOverflow,

    /// Occurs when a rotating role has no next derivation index.
    #[error("Account {0} cannot rotate past its last index")]
    IndexExhausted(Role),

    /// Occurs when a stored bucket balance is not a whole number of bills.
    #[error("Bucket {0} holds a fraction of a bill")]
    FractionalBill(Role),

    /// Occurs when a vault address cannot be derived.
    #[error("Ledger error: {0}")]
    LedgerError(#[from] LedgerError),
}
