#![deny(missing_docs)]
//! Intents: atomic payment operations built against a tray.
//!
//! An intent is an ordered list of actions plus the tray those actions leave
//! behind. Construction is pure and synchronous. The server later binds one
//! parameter to each action, after which every action compiles to ledger
//! transactions signed by the authority of the account it acts on.

mod action;
mod builder;
mod errors;
mod flows;
mod intent;
mod metadata;
mod parameter;

#[cfg(test)]
mod tests;

pub use self::action::{
    Action, ActionDescriptor, ActionGroup, ActionKind, ActionType, CloseEmptyAccount, FeeKind, FeePayment,
    OpenAccount, Transfer, TransferKind, Withdraw, WithdrawKind,
};
pub use self::errors::IntentError;
pub use self::flows::{
    create_account, deposit, distribute_winnings, open_relationship, private_transfer, public_transfer,
    receive_cash_link, receive_from_incoming, receive_from_relationship, send_cash_link, withdraw,
    ThirdPartyFee,
};
pub use self::intent::{Intent, IntentDescriptor, IntentState, SignedActions};
pub use self::metadata::Metadata;
pub use self::parameter::{DestinationMetadata, ParameterKind, ServerParameter};
