//! Intent constructors. Each one reads a tray, never mutates it, and returns
//! an intent carrying the ordered actions and the tray they leave behind.

mod account;
mod cash_link;
mod receive;
mod send;
mod winnings;

pub use self::account::{create_account, open_relationship};
pub use self::cash_link::{receive_cash_link, send_cash_link};
pub use self::receive::{deposit, receive_from_incoming, receive_from_relationship};
pub use self::send::{private_transfer, public_transfer, withdraw, ThirdPartyFee};
pub use self::winnings::distribute_winnings;

use accounts::Role;

use crate::errors::IntentError;

/// Accounts that hold spendable funds outside the buckets.
fn ensure_funding(role: &Role) -> Result<(), IntentError> {
    match role {
        Role::Primary | Role::Relationship(_) => Ok(()),
        other => Err(IntentError::InvalidSource(other.clone())),
    }
}
