#![deny(missing_docs)]
//! Accounts of a single user, grouped into a tray.
//!
//! Every account is a cluster: an authority key derived from the user's master
//! key by role and index, plus the time-locked vault it controls. Balances are
//! kept in power-of-ten buckets so that payments can be assembled from, and
//! received into, single-use accounts without revealing the exact amounts
//! the user holds.

mod cascade;
mod denomination;
mod derivation;
mod errors;
mod role;
mod tray;

#[cfg(test)]
mod tests;

pub use self::cascade::InternalExchange;
pub use self::denomination::{split_bills, split_largest, Denomination, FIT, MAX_BILLS};
pub use self::derivation::{AccountCluster, Index, XprvDerivation};
pub use self::errors::TrayError;
pub use self::role::Role;
pub use self::tray::{PartialAccount, RotatingState, Slot, Tray, TrayState};
