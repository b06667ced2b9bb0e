use accounts::{Role, Tray};
use rand::{CryptoRng, RngCore};

use super::ensure_funding;
use crate::builder::IntentBuilder;
use crate::errors::IntentError;
use crate::intent::Intent;
use crate::metadata::Metadata;

/// Moves `amount` from the primary account or a relationship account into the buckets.
pub fn deposit<R: RngCore + CryptoRng>(
    rng: &mut R,
    tray: &Tray,
    source: &Role,
    amount: u64,
) -> Result<Intent, IntentError> {
    ensure_funding(source)?;
    receive_privately(rng, tray, source, amount, true)
}

/// Moves the whole incoming balance into the buckets and rotates the incoming account.
/// The rotation closes the previous account as empty, so `amount` must drain it.
pub fn receive_from_incoming<R: RngCore + CryptoRng>(
    rng: &mut R,
    tray: &Tray,
    amount: u64,
) -> Result<Intent, IntentError> {
    let balance = tray.incoming().partial_balance;
    if amount < balance {
        return Err(IntentError::BalanceMismatch {
            expected: balance,
            actual: amount,
        });
    }
    receive_privately(rng, tray, &Role::Incoming, amount, false)
}

/// Moves `amount` from the relationship account of `domain` into the buckets.
pub fn receive_from_relationship<R: RngCore + CryptoRng>(
    rng: &mut R,
    tray: &Tray,
    domain: &str,
    amount: u64,
) -> Result<Intent, IntentError> {
    receive_privately(rng, tray, &Role::Relationship(domain.to_string()), amount, false)
}

fn receive_privately<R: RngCore + CryptoRng>(
    rng: &mut R,
    tray: &Tray,
    source: &Role,
    amount: u64,
    is_deposit: bool,
) -> Result<Intent, IntentError> {
    if amount == 0 {
        return Err(IntentError::InvalidAmount);
    }
    let mut builder = IntentBuilder::new(tray);
    let vault = builder.cluster(source)?.vault();

    let received = builder.tray_mut().receive(source, amount)?;
    builder.exchanges(received)?;
    let redistributed = builder.tray_mut().redistribute()?;
    builder.exchanges(redistributed)?;

    if *source == Role::Incoming {
        builder.rotate_incoming()?;
    }

    Ok(builder.finish(
        rng,
        Metadata::ReceivePaymentsPrivately {
            source: vault,
            amount,
            is_deposit,
        },
    ))
}
