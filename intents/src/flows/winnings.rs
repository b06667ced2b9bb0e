use accounts::{AccountCluster, Tray};
use keytree::PublicKey;
use rand::{CryptoRng, RngCore};

use crate::action::{ActionKind, Transfer, TransferKind};
use crate::builder::IntentBuilder;
use crate::errors::IntentError;
use crate::intent::Intent;
use crate::metadata::Metadata;

/// Pays each `(destination, amount)` pair out of a pool account.
/// The pool is held by the caller, so the tray comes back unchanged.
pub fn distribute_winnings<R: RngCore + CryptoRng>(
    rng: &mut R,
    tray: &Tray,
    pool: &AccountCluster,
    distributions: &[(PublicKey, u64)],
) -> Result<Intent, IntentError> {
    if distributions.is_empty() || distributions.iter().any(|(_, amount)| *amount == 0) {
        return Err(IntentError::InvalidAmount);
    }
    let total = distributions
        .iter()
        .try_fold(0u64, |sum, (_, amount)| sum.checked_add(*amount))
        .ok_or(IntentError::InvalidAmount)?;

    let mut builder = IntentBuilder::new(tray);
    for (destination, amount) in distributions {
        builder.push(ActionKind::Transfer(Transfer {
            kind: TransferKind::NoPrivacyTransfer,
            amount: *amount,
            source: pool.clone(),
            destination: *destination,
        }));
    }

    Ok(builder.finish(
        rng,
        Metadata::DistributeWinnings {
            source: pool.vault(),
            total,
        },
    ))
}
