use accounts::{Role, Tray};
use keytree::PublicKey;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use super::ensure_funding;
use crate::action::{ActionKind, FeeKind, FeePayment, Transfer, TransferKind, Withdraw, WithdrawKind};
use crate::builder::IntentBuilder;
use crate::errors::IntentError;
use crate::intent::Intent;
use crate::metadata::Metadata;
use crate::parameter::DestinationMetadata;

const BASIS_POINTS: u128 = 10_000;

/// A fee owed to a third party, in basis points of the gross amount.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThirdPartyFee {
    /// Fee recipient.
    pub destination: PublicKey,
    /// Share of the gross amount, in hundredths of a percent.
    pub basis_points: u16,
}

impl ThirdPartyFee {
    /// Fee owed on `amount`, rounded down.
    pub fn amount_on(&self, amount: u64) -> u64 {
        (u128::from(amount) * u128::from(self.basis_points) / BASIS_POINTS) as u64
    }
}

/// Pays `amount` directly from a primary or relationship account.
pub fn public_transfer<R: RngCore + CryptoRng>(
    rng: &mut R,
    tray: &Tray,
    source: &Role,
    destination: PublicKey,
    amount: u64,
    is_withdrawal: bool,
) -> Result<Intent, IntentError> {
    ensure_funding(source)?;
    if amount == 0 {
        return Err(IntentError::InvalidAmount);
    }
    let mut builder = IntentBuilder::new(tray);
    let cluster = builder.cluster(source)?;
    builder.tray_mut().debit(source, amount)?;
    builder.push(ActionKind::Transfer(Transfer {
        kind: TransferKind::NoPrivacyTransfer,
        amount,
        source: cluster,
        destination,
    }));

    Ok(builder.finish(
        rng,
        Metadata::SendPublicPayment {
            destination,
            amount,
            is_withdrawal,
        },
    ))
}

/// Pays `amount` out of the buckets through the outgoing account.
///
/// The code fee and third-party fees are paid from the outgoing account and
/// the destination receives what remains. The outgoing account is rotated.
pub fn private_transfer<R: RngCore + CryptoRng>(
    rng: &mut R,
    tray: &Tray,
    destination: PublicKey,
    amount: u64,
    fee: u64,
    third_parties: &[ThirdPartyFee],
    is_withdrawal: bool,
) -> Result<Intent, IntentError> {
    if amount == 0 {
        return Err(IntentError::InvalidAmount);
    }
    if fee >= amount {
        return Err(IntentError::InvalidFee { fee, amount });
    }

    let mut fees = Vec::with_capacity(third_parties.len() + 1);
    if fee > 0 {
        fees.push((FeeKind::Code, fee));
    }
    for party in third_parties {
        let owed = party.amount_on(amount);
        if owed > 0 {
            fees.push((FeeKind::ThirdParty(party.destination), owed));
        }
    }
    let total = fees
        .iter()
        .try_fold(0u64, |sum, (_, f)| sum.checked_add(*f))
        .unwrap_or(u64::MAX);
    if total >= amount {
        return Err(IntentError::InvalidFee { fee: total, amount });
    }

    let mut builder = IntentBuilder::new(tray);
    send_from_buckets(&mut builder, amount, &fees, amount - total, destination)?;

    Ok(builder.finish(
        rng,
        Metadata::SendPrivatePayment {
            destination,
            amount,
            is_withdrawal,
            is_remote_send: false,
        },
    ))
}

/// Pays `amount` from a primary or relationship account to an external destination.
/// When the destination account has to be created first, its fee is taken out of `amount`.
pub fn withdraw<R: RngCore + CryptoRng>(
    rng: &mut R,
    tray: &Tray,
    source: &Role,
    destination: &DestinationMetadata,
    amount: u64,
) -> Result<Intent, IntentError> {
    ensure_funding(source)?;
    if !destination.is_valid {
        return Err(IntentError::InvalidDestination);
    }
    if amount == 0 {
        return Err(IntentError::InvalidAmount);
    }

    let fee = if destination.requires_initialization { destination.fee } else { 0 };
    if fee >= amount {
        return Err(IntentError::InvalidFee { fee, amount });
    }

    let mut builder = IntentBuilder::new(tray);
    let cluster = builder.cluster(source)?;
    builder.tray_mut().debit(source, amount)?;
    builder.push(ActionKind::Transfer(Transfer {
        kind: TransferKind::NoPrivacyTransfer,
        amount: amount - fee,
        source: cluster.clone(),
        destination: destination.destination,
    }));
    if fee > 0 {
        builder.push(ActionKind::FeePayment(FeePayment {
            kind: FeeKind::Code,
            cluster,
            amount: fee,
        }));
    }

    Ok(builder.finish(
        rng,
        Metadata::SendPublicPayment {
            destination: destination.destination,
            amount,
            is_withdrawal: true,
        },
    ))
}

/// Assembles `amount` in the outgoing account, pays `fees` and `net` out of
/// it, restocks the buckets and rotates the outgoing account.
pub(crate) fn send_from_buckets(
    builder: &mut IntentBuilder,
    amount: u64,
    fees: &[(FeeKind, u64)],
    net: u64,
    destination: PublicKey,
) -> Result<(), IntentError> {
    let start = builder.tray().slots_balance();

    let moves = builder.tray_mut().transfer(amount)?;
    builder.exchanges(moves)?;

    let outgoing = builder.cluster(&Role::Outgoing)?;
    for (kind, fee) in fees {
        builder.push(ActionKind::FeePayment(FeePayment {
            kind: *kind,
            cluster: outgoing.clone(),
            amount: *fee,
        }));
    }
    builder.push(ActionKind::Withdraw(Withdraw {
        kind: WithdrawKind::NoPrivacyWithdraw(net),
        source: outgoing,
        destination,
    }));
    builder.tray_mut().debit(&Role::Outgoing, amount)?;

    let redistributed = builder.tray_mut().redistribute()?;
    builder.exchanges(redistributed)?;

    let moved = start.saturating_sub(builder.tray().slots_balance());
    if moved != amount {
        return Err(IntentError::BalanceMismatch {
            expected: amount,
            actual: moved,
        });
    }

    builder.rotate_outgoing()
}
