use accounts::{AccountCluster, Role, Tray};
use rand::{CryptoRng, RngCore};

use super::send::send_from_buckets;
use crate::action::{ActionKind, Withdraw, WithdrawKind};
use crate::builder::IntentBuilder;
use crate::errors::IntentError;
use crate::intent::Intent;
use crate::metadata::Metadata;

/// Funds a gift card with `amount` from the buckets.
/// An unclaimed gift card sweeps back into the primary vault once it goes dormant.
pub fn send_cash_link<R: RngCore + CryptoRng>(
    rng: &mut R,
    tray: &Tray,
    gift_card: &AccountCluster,
    amount: u64,
) -> Result<Intent, IntentError> {
    if amount == 0 {
        return Err(IntentError::InvalidAmount);
    }
    if gift_card.role != Role::GiftCard {
        return Err(IntentError::InvalidDestination);
    }

    let mut builder = IntentBuilder::new(tray);
    builder.open(gift_card.clone());
    send_from_buckets(&mut builder, amount, &[], amount, gift_card.vault())?;
    builder.close_dormant(gift_card.clone());

    Ok(builder.finish(
        rng,
        Metadata::SendPrivatePayment {
            destination: gift_card.vault(),
            amount,
            is_withdrawal: false,
            is_remote_send: true,
        },
    ))
}

/// Claims `amount` from a gift card into the current incoming account.
pub fn receive_cash_link<R: RngCore + CryptoRng>(
    rng: &mut R,
    tray: &Tray,
    gift_card: &AccountCluster,
    amount: u64,
) -> Result<Intent, IntentError> {
    if amount == 0 {
        return Err(IntentError::InvalidAmount);
    }
    if gift_card.role != Role::GiftCard {
        return Err(IntentError::InvalidSource(gift_card.role.clone()));
    }

    let mut builder = IntentBuilder::new(tray);
    let destination = builder.tray().incoming().cluster.vault();
    builder.push(ActionKind::Withdraw(Withdraw {
        kind: WithdrawKind::NoPrivacyWithdraw(amount),
        source: gift_card.clone(),
        destination,
    }));
    builder.tray_mut().credit(&Role::Incoming, amount)?;

    Ok(builder.finish(
        rng,
        Metadata::ReceivePaymentsPublicly {
            source: gift_card.vault(),
            amount,
            is_remote_send: true,
        },
    ))
}
