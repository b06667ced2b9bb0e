use accounts::{AccountCluster, InternalExchange, Role, Tray};
use keytree::PublicKey;
use rand::{CryptoRng, RngCore};

use crate::action::{
    ActionGroup, ActionKind, CloseEmptyAccount, OpenAccount, Transfer, TransferKind, Withdraw, WithdrawKind,
};
use crate::errors::IntentError;
use crate::intent::Intent;
use crate::metadata::Metadata;

/// Accumulates actions against a working copy of a tray.
/// The tray the caller passed in is never touched.
pub(crate) struct IntentBuilder {
    tray: Tray,
    actions: ActionGroup,
}

impl IntentBuilder {
    pub(crate) fn new(tray: &Tray) -> Self {
        IntentBuilder {
            tray: tray.clone(),
            actions: ActionGroup::new(),
        }
    }

    pub(crate) fn tray(&self) -> &Tray {
        &self.tray
    }

    pub(crate) fn tray_mut(&mut self) -> &mut Tray {
        &mut self.tray
    }

    pub(crate) fn push(&mut self, kind: ActionKind) {
        self.actions.push(kind);
    }

    pub(crate) fn owner_vault(&self) -> PublicKey {
        self.tray.owner().cluster.vault()
    }

    pub(crate) fn cluster(&self, role: &Role) -> Result<AccountCluster, IntentError> {
        Ok(self.tray.cluster(role)?.clone())
    }

    /// Turns tray movements into transfer actions. Destinations are the
    /// vaults of the accounts current at the time of the call.
    pub(crate) fn exchanges(&mut self, exchanges: Vec<InternalExchange>) -> Result<(), IntentError> {
        for exchange in exchanges {
            let kind = if exchange.is_bucket_exchange() {
                TransferKind::TempPrivacyExchange
            } else {
                TransferKind::TempPrivacyTransfer
            };
            let source = self.cluster(&exchange.from)?;
            let destination = self.tray.cluster(&exchange.to)?.vault();
            self.push(ActionKind::Transfer(Transfer {
                kind,
                amount: exchange.amount,
                source,
                destination,
            }));
        }
        Ok(())
    }

    pub(crate) fn open(&mut self, cluster: AccountCluster) {
        let owner = self.tray.owner().cluster.authority_key();
        self.push(ActionKind::OpenAccount(OpenAccount { owner, cluster }));
    }

    /// Sweeps `cluster` into the primary vault once it goes dormant.
    pub(crate) fn close_dormant(&mut self, cluster: AccountCluster) {
        let destination = self.owner_vault();
        self.push(ActionKind::Withdraw(Withdraw {
            kind: WithdrawKind::CloseDormantAccount(cluster.role.clone()),
            source: cluster,
            destination,
        }));
    }

    /// Opens the next outgoing account and closes the previous one.
    pub(crate) fn rotate_outgoing(&mut self) -> Result<(), IntentError> {
        let previous = self.tray.rotate_outgoing()?;
        let next = self.tray.outgoing().cluster.clone();
        self.open(next);
        self.close_dormant(previous);
        Ok(())
    }

    /// Closes the drained incoming account, opens the next one and registers
    /// its automatic sweep.
    pub(crate) fn rotate_incoming(&mut self) -> Result<(), IntentError> {
        let previous = self.tray.rotate_incoming()?;
        let next = self.tray.incoming().cluster.clone();
        self.push(ActionKind::CloseEmptyAccount(CloseEmptyAccount { cluster: previous }));
        self.open(next.clone());
        self.close_dormant(next);
        Ok(())
    }

    pub(crate) fn finish<R: RngCore + CryptoRng>(self, rng: &mut R, metadata: Metadata) -> Intent {
        Intent::new(rng, metadata, self.actions, self.tray)
    }
}
