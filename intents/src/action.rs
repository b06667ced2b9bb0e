use accounts::{AccountCluster, Role};
use keytree::{PublicKey, Signature};
use ledger::{Environment, Hash, LedgerError, Memo, Transaction, TransferType};
use serde::{Deserialize, Serialize};

use crate::errors::IntentError;
use crate::parameter::{ParameterKind, ServerParameter};

/// Kind of a transfer action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferKind {
    /// Into a bucket from outside the bucket set, or from a bucket to outgoing.
    TempPrivacyTransfer,
    /// Between two buckets.
    TempPrivacyExchange,
    /// Direct, publicly visible transfer.
    NoPrivacyTransfer,
}

/// Moves an amount out of a cluster's vault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    /// Kind of transfer.
    pub kind: TransferKind,
    /// Amount moved.
    pub amount: u64,
    /// Source cluster; its authority signs.
    pub source: AccountCluster,
    /// Destination token account.
    pub destination: PublicKey,
}

/// Kind of a withdraw action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithdrawKind {
    /// Moves an exact amount to an outside destination.
    NoPrivacyWithdraw(u64),
    /// Sweeps a rotated-away account of the given role and closes it.
    CloseDormantAccount(Role),
}

/// Moves funds out of a single-use account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Withdraw {
    /// Kind of withdraw.
    pub kind: WithdrawKind,
    /// Source cluster; its authority signs.
    pub source: AccountCluster,
    /// Destination token account.
    pub destination: PublicKey,
}

/// Asks the server to open an account. The server builds and pays for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenAccount {
    /// Owner of the tray the account belongs to.
    pub owner: PublicKey,
    /// Account being opened.
    pub cluster: AccountCluster,
}

/// Closes an account whose balance is zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloseEmptyAccount {
    /// Account being closed.
    pub cluster: AccountCluster,
}

/// Recipient of a fee.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeKind {
    /// Fee collected by the server; its destination comes with the parameter.
    Code,
    /// Fee paid to a named account.
    ThirdParty(PublicKey),
}

/// Pays a fee out of a cluster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeePayment {
    /// Recipient.
    pub kind: FeeKind,
    /// Paying cluster.
    pub cluster: AccountCluster,
    /// Fee amount.
    pub amount: u64,
}

/// One ledger operation of an intent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionKind {
    /// See [`Transfer`].
    Transfer(Transfer),
    /// See [`Withdraw`].
    Withdraw(Withdraw),
    /// See [`OpenAccount`].
    OpenAccount(OpenAccount),
    /// See [`CloseEmptyAccount`].
    CloseEmptyAccount(CloseEmptyAccount),
    /// See [`FeePayment`].
    FeePayment(FeePayment),
}

/// Flat name of an action, used in descriptors and logs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    /// [`TransferKind::TempPrivacyTransfer`].
    TempPrivacyTransfer,
    /// [`TransferKind::TempPrivacyExchange`].
    TempPrivacyExchange,
    /// [`TransferKind::NoPrivacyTransfer`].
    NoPrivacyTransfer,
    /// [`WithdrawKind::NoPrivacyWithdraw`].
    NoPrivacyWithdraw,
    /// [`WithdrawKind::CloseDormantAccount`].
    CloseDormantAccount,
    /// [`OpenAccount`].
    OpenAccount,
    /// [`CloseEmptyAccount`].
    CloseEmptyAccount,
    /// [`FeeKind::Code`].
    CodeFeePayment,
    /// [`FeeKind::ThirdParty`].
    ThirdPartyFeePayment,
}

/// Public description of an action, free of secrets. Sent to the server
/// when requesting parameters and signed by the owner when submitting actions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    /// Position in the intent.
    pub id: u32,
    /// Action name.
    pub action_type: ActionType,
    /// Authority of the account the action acts on.
    pub authority: PublicKey,
    /// Vault the action acts on.
    pub source: PublicKey,
    /// Where funds go, if anywhere.
    pub destination: Option<PublicKey>,
    /// Amount moved, if known up front.
    pub amount: Option<u64>,
}

/// An action with its position in the intent and, once bound, its server parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Action {
    /// Position in the intent.
    pub id: u32,
    /// What the action does.
    pub kind: ActionKind,
    /// Server material, bound by `Intent::apply_parameters`.
    pub parameter: Option<ServerParameter>,
}

impl ActionKind {
    /// Flat name of the action.
    pub fn action_type(&self) -> ActionType {
        match self {
            ActionKind::Transfer(t) => match t.kind {
                TransferKind::TempPrivacyTransfer => ActionType::TempPrivacyTransfer,
                TransferKind::TempPrivacyExchange => ActionType::TempPrivacyExchange,
                TransferKind::NoPrivacyTransfer => ActionType::NoPrivacyTransfer,
            },
            ActionKind::Withdraw(w) => match w.kind {
                WithdrawKind::NoPrivacyWithdraw(_) => ActionType::NoPrivacyWithdraw,
                WithdrawKind::CloseDormantAccount(_) => ActionType::CloseDormantAccount,
            },
            ActionKind::OpenAccount(_) => ActionType::OpenAccount,
            ActionKind::CloseEmptyAccount(_) => ActionType::CloseEmptyAccount,
            ActionKind::FeePayment(f) => match f.kind {
                FeeKind::Code => ActionType::CodeFeePayment,
                FeeKind::ThirdParty(_) => ActionType::ThirdPartyFeePayment,
            },
        }
    }

    /// Cluster the action acts on.
    pub fn cluster(&self) -> &AccountCluster {
        match self {
            ActionKind::Transfer(t) => &t.source,
            ActionKind::Withdraw(w) => &w.source,
            ActionKind::OpenAccount(o) => &o.cluster,
            ActionKind::CloseEmptyAccount(c) => &c.cluster,
            ActionKind::FeePayment(f) => &f.cluster,
        }
    }

    /// Cluster whose authority signs the action's transactions.
    /// Opening an account needs no client signature.
    pub fn signer(&self) -> Option<&AccountCluster> {
        match self {
            ActionKind::OpenAccount(_) => None,
            _ => Some(self.cluster()),
        }
    }

    /// Number of transactions the server must provide nonces for.
    pub fn transaction_count(&self) -> usize {
        match self {
            ActionKind::OpenAccount(_) => 0,
            _ => 1,
        }
    }

    fn destination(&self) -> Option<PublicKey> {
        match self {
            ActionKind::Transfer(t) => Some(t.destination),
            ActionKind::Withdraw(w) => Some(w.destination),
            ActionKind::FeePayment(f) => match f.kind {
                FeeKind::ThirdParty(d) => Some(d),
                FeeKind::Code => None,
            },
            ActionKind::OpenAccount(_) | ActionKind::CloseEmptyAccount(_) => None,
        }
    }

    fn amount(&self) -> Option<u64> {
        match self {
            ActionKind::Transfer(t) => Some(t.amount),
            ActionKind::Withdraw(Withdraw {
                kind: WithdrawKind::NoPrivacyWithdraw(amount),
                ..
            }) => Some(*amount),
            ActionKind::FeePayment(f) => Some(f.amount),
            _ => None,
        }
    }
}

impl Action {
    /// Public description of the action.
    pub fn descriptor(&self) -> ActionDescriptor {
        let cluster = self.kind.cluster();
        ActionDescriptor {
            id: self.id,
            action_type: self.kind.action_type(),
            authority: cluster.authority_key(),
            source: cluster.vault(),
            destination: self.kind.destination(),
            amount: self.kind.amount(),
        }
    }

    /// Checks that `parameter` was issued for this action.
    pub(crate) fn accepts(&self, parameter: &ServerParameter) -> bool {
        if parameter.action_id != self.id || parameter.configs.len() != self.kind.transaction_count() {
            return false;
        }
        match (&self.kind, &parameter.kind) {
            (ActionKind::Transfer(t), Some(ParameterKind::TempPrivacy { .. })) => {
                t.kind != TransferKind::NoPrivacyTransfer
            }
            (ActionKind::Transfer(t), None) => t.kind == TransferKind::NoPrivacyTransfer,
            (ActionKind::FeePayment(f), Some(ParameterKind::FeePayment { .. })) => f.kind == FeeKind::Code,
            (ActionKind::FeePayment(f), None) => f.kind != FeeKind::Code,
            (_, None) => true,
            _ => false,
        }
    }

    /// Builds the unsigned transactions of the action from its bound parameter.
    pub fn transactions(&self, env: &Environment, intent_id: &PublicKey) -> Result<Vec<Transaction>, IntentError> {
        let parameter = self
            .parameter
            .as_ref()
            .ok_or(IntentError::MissingParameter(self.id))?;

        parameter
            .configs
            .iter()
            .map(|config| {
                let tx = match &self.kind {
                    ActionKind::Transfer(t) => {
                        let memo = match &parameter.kind {
                            Some(ParameterKind::TempPrivacy {
                                treasury,
                                recent_root,
                            }) => self.commitment_memo(env, treasury, recent_root, intent_id),
                            _ => Memo::new(TransferType::P2p, env.app_index, &[]),
                        };
                        ledger::transfer_with_memo(
                            env,
                            config,
                            &t.source.timelock,
                            t.destination,
                            t.amount,
                            &memo,
                        )?
                    }
                    ActionKind::Withdraw(w) => match w.kind {
                        WithdrawKind::NoPrivacyWithdraw(amount) => {
                            ledger::transfer(env, config, &w.source.timelock, w.destination, amount)?
                        }
                        WithdrawKind::CloseDormantAccount(_) => ledger::close_dormant_account(
                            env,
                            config,
                            &w.source.timelock,
                            w.destination,
                        )?,
                    },
                    ActionKind::CloseEmptyAccount(c) => {
                        ledger::close_empty_account(env, config, &c.cluster.timelock)?
                    }
                    ActionKind::FeePayment(f) => {
                        let destination = match (f.kind, &parameter.kind) {
                            (FeeKind::ThirdParty(d), _) => d,
                            (FeeKind::Code, Some(ParameterKind::FeePayment { destination })) => *destination,
                            (FeeKind::Code, _) => return Err(IntentError::ActionParameterMismatch(self.id)),
                        };
                        ledger::transfer(env, config, &f.cluster.timelock, destination, f.amount)?
                    }
                    ActionKind::OpenAccount(_) => {
                        return Err(IntentError::ActionParameterMismatch(self.id))
                    }
                };
                Ok(tx)
            })
            .collect()
    }

    /// Signs every transaction of the action with its authority and returns
    /// the authority's signatures in transaction order.
    pub fn sign(&self, env: &Environment, intent_id: &PublicKey) -> Result<Vec<Signature>, IntentError> {
        let signer = match self.kind.signer() {
            Some(signer) => signer,
            None => return Ok(Vec::new()),
        };
        self.transactions(env, intent_id)?
            .into_iter()
            .map(|mut tx| {
                tx.sign(&[signer.authority()])?;
                let key = signer.authority_key();
                tx.signature_for(&key)
                    .copied()
                    .ok_or(IntentError::LedgerError(LedgerError::SignerNotFound(key)))
            })
            .collect()
    }

    /// Memo whose payload commits the transfer to the treasury state it was issued against.
    fn commitment_memo(&self, env: &Environment, treasury: &PublicKey, recent_root: &Hash, intent_id: &PublicKey) -> Memo {
        let id = self.id.to_le_bytes();
        let commitment = Hash::digest(vec![
            &treasury.as_bytes()[..],
            &recent_root.as_bytes()[..],
            &intent_id.as_bytes()[..],
            &id[..],
        ]);
        Memo::new(TransferType::P2p, env.app_index, commitment.as_bytes())
    }
}

/// Ordered list of actions. Ids always equal positions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionGroup {
    actions: Vec<Action>,
}

impl ActionGroup {
    /// Empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action, numbering it by its position.
    pub fn push(&mut self, kind: ActionKind) {
        let id = self.actions.len() as u32;
        self.actions.push(Action {
            id,
            kind,
            parameter: None,
        });
    }

    /// Appends all actions of `other`, renumbering them.
    pub fn append(&mut self, other: ActionGroup) {
        for action in other.actions {
            self.push(action.kind);
        }
    }

    /// Actions in order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub(crate) fn actions_mut(&mut self) -> &mut [Action] {
        &mut self.actions
    }

    /// Number of actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the group has no actions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
