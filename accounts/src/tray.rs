use core::fmt;
use std::collections::BTreeMap;
use std::iter;

use keytree::Xprv;
use ledger::Environment;
use serde::{Deserialize, Serialize};

use crate::denomination::Denomination;
use crate::derivation::{AccountCluster, Index};
use crate::errors::TrayError;
use crate::role::Role;

/// A cluster together with the balance the client believes it holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialAccount {
    /// The account.
    pub cluster: AccountCluster,
    /// Client-side balance.
    pub partial_balance: u64,
}

impl PartialAccount {
    fn empty(cluster: AccountCluster) -> Self {
        PartialAccount {
            cluster,
            partial_balance: 0,
        }
    }
}

/// Bucket holding bills of one denomination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    /// Bill size.
    pub denomination: Denomination,
    /// Bucket account.
    pub account: PartialAccount,
}

impl Slot {
    /// Value of one bill.
    pub fn bill(&self) -> u64 {
        self.denomination.value()
    }

    /// Whole bills held.
    pub fn bill_count(&self) -> u64 {
        self.account.partial_balance / self.bill()
    }

    /// Role of the bucket.
    pub fn role(&self) -> Role {
        Role::Bucket(self.denomination)
    }
}

/// Persisted form of a tray: derivation indices and balances only.
/// Clusters are re-derived from the master key on restore.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrayState {
    /// Primary balance.
    pub owner: u64,
    /// Current incoming index and balance.
    pub incoming: RotatingState,
    /// Current outgoing index and balance.
    pub outgoing: RotatingState,
    /// Bucket balances, smallest denomination first.
    pub buckets: [u64; 7],
    /// Relationship balances keyed by domain.
    #[serde(default)]
    pub relationships: BTreeMap<String, u64>,
}

/// Index and balance of a rotating role.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotatingState {
    /// Derivation index.
    pub index: Index,
    /// Client-side balance.
    pub balance: u64,
}

/// All accounts owned by one user.
///
/// Intents operate on a copy and hand back the modified tray; the caller
/// swaps it in once the intent is finalized.
#[derive(Clone)]
pub struct Tray {
    pub(crate) root: Xprv,
    pub(crate) env: Environment,
    pub(crate) owner: PartialAccount,
    pub(crate) incoming: PartialAccount,
    pub(crate) outgoing: PartialAccount,
    pub(crate) slots: Vec<Slot>,
    pub(crate) relationships: BTreeMap<String, PartialAccount>,
}

impl Tray {
    /// Fresh tray: every role at index zero, every balance zero.
    pub fn new(root: Xprv, env: Environment) -> Result<Self, TrayError> {
        Self::restore(root, env, &TrayState::default())
    }

    /// Re-derives all clusters from `root` and applies the stored balances.
    ///
    /// Fails if a bucket holds a fraction of a bill or the balances together
    /// exceed `u64::MAX`.
    pub fn restore(root: Xprv, env: Environment, state: &TrayState) -> Result<Self, TrayError> {
        state.validate()?;

        let account = |role: Role, index: Index, balance: u64| -> Result<PartialAccount, TrayError> {
            Ok(PartialAccount {
                cluster: AccountCluster::derive(&root, role, index, &env)?,
                partial_balance: balance,
            })
        };

        let owner = account(Role::Primary, 0, state.owner)?;
        let incoming = account(Role::Incoming, state.incoming.index, state.incoming.balance)?;
        let outgoing = account(Role::Outgoing, state.outgoing.index, state.outgoing.balance)?;
        let slots = Denomination::ALL
            .iter()
            .zip(state.buckets.iter())
            .map(|(d, balance)| {
                Ok(Slot {
                    denomination: *d,
                    account: account(Role::Bucket(*d), 0, *balance)?,
                })
            })
            .collect::<Result<Vec<_>, TrayError>>()?;
        let relationships = state
            .relationships
            .iter()
            .map(|(domain, balance)| {
                Ok((
                    domain.clone(),
                    account(Role::Relationship(domain.clone()), 0, *balance)?,
                ))
            })
            .collect::<Result<BTreeMap<_, _>, TrayError>>()?;

        Ok(Tray {
            root,
            env,
            owner,
            incoming,
            outgoing,
            slots,
            relationships,
        })
    }

    /// Persisted form of the tray.
    pub fn state(&self) -> TrayState {
        let mut buckets = [0u64; 7];
        for (b, slot) in buckets.iter_mut().zip(self.slots.iter()) {
            *b = slot.account.partial_balance;
        }
        TrayState {
            owner: self.owner.partial_balance,
            incoming: RotatingState {
                index: self.incoming.cluster.index,
                balance: self.incoming.partial_balance,
            },
            outgoing: RotatingState {
                index: self.outgoing.cluster.index,
                balance: self.outgoing.partial_balance,
            },
            buckets,
            relationships: self
                .relationships
                .iter()
                .map(|(domain, a)| (domain.clone(), a.partial_balance))
                .collect(),
        }
    }

    /// Server constants the clusters were derived with.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Primary account.
    pub fn owner(&self) -> &PartialAccount {
        &self.owner
    }

    /// Current incoming account.
    pub fn incoming(&self) -> &PartialAccount {
        &self.incoming
    }

    /// Current outgoing account.
    pub fn outgoing(&self) -> &PartialAccount {
        &self.outgoing
    }

    /// Buckets, smallest denomination first.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Bucket of a denomination.
    pub fn slot(&self, denomination: Denomination) -> &Slot {
        &self.slots[denomination.index()]
    }

    /// Sum of all bucket balances.
    pub fn slots_balance(&self) -> u64 {
        self.slots
            .iter()
            .fold(0u64, |sum, s| sum.saturating_add(s.account.partial_balance))
    }

    /// Sum of all balances in the tray.
    ///
    /// Restoring and crediting keep this within `u64`, so it never saturates
    /// on a tray built through the public API.
    pub fn total_balance(&self) -> u64 {
        self.balances()
            .fold(0u64, |sum, balance| sum.saturating_add(balance))
    }

    fn balances(&self) -> impl Iterator<Item = u64> + '_ {
        iter::once(&self.owner)
            .chain(iter::once(&self.incoming))
            .chain(iter::once(&self.outgoing))
            .chain(self.slots.iter().map(|s| &s.account))
            .chain(self.relationships.values())
            .map(|a| a.partial_balance)
    }

    /// Account of a role, if the tray has one.
    pub fn account(&self, role: &Role) -> Option<&PartialAccount> {
        match role {
            Role::Primary => Some(&self.owner),
            Role::Incoming => Some(&self.incoming),
            Role::Outgoing => Some(&self.outgoing),
            Role::Bucket(d) => Some(&self.slots[d.index()].account),
            Role::Relationship(domain) => self.relationships.get(domain),
            Role::GiftCard => None,
        }
    }

    fn account_mut(&mut self, role: &Role) -> Result<&mut PartialAccount, TrayError> {
        match role {
            Role::Primary => Ok(&mut self.owner),
            Role::Incoming => Ok(&mut self.incoming),
            Role::Outgoing => Ok(&mut self.outgoing),
            Role::Bucket(d) => Ok(&mut self.slots[d.index()].account),
            Role::Relationship(domain) => self
                .relationships
                .get_mut(domain)
                .ok_or_else(|| TrayError::UnknownAccount(role.clone())),
            Role::GiftCard => Err(TrayError::UnknownAccount(role.clone())),
        }
    }

    /// Cluster of a role.
    pub fn cluster(&self, role: &Role) -> Result<&AccountCluster, TrayError> {
        self.account(role)
            .map(|a| &a.cluster)
            .ok_or_else(|| TrayError::UnknownAccount(role.clone()))
    }

    /// Client-side balance of a role.
    pub fn balance(&self, role: &Role) -> Result<u64, TrayError> {
        self.account(role)
            .map(|a| a.partial_balance)
            .ok_or_else(|| TrayError::UnknownAccount(role.clone()))
    }

    /// Relationship account for `domain`, derived on first use.
    pub fn add_relationship(&mut self, domain: &str) -> Result<&AccountCluster, TrayError> {
        if !self.relationships.contains_key(domain) {
            let cluster = AccountCluster::derive(
                &self.root,
                Role::Relationship(domain.to_string()),
                0,
                &self.env,
            )?;
            self.relationships
                .insert(domain.to_string(), PartialAccount::empty(cluster));
        }
        self.cluster(&Role::Relationship(domain.to_string()))
    }

    /// Adds funds that arrived from outside the tray.
    pub fn credit(&mut self, role: &Role, amount: u64) -> Result<(), TrayError> {
        checked_sum(self.balances().chain(Some(amount)))?;
        let account = self.account_mut(role)?;
        account.partial_balance = account
            .partial_balance
            .checked_add(amount)
            .ok_or(TrayError::BalanceOverflow)?;
        Ok(())
    }

    /// Removes funds that left the tray.
    pub fn debit(&mut self, role: &Role, amount: u64) -> Result<(), TrayError> {
        let account = self.account_mut(role)?;
        account.partial_balance = account
            .partial_balance
            .checked_sub(amount)
            .ok_or_else(|| TrayError::InsufficientBalance(role.clone()))?;
        Ok(())
    }

    /// Replaces the incoming account with the next index and returns the previous cluster.
    pub fn rotate_incoming(&mut self) -> Result<AccountCluster, TrayError> {
        let next = self.next_cluster(&self.incoming.cluster)?;
        let previous = std::mem::replace(&mut self.incoming, PartialAccount::empty(next));
        Ok(previous.cluster)
    }

    /// Replaces the outgoing account with the next index and returns the previous cluster.
    pub fn rotate_outgoing(&mut self) -> Result<AccountCluster, TrayError> {
        let next = self.next_cluster(&self.outgoing.cluster)?;
        let previous = std::mem::replace(&mut self.outgoing, PartialAccount::empty(next));
        Ok(previous.cluster)
    }

    fn next_cluster(&self, current: &AccountCluster) -> Result<AccountCluster, TrayError> {
        let index = current
            .index
            .checked_add(1)
            .ok_or_else(|| TrayError::IndexExhausted(current.role.clone()))?;
        AccountCluster::derive(&self.root, current.role.clone(), index, &self.env)
    }
}

fn checked_sum(balances: impl IntoIterator<Item = u64>) -> Result<u64, TrayError> {
    balances.into_iter().try_fold(0u64, |sum, balance| {
        sum.checked_add(balance).ok_or(TrayError::BalanceOverflow)
    })
}

impl TrayState {
    fn validate(&self) -> Result<(), TrayError> {
        for (d, balance) in Denomination::ALL.iter().zip(self.buckets.iter()) {
            if balance % d.value() != 0 {
                return Err(TrayError::FractionalBill(Role::Bucket(*d)));
            }
        }
        let fixed = [self.owner, self.incoming.balance, self.outgoing.balance];
        checked_sum(
            fixed
                .iter()
                .chain(self.buckets.iter())
                .chain(self.relationships.values())
                .copied(),
        )?;
        Ok(())
    }
}

impl fmt::Debug for Tray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tray")
            .field("owner", &self.owner)
            .field("incoming", &self.incoming)
            .field("outgoing", &self.outgoing)
            .field("slots", &self.slots)
            .field("relationships", &self.relationships)
            .finish()
    }
}
