use core::fmt;

use keytree::{KeyPair, PublicKey, Xprv};
use ledger::programs::timelock::TimelockAccounts;
use ledger::Environment;
use merlin::Transcript;

use crate::errors::TrayError;
use crate::role::Role;

/// Derivation index of a rotating role.
pub type Index = u64;

/// Extension trait for Xprv to derive cluster authorities by role and index.
pub trait XprvDerivation {
    /// Derives the authority key of `role` at `index`.
    fn key_for(&self, role: &Role, index: Index) -> KeyPair;
}

impl XprvDerivation for Xprv {
    fn key_for(&self, role: &Role, index: Index) -> KeyPair {
        self.derive_intermediate_key(|t| commit_role(t, role))
            .derive_key(|t| t.append_u64(b"index", index))
    }
}

fn commit_role(t: &mut Transcript, role: &Role) {
    t.append_message(b"role", role.tag());
    match role {
        Role::Bucket(d) => t.append_u64(b"denomination", d.value()),
        Role::Relationship(domain) => t.append_message(b"domain", domain.as_bytes()),
        _ => {}
    }
}

/// An authority key together with the time-locked vault it controls.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountCluster {
    /// Purpose of the cluster.
    pub role: Role,
    /// Derivation index.
    pub index: Index,
    authority: KeyPair,
    /// Vault and state addresses of the authority.
    pub timelock: TimelockAccounts,
}

impl AccountCluster {
    /// Derives the cluster of `role` at `index` from the master key.
    pub fn derive(root: &Xprv, role: Role, index: Index, env: &Environment) -> Result<Self, TrayError> {
        let authority = root.key_for(&role, index);
        Self::from_authority(role, index, authority, env)
    }

    /// Builds a cluster around an existing authority, e.g. a gift card's.
    pub fn from_authority(
        role: Role,
        index: Index,
        authority: KeyPair,
        env: &Environment,
    ) -> Result<Self, TrayError> {
        let timelock = TimelockAccounts::derive(authority.public_key(), env)?;
        Ok(AccountCluster {
            role,
            index,
            authority,
            timelock,
        })
    }

    /// Gift card cluster expanded from its own 32-byte seed.
    pub fn gift_card(seed: &[u8; 32], env: &Environment) -> Result<Self, TrayError> {
        Self::derive(&Xprv::from_seed(seed), Role::GiftCard, 0, env)
    }

    /// Key pair that signs for the vault.
    pub fn authority(&self) -> &KeyPair {
        &self.authority
    }

    /// Public key of the authority.
    pub fn authority_key(&self) -> PublicKey {
        self.authority.public_key()
    }

    /// Token account holding the cluster's funds.
    pub fn vault(&self) -> PublicKey {
        self.timelock.vault.public_key
    }
}

impl fmt::Debug for AccountCluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AccountCluster({} #{} vault={})",
            self.role,
            self.index,
            self.vault()
        )
    }
}
