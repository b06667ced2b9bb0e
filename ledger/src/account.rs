use keytree::PublicKey;
use serde::{Deserialize, Serialize};

/// An account referenced by an instruction, together with its permissions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountMeta {
    /// Address of the account.
    pub public_key: PublicKey,
    /// Account must sign the transaction.
    pub is_signer: bool,
    /// Account may be modified by the transaction.
    pub is_writable: bool,
    /// Account pays the transaction fees. Always ordered first.
    pub is_payer: bool,
    /// Account is a program invoked by one of the instructions.
    pub is_program: bool,
}

impl AccountMeta {
    /// A writable account that does not sign.
    pub fn writable(public_key: PublicKey) -> Self {
        Self::new(public_key, false, true)
    }

    /// A read-only account that does not sign.
    pub fn readonly(public_key: PublicKey) -> Self {
        Self::new(public_key, false, false)
    }

    /// A writable account that signs.
    pub fn writable_signer(public_key: PublicKey) -> Self {
        Self::new(public_key, true, true)
    }

    /// A read-only account that signs.
    pub fn readonly_signer(public_key: PublicKey) -> Self {
        Self::new(public_key, true, false)
    }

    /// The fee payer: a writable signer.
    pub fn payer(public_key: PublicKey) -> Self {
        AccountMeta {
            is_payer: true,
            ..Self::writable_signer(public_key)
        }
    }

    /// An invoked program: read-only, no signature.
    pub fn program(public_key: PublicKey) -> Self {
        AccountMeta {
            is_program: true,
            ..Self::readonly(public_key)
        }
    }

    fn new(public_key: PublicKey, is_signer: bool, is_writable: bool) -> Self {
        AccountMeta {
            public_key,
            is_signer,
            is_writable,
            is_payer: false,
            is_program: false,
        }
    }

    /// Folds the permissions of `other` into this meta. Flags only ever escalate.
    pub fn merge(&mut self, other: &AccountMeta) {
        self.is_signer |= other.is_signer;
        self.is_writable |= other.is_writable;
        self.is_payer |= other.is_payer;
        self.is_program |= other.is_program;
    }

    /// Merges duplicate keys and sorts the result into message order:
    /// payer first, then signers, then writable accounts, then non-programs,
    /// ties broken by key bytes.
    ///
    /// The result does not depend on the order of the input.
    pub fn canonicalize(metas: impl IntoIterator<Item = AccountMeta>) -> Vec<AccountMeta> {
        let mut merged: Vec<AccountMeta> = Vec::new();
        for meta in metas {
            match merged.iter_mut().find(|m| m.public_key == meta.public_key) {
                Some(existing) => existing.merge(&meta),
                None => merged.push(meta),
            }
        }
        merged.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        merged
    }

    fn sort_key(&self) -> (bool, bool, bool, bool, PublicKey) {
        (
            !self.is_payer,
            !self.is_signer,
            !self.is_writable,
            self.is_program,
            self.public_key,
        )
    }
}
