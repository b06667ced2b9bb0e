use core::convert::TryFrom;

use keytree::PublicKey;
use readerwriter::{shortvec_encoded_length, Decodable, Encodable, Reader, Writer};
use serde::{Deserialize, Serialize};

use crate::account::AccountMeta;
use crate::errors::LedgerError;
use crate::hash::Hash;
use crate::instruction::{CompiledInstruction, Instruction};

/// Counts that let a decoder recover account permissions from their position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHeader {
    /// Number of accounts that must sign. They come first in the account list.
    pub required_signatures: u8,
    /// Number of trailing signer accounts that are read-only.
    pub readonly_signed: u8,
    /// Number of trailing non-signer accounts that are read-only.
    pub readonly: u8,
}

impl MessageHeader {
    /// Computes the header for a canonically ordered account list.
    /// Fails if any count does not fit in a byte.
    pub fn for_accounts(accounts: &[AccountMeta]) -> Result<Self, LedgerError> {
        let count = |f: fn(&AccountMeta) -> bool| {
            let n = accounts.iter().filter(|m| f(m)).count();
            u8::try_from(n).map_err(|_| LedgerError::TooManyAccounts(accounts.len()))
        };
        Ok(MessageHeader {
            required_signatures: count(|m| m.is_signer)?,
            readonly_signed: count(|m| m.is_signer && !m.is_writable)?,
            readonly: count(|m| !m.is_signer && !m.is_writable)?,
        })
    }

    /// Permissions of the account at `index` in a list of `total` accounts.
    fn flags(&self, index: usize, total: usize) -> (bool, bool) {
        let signers = self.required_signatures as usize;
        let is_signer = index < signers;
        let is_writable = if is_signer {
            index < signers - self.readonly_signed as usize
        } else {
            index < total - self.readonly as usize
        };
        (is_signer, is_writable)
    }

    fn check(&self, total: usize) -> Result<(), LedgerError> {
        let signers = self.required_signatures as usize;
        if signers > total
            || self.readonly_signed > self.required_signatures
            || self.readonly as usize > total - signers
        {
            return Err(LedgerError::InvalidHeader);
        }
        Ok(())
    }
}

/// A compiled list of instructions over a shared account table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Permission counts derived from `accounts`.
    pub header: MessageHeader,
    /// Canonically ordered accounts. The first one is the fee payer.
    pub accounts: Vec<AccountMeta>,
    /// Recent blockhash or durable nonce value.
    pub recent_blockhash: Hash,
    /// Instructions in execution order.
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Collects accounts of all `instructions` plus the payer and the invoked
    /// programs, orders them and compiles the instructions against them.
    pub fn new(
        payer: PublicKey,
        recent_blockhash: Hash,
        instructions: &[Instruction],
    ) -> Result<Self, LedgerError> {
        let metas = Some(AccountMeta::payer(payer))
            .into_iter()
            .chain(instructions.iter().flat_map(|ix| {
                ix.accounts
                    .iter()
                    .cloned()
                    .chain(Some(AccountMeta::program(ix.program)))
            }));
        let accounts = AccountMeta::canonicalize(metas);
        if accounts.len() > u8::max_value() as usize + 1 {
            return Err(LedgerError::TooManyAccounts(accounts.len()));
        }
        let header = MessageHeader::for_accounts(&accounts)?;
        let instructions = instructions
            .iter()
            .map(|ix| ix.compile(&accounts))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Message {
            header,
            accounts,
            recent_blockhash,
            instructions,
        })
    }

    /// Fee payer of the message.
    pub fn payer(&self) -> Option<PublicKey> {
        self.accounts.first().map(|m| m.public_key)
    }

    /// Keys of all accounts in message order.
    pub fn account_keys(&self) -> impl Iterator<Item = PublicKey> + '_ {
        self.accounts.iter().map(|m| m.public_key)
    }

    /// Keys that must sign, in signature slot order.
    pub fn signer_keys(&self) -> &[AccountMeta] {
        let n = (self.header.required_signatures as usize).min(self.accounts.len());
        &self.accounts[..n]
    }

    /// Signature slot of `key`, if it is a required signer.
    pub fn signer_index(&self, key: &PublicKey) -> Option<usize> {
        self.signer_keys().iter().position(|m| &m.public_key == key)
    }

    /// Expands the compiled instructions back into key-based instructions.
    pub fn decompile(&self) -> Result<Vec<Instruction>, LedgerError> {
        self.instructions
            .iter()
            .map(|ix| ix.decompile(&self.accounts))
            .collect()
    }
}

impl Encodable for Message {
    type Error = LedgerError;

    fn encode(&self, w: &mut impl Writer) -> Result<(), LedgerError> {
        w.write_u8(b"required_signatures", self.header.required_signatures)?;
        w.write_u8(b"readonly_signed", self.header.readonly_signed)?;
        w.write_u8(b"readonly", self.header.readonly)?;
        w.write_shortvec_len(b"accounts", self.accounts.len())?;
        for meta in self.accounts.iter() {
            w.write(b"account", meta.public_key.as_bytes())?;
        }
        w.write(b"recent_blockhash", self.recent_blockhash.as_bytes())?;
        w.write_shortvec_len(b"instructions", self.instructions.len())?;
        for ix in self.instructions.iter() {
            ix.encode(w)?;
        }
        Ok(())
    }

    fn encoded_length(&self) -> usize {
        3 + shortvec_encoded_length(self.accounts.len())
            + self.accounts.len() * PublicKey::LENGTH
            + Hash::LENGTH
            + shortvec_encoded_length(self.instructions.len())
            + self
                .instructions
                .iter()
                .map(|ix| ix.encoded_length())
                .sum::<usize>()
    }
}

impl Decodable for Message {
    type Error = LedgerError;

    fn decode(r: &mut impl Reader) -> Result<Self, LedgerError> {
        let header = MessageHeader {
            required_signatures: r.read_u8()?,
            readonly_signed: r.read_u8()?,
            readonly: r.read_u8()?,
        };
        let n = r.read_shortvec_len()?;
        header.check(n)?;
        let mut keys = Vec::with_capacity(n);
        for _ in 0..n {
            keys.push(PublicKey(r.read_u8x32()?));
        }
        let recent_blockhash = Hash(r.read_u8x32()?);
        let count = r.read_shortvec_len()?;
        let mut instructions = Vec::with_capacity(count);
        for _ in 0..count {
            instructions.push(CompiledInstruction::decode(r)?);
        }

        let accounts = keys
            .into_iter()
            .enumerate()
            .map(|(i, public_key)| {
                let (is_signer, is_writable) = header.flags(i, n);
                AccountMeta {
                    public_key,
                    is_signer,
                    is_writable,
                    is_payer: i == 0,
                    is_program: instructions.iter().any(|ix| ix.program_index as usize == i),
                }
            })
            .collect();

        Ok(Message {
            header,
            accounts,
            recent_blockhash,
            instructions,
        })
    }
}
