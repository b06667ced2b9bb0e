use keytree::PublicKey;
use readerwriter::{shortvec_encoded_length, Decodable, Encodable, Reader, Writer};
use serde::{Deserialize, Serialize};

use crate::account::AccountMeta;
use crate::errors::LedgerError;

/// A program call with the accounts it touches and opaque input data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Program being invoked.
    pub program: PublicKey,
    /// Accounts passed to the program, in the order the program expects them.
    pub accounts: Vec<AccountMeta>,
    /// Program input.
    pub data: Vec<u8>,
}

impl Instruction {
    /// Creates an instruction.
    pub fn new(program: PublicKey, accounts: Vec<AccountMeta>, data: Vec<u8>) -> Self {
        Instruction {
            program,
            accounts,
            data,
        }
    }

    /// Replaces every account by its index in `accounts`.
    pub fn compile(&self, accounts: &[AccountMeta]) -> Result<CompiledInstruction, LedgerError> {
        let index_of = |key: &PublicKey| -> Result<u8, LedgerError> {
            accounts
                .iter()
                .position(|m| &m.public_key == key)
                .map(|i| i as u8)
                .ok_or(LedgerError::Unrepresentable)
        };
        Ok(CompiledInstruction {
            program_index: index_of(&self.program)?,
            account_indexes: self
                .accounts
                .iter()
                .map(|m| index_of(&m.public_key))
                .collect::<Result<_, _>>()?,
            data: self.data.clone(),
        })
    }
}

/// An instruction whose program and accounts are indices into the message account list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledInstruction {
    /// Index of the invoked program.
    pub program_index: u8,
    /// Indices of the accounts passed to the program.
    pub account_indexes: Vec<u8>,
    /// Program input.
    pub data: Vec<u8>,
}

impl CompiledInstruction {
    /// Resolves indices against `accounts`. The program comes back as a plain
    /// key and each account keeps the permissions recorded in the list.
    pub fn decompile(&self, accounts: &[AccountMeta]) -> Result<Instruction, LedgerError> {
        let resolve = |i: u8| -> Result<&AccountMeta, LedgerError> {
            accounts.get(i as usize).ok_or(LedgerError::Unrepresentable)
        };
        let program = resolve(self.program_index)?.public_key;
        let metas = self
            .account_indexes
            .iter()
            .map(|i| {
                resolve(*i).map(|m| AccountMeta {
                    is_payer: false,
                    is_program: false,
                    ..*m
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Instruction::new(program, metas, self.data.clone()))
    }
}

impl Encodable for CompiledInstruction {
    type Error = LedgerError;

    fn encode(&self, w: &mut impl Writer) -> Result<(), LedgerError> {
        w.write_u8(b"program_index", self.program_index)?;
        w.write_shortvec_len(b"accounts", self.account_indexes.len())?;
        w.write(b"accounts", &self.account_indexes)?;
        w.write_shortvec_len(b"data", self.data.len())?;
        w.write(b"data", &self.data)?;
        Ok(())
    }

    fn encoded_length(&self) -> usize {
        1 + shortvec_encoded_length(self.account_indexes.len())
            + self.account_indexes.len()
            + shortvec_encoded_length(self.data.len())
            + self.data.len()
    }
}

impl Decodable for CompiledInstruction {
    type Error = LedgerError;

    fn decode(r: &mut impl Reader) -> Result<Self, LedgerError> {
        let program_index = r.read_u8()?;
        let n = r.read_shortvec_len()?;
        let account_indexes = r.read_vec(n)?;
        let n = r.read_shortvec_len()?;
        let data = r.read_vec(n)?;
        Ok(CompiledInstruction {
            program_index,
            account_indexes,
            data,
        })
    }
}
