//! System program: durable nonce advances.

use byteorder::{ByteOrder, LittleEndian};
use keytree::PublicKey;

use super::{RECENT_BLOCKHASHES_SYSVAR, SYSTEM_PROGRAM};
use crate::account::AccountMeta;
use crate::errors::LedgerError;
use crate::instruction::Instruction;

/// Index of the nonce advance command in the system program.
pub const ADVANCE_NONCE_ACCOUNT: u32 = 4;

/// Advances a durable nonce, which then stands in for the recent blockhash.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AdvanceNonce {
    /// Nonce account.
    pub nonce: PublicKey,
    /// Authority allowed to advance the nonce.
    pub authority: PublicKey,
}

impl AdvanceNonce {
    /// Builds the instruction.
    pub fn instruction(&self) -> Instruction {
        let mut data = vec![0u8; 4];
        LittleEndian::write_u32(&mut data, ADVANCE_NONCE_ACCOUNT);
        Instruction::new(
            SYSTEM_PROGRAM,
            vec![
                AccountMeta::writable(self.nonce),
                AccountMeta::readonly(RECENT_BLOCKHASHES_SYSVAR),
                AccountMeta::readonly_signer(self.authority),
            ],
            data,
        )
    }

    /// Parses a nonce advance out of a decompiled instruction.
    pub fn from_instruction(ix: &Instruction) -> Result<Self, LedgerError> {
        if ix.program != SYSTEM_PROGRAM
            || ix.accounts.len() != 3
            || ix.data.len() != 4
            || LittleEndian::read_u32(&ix.data) != ADVANCE_NONCE_ACCOUNT
        {
            return Err(LedgerError::InvalidInstruction);
        }
        Ok(AdvanceNonce {
            nonce: ix.accounts[0].public_key,
            authority: ix.accounts[2].public_key,
        })
    }
}
