//! Time-lock program: vaults whose owner and the time authority co-sign every
//! movement, with an unlock delay as the owner's escape hatch.

use byteorder::{ByteOrder, LittleEndian};
use keytree::PublicKey;
use serde::{Deserialize, Serialize};

use super::{SYSTEM_PROGRAM, TIMELOCK_PROGRAM, TOKEN_PROGRAM};
use crate::account::AccountMeta;
use crate::environment::Environment;
use crate::errors::LedgerError;
use crate::hash::Hash;
use crate::instruction::Instruction;
use crate::pda::find_program_address;

/// Layout version of the vault accounts.
pub const VAULT_VERSION: u8 = 3;

/// Program-derived address together with its bump seed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramAddress {
    /// Derived address.
    pub public_key: PublicKey,
    /// Bump seed that moved the address off the curve.
    pub bump: u8,
}

/// Addresses of the time-lock state and token vault owned by one authority.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelockAccounts {
    /// Authority that owns the vault.
    pub owner: PublicKey,
    /// Time-lock state account.
    pub state: ProgramAddress,
    /// Token account holding the funds.
    pub vault: ProgramAddress,
}

impl TimelockAccounts {
    /// Derives the state and vault addresses of `owner`.
    pub fn derive(owner: PublicKey, env: &Environment) -> Result<Self, LedgerError> {
        let (state, state_bump) = find_program_address(
            &[
                b"timelock_state",
                env.mint.as_bytes(),
                env.time_authority.as_bytes(),
                owner.as_bytes(),
                &[env.lock_duration],
            ],
            &TIMELOCK_PROGRAM,
        )?;
        let (vault, vault_bump) = find_program_address(
            &[b"timelock_vault", state.as_bytes(), &[VAULT_VERSION]],
            &TIMELOCK_PROGRAM,
        )?;
        Ok(TimelockAccounts {
            owner,
            state: ProgramAddress {
                public_key: state,
                bump: state_bump,
            },
            vault: ProgramAddress {
                public_key: vault,
                bump: vault_bump,
            },
        })
    }
}

/// Commands of the time-lock program used by the payment flows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Moves tokens out of a vault.
    TransferWithAuthority,
    /// Burns a leftover balance up to a limit.
    BurnDustWithAuthority,
    /// Revokes the lock so the vault can be closed.
    RevokeLockWithAuthority,
    /// Starts the unlock countdown.
    DeactivateLock,
    /// Drains an unlocked vault.
    Withdraw,
    /// Closes the state and vault accounts.
    CloseAccounts,
}

impl Command {
    fn name(self) -> &'static str {
        match self {
            Command::TransferWithAuthority => "transfer_with_authority",
            Command::BurnDustWithAuthority => "burn_dust_with_authority",
            Command::RevokeLockWithAuthority => "revoke_lock_with_authority",
            Command::DeactivateLock => "deactivate",
            Command::Withdraw => "withdraw",
            Command::CloseAccounts => "close_accounts",
        }
    }

    /// First eight bytes of `sha256("global:<name>")`.
    pub fn discriminator(self) -> [u8; 8] {
        let hash = Hash::digest(vec![&b"global:"[..], self.name().as_bytes()]);
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&hash.0[..8]);
        buf
    }

    fn data(self, bump: u8, amount: Option<u64>) -> Vec<u8> {
        let mut data = self.discriminator().to_vec();
        data.push(bump);
        if let Some(amount) = amount {
            let mut buf = [0u8; 8];
            LittleEndian::write_u64(&mut buf, amount);
            data.extend_from_slice(&buf);
        }
        data
    }
}

/// Transfer out of a vault, co-signed by the owner and the time authority.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TransferWithAuthority {
    /// Source vault accounts.
    pub source: TimelockAccounts,
    /// Time authority.
    pub time_authority: PublicKey,
    /// Destination token account.
    pub destination: PublicKey,
    /// Fee payer.
    pub payer: PublicKey,
    /// Amount in quarks.
    pub amount: u64,
}

impl TransferWithAuthority {
    /// Builds the instruction.
    pub fn instruction(&self) -> Instruction {
        Instruction::new(
            TIMELOCK_PROGRAM,
            vec![
                AccountMeta::readonly(self.source.state.public_key),
                AccountMeta::writable(self.source.vault.public_key),
                AccountMeta::readonly_signer(self.source.owner),
                AccountMeta::readonly_signer(self.time_authority),
                AccountMeta::writable(self.destination),
                AccountMeta::writable_signer(self.payer),
                AccountMeta::readonly(TOKEN_PROGRAM),
                AccountMeta::readonly(SYSTEM_PROGRAM),
            ],
            Command::TransferWithAuthority.data(self.source.state.bump, Some(self.amount)),
        )
    }

    /// Parses a transfer out of a decompiled instruction.
    pub fn from_instruction(ix: &Instruction) -> Result<Self, LedgerError> {
        let disc = Command::TransferWithAuthority.discriminator();
        if ix.program != TIMELOCK_PROGRAM
            || ix.accounts.len() != 8
            || ix.data.len() != 17
            || ix.data[..8] != disc[..]
        {
            return Err(LedgerError::InvalidInstruction);
        }
        let key = |i: usize| ix.accounts[i].public_key;
        Ok(TransferWithAuthority {
            source: TimelockAccounts {
                owner: key(2),
                state: ProgramAddress {
                    public_key: key(0),
                    bump: ix.data[8],
                },
                // the vault bump is not carried by the instruction
                vault: ProgramAddress {
                    public_key: key(1),
                    bump: 0,
                },
            },
            time_authority: key(3),
            destination: key(4),
            payer: key(5),
            amount: LittleEndian::read_u64(&ix.data[9..17]),
        })
    }
}

/// Burns up to `max_amount` left in a vault.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BurnDustWithAuthority {
    /// Vault accounts.
    pub accounts: TimelockAccounts,
    /// Time authority.
    pub time_authority: PublicKey,
    /// Token mint.
    pub mint: PublicKey,
    /// Fee payer.
    pub payer: PublicKey,
    /// Burn limit in quarks.
    pub max_amount: u64,
}

impl BurnDustWithAuthority {
    /// Builds the instruction.
    pub fn instruction(&self) -> Instruction {
        Instruction::new(
            TIMELOCK_PROGRAM,
            vec![
                AccountMeta::writable(self.accounts.state.public_key),
                AccountMeta::writable(self.accounts.vault.public_key),
                AccountMeta::readonly_signer(self.accounts.owner),
                AccountMeta::readonly_signer(self.time_authority),
                AccountMeta::writable(self.mint),
                AccountMeta::writable_signer(self.payer),
                AccountMeta::readonly(TOKEN_PROGRAM),
                AccountMeta::readonly(SYSTEM_PROGRAM),
            ],
            Command::BurnDustWithAuthority.data(self.accounts.state.bump, Some(self.max_amount)),
        )
    }
}

/// Revokes the lock on a vault. Signed by the time authority.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RevokeLockWithAuthority {
    /// Vault accounts.
    pub accounts: TimelockAccounts,
    /// Time authority.
    pub time_authority: PublicKey,
    /// Fee payer.
    pub payer: PublicKey,
}

impl RevokeLockWithAuthority {
    /// Builds the instruction.
    pub fn instruction(&self) -> Instruction {
        Instruction::new(
            TIMELOCK_PROGRAM,
            vec![
                AccountMeta::writable(self.accounts.state.public_key),
                AccountMeta::writable(self.accounts.vault.public_key),
                AccountMeta::readonly_signer(self.time_authority),
                AccountMeta::writable_signer(self.payer),
                AccountMeta::readonly(TOKEN_PROGRAM),
                AccountMeta::readonly(SYSTEM_PROGRAM),
            ],
            Command::RevokeLockWithAuthority.data(self.accounts.state.bump, None),
        )
    }
}

/// Deactivates the lock. Signed by the vault owner.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DeactivateLock {
    /// Vault accounts.
    pub accounts: TimelockAccounts,
    /// Fee payer.
    pub payer: PublicKey,
}

impl DeactivateLock {
    /// Builds the instruction.
    pub fn instruction(&self) -> Instruction {
        Instruction::new(
            TIMELOCK_PROGRAM,
            vec![
                AccountMeta::writable(self.accounts.state.public_key),
                AccountMeta::readonly_signer(self.accounts.owner),
                AccountMeta::writable_signer(self.payer),
            ],
            Command::DeactivateLock.data(self.accounts.state.bump, None),
        )
    }
}

/// Drains an unlocked vault into `destination`. Signed by the vault owner.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Withdraw {
    /// Vault accounts.
    pub accounts: TimelockAccounts,
    /// Destination token account.
    pub destination: PublicKey,
    /// Fee payer.
    pub payer: PublicKey,
}

impl Withdraw {
    /// Builds the instruction.
    pub fn instruction(&self) -> Instruction {
        Instruction::new(
            TIMELOCK_PROGRAM,
            vec![
                AccountMeta::readonly(self.accounts.state.public_key),
                AccountMeta::writable(self.accounts.vault.public_key),
                AccountMeta::readonly_signer(self.accounts.owner),
                AccountMeta::writable(self.destination),
                AccountMeta::writable_signer(self.payer),
                AccountMeta::readonly(TOKEN_PROGRAM),
                AccountMeta::readonly(SYSTEM_PROGRAM),
            ],
            Command::Withdraw.data(self.accounts.state.bump, None),
        )
    }
}

/// Closes the state and vault accounts, returning rent to the payer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CloseAccounts {
    /// Vault accounts.
    pub accounts: TimelockAccounts,
    /// Time authority.
    pub time_authority: PublicKey,
    /// Fee payer.
    pub payer: PublicKey,
}

impl CloseAccounts {
    /// Builds the instruction.
    pub fn instruction(&self) -> Instruction {
        Instruction::new(
            TIMELOCK_PROGRAM,
            vec![
                AccountMeta::writable(self.accounts.state.public_key),
                AccountMeta::writable(self.accounts.vault.public_key),
                AccountMeta::readonly_signer(self.time_authority),
                AccountMeta::writable_signer(self.payer),
                AccountMeta::readonly(TOKEN_PROGRAM),
                AccountMeta::readonly(SYSTEM_PROGRAM),
            ],
            Command::CloseAccounts.data(self.accounts.state.bump, None),
        )
    }
}
