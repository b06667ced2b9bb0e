//! Transaction templates for the three kinds of vault movements.
//! The subsidizer pays and advances the nonce; the vault owner fills its own slot.

use keytree::PublicKey;
use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::errors::LedgerError;
use crate::hash::Hash;
use crate::instruction::Instruction;
use crate::memo::{Memo, TransferType};
use crate::message::Message;
use crate::programs::memo::memo_instruction;
use crate::programs::system::AdvanceNonce;
use crate::programs::timelock::{
    BurnDustWithAuthority, CloseAccounts, DeactivateLock, RevokeLockWithAuthority, TimelockAccounts,
    TransferWithAuthority, Withdraw,
};
use crate::transaction::Transaction;

/// Durable nonce issued by the server for one transaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceConfig {
    /// Nonce account advanced by the transaction.
    pub nonce: PublicKey,
    /// Current nonce value, used as the recent blockhash.
    pub blockhash: Hash,
}

fn unsigned(
    env: &Environment,
    config: &NonceConfig,
    instructions: Vec<Instruction>,
) -> Result<Transaction, LedgerError> {
    let advance = AdvanceNonce {
        nonce: config.nonce,
        authority: env.subsidizer,
    };
    let instructions: Vec<_> = Some(advance.instruction())
        .into_iter()
        .chain(instructions)
        .collect();
    let message = Message::new(env.subsidizer, config.blockhash, &instructions)?;
    Ok(Transaction::new(message))
}

/// Moves `amount` out of `source` into `destination`.
pub fn transfer(
    env: &Environment,
    config: &NonceConfig,
    source: &TimelockAccounts,
    destination: PublicKey,
    amount: u64,
) -> Result<Transaction, LedgerError> {
    let memo = Memo::new(TransferType::P2p, env.app_index, &[]);
    transfer_with_memo(env, config, source, destination, amount, &memo)
}

/// Same as `transfer`, with a caller-provided memo.
pub fn transfer_with_memo(
    env: &Environment,
    config: &NonceConfig,
    source: &TimelockAccounts,
    destination: PublicKey,
    amount: u64,
    memo: &Memo,
) -> Result<Transaction, LedgerError> {
    unsigned(
        env,
        config,
        vec![
            memo_instruction(memo),
            TransferWithAuthority {
                source: *source,
                time_authority: env.time_authority,
                destination,
                payer: env.subsidizer,
                amount,
            }
            .instruction(),
        ],
    )
}

/// Burns leftover dust in an emptied vault and closes it.
pub fn close_empty_account(
    env: &Environment,
    config: &NonceConfig,
    accounts: &TimelockAccounts,
) -> Result<Transaction, LedgerError> {
    unsigned(
        env,
        config,
        vec![
            BurnDustWithAuthority {
                accounts: *accounts,
                time_authority: env.time_authority,
                mint: env.mint,
                payer: env.subsidizer,
                max_amount: env.max_dust_amount,
            }
            .instruction(),
            CloseAccounts {
                accounts: *accounts,
                time_authority: env.time_authority,
                payer: env.subsidizer,
            }
            .instruction(),
        ],
    )
}

/// Unlocks a dormant vault, sweeps whatever it holds into `destination` and closes it.
pub fn close_dormant_account(
    env: &Environment,
    config: &NonceConfig,
    accounts: &TimelockAccounts,
    destination: PublicKey,
) -> Result<Transaction, LedgerError> {
    unsigned(
        env,
        config,
        vec![
            memo_instruction(&Memo::new(TransferType::P2p, env.app_index, &[])),
            RevokeLockWithAuthority {
                accounts: *accounts,
                time_authority: env.time_authority,
                payer: env.subsidizer,
            }
            .instruction(),
            DeactivateLock {
                accounts: *accounts,
                payer: env.subsidizer,
            }
            .instruction(),
            Withdraw {
                accounts: *accounts,
                destination,
                payer: env.subsidizer,
            }
            .instruction(),
            CloseAccounts {
                accounts: *accounts,
                time_authority: env.time_authority,
                payer: env.subsidizer,
            }
            .instruction(),
        ],
    )
}
