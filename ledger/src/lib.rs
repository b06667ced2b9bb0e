#![deny(missing_docs)]
//! Ledger wire format: canonical account ordering, compact message and
//! transaction encoding, packed memos and the program instructions used
//! to move funds between time-locked vaults.

mod account;
mod builder;
mod environment;
mod errors;
mod hash;
mod instruction;
mod memo;
mod message;
mod pda;
pub mod programs;
mod transaction;


pub use self::account::AccountMeta;
pub use self::builder::{
    close_dormant_account, close_empty_account, transfer, transfer_with_memo, NonceConfig,
};
pub use self::environment::Environment;
pub use self::errors::LedgerError;
pub use self::hash::Hash;
pub use self::instruction::{CompiledInstruction, Instruction};
pub use self::memo::{Memo, TransferType, MEMO_LENGTH, PAYLOAD_LENGTH};
pub use self::message::{Message, MessageHeader};
pub use self::pda::{create_program_address, find_program_address};
pub use self::transaction::Transaction;
pub use keytree::{KeyPair, PublicKey, Signature};
pub use readerwriter::{Decodable, Encodable};
