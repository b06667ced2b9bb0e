use keytree::{KeyError, PublicKey};
use readerwriter::{ReadError, WriteError};
use thiserror::Error;

/// Represents an error in building, encoding or signing ledger messages.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum LedgerError {
    /// Occurs when a message would reference more accounts than a one-byte index can address.
    #[error("Message references too many accounts: {0}")]
    TooManyAccounts(usize),

    /// Occurs when an instruction refers to an account that is not present in the message.
    #[error("Instruction cannot be represented with the given accounts")]
    Unrepresentable,

    /// Occurs when the header counts do not fit the list of account keys.
    #[error("Message header is inconsistent with its account keys")]
    InvalidHeader,

    /// Occurs when the number of signatures differs from the required signer count.
    #[error("Expected {expected} signatures, found {actual}")]
    SignatureCountMismatch {
        /// Signatures required by the message header.
        expected: usize,
        /// Signatures present in the encoding.
        actual: usize,
    },

    /// Occurs when signing with more key pairs than there are signer slots.
    #[error("Too many signers provided")]
    TooManySigners,

    /// Occurs when a signing key is not one of the message's required signers.
    #[error("Key {0} is not a required signer")]
    SignerNotFound(PublicKey),

    /// Occurs when a present signature does not verify.
    #[error("Invalid signature for {0}")]
    InvalidSignature(PublicKey),

    /// Occurs when the memo bytes carry no valid magic marker or are malformed.
    #[error("Invalid memo encoding")]
    InvalidMemo,

    /// Occurs when a program address seed is longer than 32 bytes or there are too many seeds.
    #[error("Program address seeds exceed the allowed length")]
    MaxSeedLengthExceeded,

    /// Occurs when a candidate program address lands on the curve.
    #[error("Program address is on the curve")]
    InvalidSeeds,

    /// Occurs when no bump seed yields an off-curve program address.
    #[error("Unable to find a viable program address bump")]
    NoViableBump,

    /// Occurs when an instruction does not match the expected program layout.
    #[error("Instruction does not match the expected layout")]
    InvalidInstruction,

    /// Occurs when a key cannot be decoded.
    #[error("Key error: {0}")]
    KeyError(#[from] KeyError),

    /// Occurs when the input is truncated or carries trailing bytes.
    #[error("Read error: {0}")]
    ReadError(#[from] ReadError),

    /// Occurs when an output buffer overflows.
    #[error("Write error: {0}")]
    WriteError(#[from] WriteError),
}
