use thiserror::Error;

/// Represents an error in key decoding, signing, or verification.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum KeyError {
    /// Occurs when a signature does not verify against the message and key.
    #[error("Signature verification failed")]
    InvalidSignature,

    /// Occurs when a public key is not a valid compressed Ristretto point,
    /// e.g. when verifying against a program-derived address.
    #[error("Public key is not a valid curve point")]
    InvalidPublicKey,

    /// Occurs when a byte string or base58 text has the wrong length or alphabet.
    #[error("Invalid key encoding")]
    InvalidEncoding,

    /// Occurs when a secret scalar is not canonically encoded.
    #[error("Secret key is not a canonical scalar")]
    InvalidSecret,
}
