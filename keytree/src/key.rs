use core::fmt;
use core::str::FromStr;

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_TABLE;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use rand::{CryptoRng, RngCore};

use super::errors::KeyError;
use super::signature::Signature;

/// A 32-byte public identifier on the ledger.
///
/// Account keys are compressed Ristretto points, but the same type also holds
/// addresses with no private key behind them (program ids, derived vaults),
/// so no curve validation happens on construction.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    /// Length of the encoded key in bytes.
    pub const LENGTH: usize = 32;

    /// Decodes a key from a 32-byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != Self::LENGTH {
            return Err(KeyError::InvalidEncoding);
        }
        let mut buf = [0u8; 32];
        buf.copy_from_slice(bytes);
        Ok(PublicKey(buf))
    }

    /// Returns the view into byte representation of the key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the byte representation of the key.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Base58 text form used for display and configuration files.
    pub fn to_base58(&self) -> String {
        bs58::encode(&self.0).into_string()
    }

    /// Interprets the key as a compressed Ristretto point.
    pub fn as_point(&self) -> CompressedRistretto {
        CompressedRistretto(self.0)
    }

    /// Verifies a signature over `message` made with the matching `KeyPair::sign`.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), KeyError> {
        signature.verify_message(message, self)
    }
}

impl From<CompressedRistretto> for PublicKey {
    fn from(p: CompressedRistretto) -> Self {
        PublicKey(p.to_bytes())
    }
}

impl From<RistrettoPoint> for PublicKey {
    fn from(p: RistrettoPoint) -> Self {
        p.compress().into()
    }
}

impl FromStr for PublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|_| KeyError::InvalidEncoding)?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_base58())
    }
}

/// Secret scalar together with its public key.
#[derive(Clone)]
pub struct KeyPair {
    secret: Scalar,
    public: PublicKey,
}

impl KeyPair {
    /// Constructs a key pair from a secret scalar.
    pub fn from_secret(secret: Scalar) -> Self {
        let public = PublicKey::from(&secret * &RISTRETTO_BASEPOINT_TABLE);
        KeyPair { secret, public }
    }

    /// Generates a fresh key pair. Used for single-use identifiers and gift cards,
    /// which are not part of the derivation tree.
    pub fn generate<T: RngCore + CryptoRng>(rng: &mut T) -> Self {
        Self::from_secret(Scalar::random(rng))
    }

    /// Decodes a key pair from its 32-byte secret.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != 32 {
            return Err(KeyError::InvalidEncoding);
        }
        let mut buf = [0u8; 32];
        buf.copy_from_slice(bytes);
        let secret = Scalar::from_canonical_bytes(buf).ok_or(KeyError::InvalidSecret)?;
        Ok(Self::from_secret(secret))
    }

    /// Encodes the secret scalar.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.secret.to_bytes()
    }

    /// Public half of the pair.
    pub fn public_key(&self) -> PublicKey {
        self.public
    }

    /// Signs a byte string. Signing is deterministic: the same key and message
    /// always produce the same signature.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature::sign_message(message, self)
    }

    pub(crate) fn secret(&self) -> &Scalar {
        &self.secret
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.public == other.public
    }
}

impl Eq for KeyPair {}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair({})", self.public)
    }
}
