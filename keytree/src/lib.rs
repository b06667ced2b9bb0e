#![deny(missing_docs)]
//! Key tree: deterministic derivation of role-scoped keys from a single master secret,
//! plus Schnorr signatures over Ristretto for signing ledger messages.
//!
//! A derivation path is expressed as transcript customizations rather than integer
//! paths: an intermediate step commits the role, a leaf step commits the index.

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_TABLE;
use curve25519_dalek::scalar::Scalar;
use merlin::Transcript;
use rand::{CryptoRng, RngCore};

mod errors;
mod key;
mod serialization;
mod signature;
mod transcript;

#[cfg(test)]
mod tests;

pub use self::errors::KeyError;
pub use self::key::{KeyPair, PublicKey};
pub use self::signature::Signature;
pub use self::transcript::TranscriptProtocol;

/// Xprv represents an extended private key: a secret scalar and a derivation key.
#[derive(Clone)]
pub struct Xprv {
    scalar: Scalar,
    dk: [u8; 32],
    pubkey: PublicKey,
}

impl Xprv {
    /// Returns a new Xprv, generated using the provided random number generator `rng`.
    pub fn random<T: RngCore + CryptoRng>(mut rng: T) -> Self {
        let scalar = Scalar::random(&mut rng);
        let mut dk = [0u8; 32];
        rng.fill_bytes(&mut dk);
        Self::from_parts(scalar, dk)
    }

    /// Expands a 32-byte seed into a master key.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let mut t = Transcript::new(b"Keytree.seed");
        t.append_message(b"seed", seed);
        let scalar = t.challenge_scalar(b"scalar");
        let mut dk = [0u8; 32];
        t.challenge_bytes(b"dk", &mut dk);
        Self::from_parts(scalar, dk)
    }

    fn from_parts(scalar: Scalar, dk: [u8; 32]) -> Self {
        let pubkey = PublicKey::from(&scalar * &RISTRETTO_BASEPOINT_TABLE);
        Xprv { scalar, dk, pubkey }
    }

    /// Public key of this node of the tree.
    pub fn public_key(&self) -> PublicKey {
        self.pubkey
    }

    /// Returns an intermediate child key. Users must provide `customize`, in order to
    /// separate sibling keys from one another through unique derivation paths.
    pub fn derive_intermediate_key(&self, customize: impl FnOnce(&mut Transcript)) -> Xprv {
        let mut t = self.derivation_transcript();

        customize(&mut t);

        let f = t.challenge_scalar(b"f.intermediate");
        let mut child_dk = [0u8; 32];
        t.challenge_bytes(b"dk", &mut child_dk);

        Self::from_parts(self.scalar + f, child_dk)
    }

    /// Returns a leaf key pair. Leaf keys carry no derivation key and cannot be
    /// derived further.
    pub fn derive_key(&self, customize: impl FnOnce(&mut Transcript)) -> KeyPair {
        let mut t = self.derivation_transcript();

        customize(&mut t);

        let f = t.challenge_scalar(b"f.leaf");
        KeyPair::from_secret(self.scalar + f)
    }

    fn derivation_transcript(&self) -> Transcript {
        let mut t = Transcript::new(b"Keytree.derivation");
        t.commit_point(b"pt", &self.pubkey.as_point());
        t.append_message(b"dk", &self.dk);
        t
    }

    /// Serializes this Xprv to a sequence of bytes.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(self.scalar.as_bytes());
        buf[32..].copy_from_slice(&self.dk);
        buf
    }

    /// Decodes an Xprv from a 64-byte slice, and fails if the slice is not exactly
    /// 64 bytes or the scalar is not canonical.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != 64 {
            return Err(KeyError::InvalidEncoding);
        }
        let mut scalar_bytes = [0u8; 32];
        scalar_bytes.copy_from_slice(&bytes[..32]);
        let scalar = Scalar::from_canonical_bytes(scalar_bytes).ok_or(KeyError::InvalidSecret)?;
        let mut dk = [0u8; 32];
        dk.copy_from_slice(&bytes[32..]);
        Ok(Self::from_parts(scalar, dk))
    }
}
