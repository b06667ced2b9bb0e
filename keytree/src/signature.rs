use core::fmt;

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_TABLE;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use merlin::Transcript;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use super::errors::KeyError;
use super::key::{KeyPair, PublicKey};
use super::transcript::TranscriptProtocol;

/// A Schnorr signature encoded as `R || s`.
///
/// Kept as raw bytes so that unsigned (all-zero) slots and arbitrary
/// wire input round-trip unchanged; parsing happens on verification.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Signature(pub [u8; 64]);

impl Default for Signature {
    fn default() -> Self {
        Signature([0u8; 64])
    }
}

impl Signature {
    /// Length of the encoded signature in bytes.
    pub const LENGTH: usize = 64;

    /// Creates a signature over the transcript state.
    ///
    /// The nonce is drawn from the transcript rekeyed with the secret and finalized
    /// with a fixed-seed generator, so the result depends only on the transcript
    /// and the key.
    #[allow(non_snake_case)]
    pub fn sign(transcript: &mut Transcript, keypair: &KeyPair) -> Signature {
        let x = keypair.secret();
        let X = keypair.public_key().as_point();

        let mut rng = transcript
            .build_rng()
            .rekey_with_witness_bytes(b"x", x.as_bytes())
            .finalize(&mut ChaChaRng::from_seed([0u8; 32]));

        let r = Scalar::random(&mut rng);
        let R = (&r * &RISTRETTO_BASEPOINT_TABLE).compress();

        let c = {
            transcript.signature_domain_sep();
            transcript.commit_point(b"X", &X);
            transcript.commit_point(b"R", &R);
            transcript.challenge_scalar(b"c")
        };

        let s = r + c * x;

        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(R.as_bytes());
        buf[32..].copy_from_slice(s.as_bytes());
        Signature(buf)
    }

    /// Verifies the signature over a transcript using the provided public key.
    /// Transcript should be in the same state as it was during the `sign` call.
    #[allow(non_snake_case)]
    pub fn verify(&self, transcript: &mut Transcript, pubkey: &PublicKey) -> Result<(), KeyError> {
        let X = pubkey.as_point();
        let P = X.decompress().ok_or(KeyError::InvalidPublicKey)?;

        let mut Rbuf = [0u8; 32];
        Rbuf.copy_from_slice(&self.0[..32]);
        let R = CompressedRistretto(Rbuf);

        let mut sbuf = [0u8; 32];
        sbuf.copy_from_slice(&self.0[32..]);
        let s = Scalar::from_canonical_bytes(sbuf).ok_or(KeyError::InvalidSignature)?;

        let c = {
            transcript.signature_domain_sep();
            transcript.commit_point(b"X", &X);
            transcript.commit_point(b"R", &R);
            transcript.challenge_scalar(b"c")
        };

        // s * G == R + c * X
        let expected_R = RistrettoPoint::vartime_double_scalar_mul_basepoint(&(-c), &P, &s);
        if expected_R.compress() == R {
            Ok(())
        } else {
            Err(KeyError::InvalidSignature)
        }
    }

    /// Decodes a signature from a 64-byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != Self::LENGTH {
            return Err(KeyError::InvalidEncoding);
        }
        let mut buf = [0u8; 64];
        buf.copy_from_slice(bytes);
        Ok(Signature(buf))
    }

    /// Returns the view into byte representation of the signature.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Returns true for a slot nobody has signed yet.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

// Message-oriented API
impl Signature {
    /// Signs a byte string. Internally it creates a Transcript labelled
    /// "Keytree.sign_message" and appends the message under the label "msg".
    pub fn sign_message(message: &[u8], keypair: &KeyPair) -> Signature {
        Self::sign(&mut Self::transcript_for_message(message), keypair)
    }

    /// Verifies the signature over a message made with `sign_message`.
    pub fn verify_message(&self, message: &[u8], pubkey: &PublicKey) -> Result<(), KeyError> {
        self.verify(&mut Self::transcript_for_message(message), pubkey)
    }

    fn transcript_for_message(message: &[u8]) -> Transcript {
        let mut t = Transcript::new(b"Keytree.sign_message");
        t.append_message(b"msg", message);
        t
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", bs58::encode(&self.0[..]).into_string())
    }
}
