use keytree::{KeyPair, PublicKey, Signature};
use readerwriter::{shortvec_encoded_length, Decodable, Encodable, Reader, Writer};
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;
use crate::hash::Hash;
use crate::message::Message;

/// A message together with one signature slot per required signer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Signatures in signer order. Unsigned slots hold all zeroes.
    pub signatures: Vec<Signature>,
    /// The signed message.
    pub message: Message,
}

impl Transaction {
    /// Wraps a message, leaving every signature slot empty.
    pub fn new(message: Message) -> Self {
        let slots = message.signer_keys().len();
        Transaction {
            signatures: vec![Signature::default(); slots],
            message,
        }
    }

    /// Serialized message: the bytes every signer signs.
    pub fn message_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        self.message.encode_to_vec()
    }

    /// Signs the message with each of `keypairs`, placing every signature in
    /// the slot of its key.
    pub fn sign(&mut self, keypairs: &[&KeyPair]) -> Result<(), LedgerError> {
        if keypairs.len() > self.signatures.len() {
            return Err(LedgerError::TooManySigners);
        }
        let bytes = self.message_bytes()?;
        for keypair in keypairs {
            let key = keypair.public_key();
            let slot = self
                .message
                .signer_index(&key)
                .ok_or(LedgerError::SignerNotFound(key))?;
            self.signatures[slot] = keypair.sign(&bytes);
        }
        Ok(())
    }

    /// Places an externally produced signature into the slot of `key`.
    pub fn set_signature(&mut self, key: &PublicKey, signature: Signature) -> Result<(), LedgerError> {
        let slot = self
            .message
            .signer_index(key)
            .ok_or(LedgerError::SignerNotFound(*key))?;
        self.signatures[slot] = signature;
        Ok(())
    }

    /// Signature currently held for `key`.
    pub fn signature_for(&self, key: &PublicKey) -> Option<&Signature> {
        self.message
            .signer_index(key)
            .and_then(|slot| self.signatures.get(slot))
    }

    /// Returns true when every signer slot is filled.
    pub fn is_fully_signed(&self) -> bool {
        self.signatures.iter().all(|s| !s.is_empty())
    }

    /// Verifies every non-empty signature against the message.
    pub fn verify_signatures(&self) -> Result<(), LedgerError> {
        let bytes = self.message_bytes()?;
        for (meta, signature) in self.message.signer_keys().iter().zip(self.signatures.iter()) {
            if signature.is_empty() {
                continue;
            }
            meta.public_key
                .verify(&bytes, signature)
                .map_err(|_| LedgerError::InvalidSignature(meta.public_key))?;
        }
        Ok(())
    }

    /// Identifier of a submitted transaction: the first signature.
    pub fn id(&self) -> Option<&Signature> {
        self.signatures.first()
    }

    /// Hash of the serialized transaction.
    pub fn hash(&self) -> Result<Hash, LedgerError> {
        Ok(Hash::digest(Some(&self.encode_to_vec()?[..])))
    }
}

impl Encodable for Transaction {
    type Error = LedgerError;

    fn encode(&self, w: &mut impl Writer) -> Result<(), LedgerError> {
        w.write_shortvec_len(b"signatures", self.signatures.len())?;
        for signature in self.signatures.iter() {
            w.write(b"signature", signature.as_bytes())?;
        }
        self.message.encode(w)
    }

    fn encoded_length(&self) -> usize {
        shortvec_encoded_length(self.signatures.len())
            + self.signatures.len() * Signature::LENGTH
            + self.message.encoded_length()
    }
}

impl Decodable for Transaction {
    type Error = LedgerError;

    fn decode(r: &mut impl Reader) -> Result<Self, LedgerError> {
        let n = r.read_shortvec_len()?;
        let mut signatures = Vec::with_capacity(n);
        for _ in 0..n {
            signatures.push(Signature(r.read_u8x64()?));
        }
        let message = Message::decode(r)?;
        let expected = message.header.required_signatures as usize;
        if expected != n {
            return Err(LedgerError::SignatureCountMismatch {
                expected,
                actual: n,
            });
        }
        Ok(Transaction {
            signatures,
            message,
        })
    }
}
