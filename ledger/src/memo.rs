//! Compact 32-byte memo attached to transfers.
//!
//! Bit layout, least significant bit of byte 0 first:
//!
//! | bits    | field         |
//! |---------|---------------|
//! | 0..2    | magic marker  |
//! | 2..5    | version       |
//! | 5..10   | transfer type |
//! | 10..26  | app index     |
//! | 26..250 | payload       |
//!
//! The memo travels as base64 text.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// Marker carried by every memo written by this crate.
pub const MAGIC: u8 = 0x1;

/// Current memo version.
pub const VERSION: u8 = 1;

/// Size of the memo in bytes.
pub const MEMO_LENGTH: usize = 32;

/// Size of the foreign-key payload in bytes.
pub const PAYLOAD_LENGTH: usize = 28;

/// Kind of transfer a memo describes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferType {
    /// No specific kind.
    None,
    /// Reward paid by an app.
    Earn,
    /// Payment to an app.
    Spend,
    /// Payment between two users.
    P2p,
    /// Any value this crate does not know.
    Unknown,
}

impl TransferType {
    fn to_bits(self) -> u8 {
        match self {
            TransferType::None => 0,
            TransferType::Earn => 1,
            TransferType::Spend => 2,
            TransferType::P2p => 3,
            TransferType::Unknown => 0x1f,
        }
    }

    fn from_bits(bits: u8) -> Self {
        match bits {
            0 => TransferType::None,
            1 => TransferType::Earn,
            2 => TransferType::Spend,
            3 => TransferType::P2p,
            _ => TransferType::Unknown,
        }
    }
}

/// Decoded memo fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    /// Memo version, three bits.
    pub version: u8,
    /// Kind of transfer.
    pub transfer_type: TransferType,
    /// Index of the app that produced the transfer.
    pub app_index: u16,
    /// Opaque foreign key.
    pub payload: [u8; PAYLOAD_LENGTH],
}

impl Memo {
    /// Creates a memo with the current version. Payloads longer than
    /// 28 bytes are truncated, shorter ones are zero-padded.
    pub fn new(transfer_type: TransferType, app_index: u16, payload: &[u8]) -> Self {
        let mut buf = [0u8; PAYLOAD_LENGTH];
        let n = payload.len().min(PAYLOAD_LENGTH);
        buf[..n].copy_from_slice(&payload[..n]);
        Memo {
            version: VERSION,
            transfer_type,
            app_index,
            payload: buf,
        }
    }

    /// Packs the memo into 32 bytes.
    pub fn to_bytes(&self) -> [u8; MEMO_LENGTH] {
        let tt = self.transfer_type.to_bits();
        let app = self.app_index;
        let b = &self.payload;
        let mut r = [0u8; MEMO_LENGTH];

        r[0] = MAGIC | (self.version & 0x7) << 2 | (tt & 0x7) << 5;
        r[1] = (tt >> 3) & 0x3 | ((app & 0x3f) as u8) << 2;
        r[2] = ((app >> 6) & 0xff) as u8;
        r[3] = ((app >> 14) & 0x3) as u8 | (b[0] & 0x3f) << 2;
        for i in 4..MEMO_LENGTH - 1 {
            r[i] = (b[i - 4] >> 6) & 0x3 | (b[i - 3] & 0x3f) << 2;
        }
        r[MEMO_LENGTH - 1] = (b[PAYLOAD_LENGTH - 1] >> 6) & 0x3;
        r
    }

    /// Unpacks a memo. Fails if the input is not 32 bytes or the magic marker is zero.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        if bytes.len() != MEMO_LENGTH {
            return Err(LedgerError::InvalidMemo);
        }
        let header = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if header & 0x3 == 0 {
            return Err(LedgerError::InvalidMemo);
        }
        let version = ((header >> 2) & 0x7) as u8;
        let transfer_type = TransferType::from_bits(((header >> 5) & 0x1f) as u8);
        let app_index = ((header >> 10) & 0xffff) as u16;

        let mut payload = [0u8; PAYLOAD_LENGTH];
        for (i, byte) in payload.iter_mut().enumerate() {
            *byte = (bytes[i + 3] >> 2) & 0x3f | (bytes[i + 4] & 0x3) << 6;
        }

        Ok(Memo {
            version,
            transfer_type,
            app_index,
            payload,
        })
    }

    /// Base64 text of the packed memo.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Parses base64 text produced by `to_base64`.
    pub fn from_base64(text: &str) -> Result<Self, LedgerError> {
        let bytes = STANDARD
            .decode(text)
            .map_err(|_| LedgerError::InvalidMemo)?;
        Self::from_bytes(&bytes)
    }
}
