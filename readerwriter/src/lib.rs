//! Reader and writer traits for the ledger's binary encoding.
//! Lists are prefixed with a compact "short vector" length: 7 bits per byte,
//! continuation in the high bit, least significant group first.

mod codable;
mod reader;
mod writer;

#[cfg(test)]
mod tests;

pub use codable::{Decodable, Encodable};
pub use reader::{ReadError, Reader, SliceReader};
pub use writer::{shortvec_encoded_length, WriteError, Writer};
