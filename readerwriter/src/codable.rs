use crate::{ReadError, Reader, SliceReader, WriteError, Writer};

/// A trait for encoding structures using the [Writer] trait.
///
/// [Writer]: crate::Writer
pub trait Encodable {
    /// Error produced by the encoder.
    type Error: std::error::Error + From<WriteError>;

    /// Encodes receiver into bytes appending them to a provided buffer.
    fn encode(&self, w: &mut impl Writer) -> Result<(), Self::Error>;

    /// Returns precise length in bytes for the serialized representation of the receiver.
    fn encoded_length(&self) -> usize;

    /// Encodes the receiver into a newly allocated vector of bytes.
    fn encode_to_vec(&self) -> Result<Vec<u8>, Self::Error> {
        let mut buf = Vec::with_capacity(self.encoded_length());
        self.encode(&mut buf)?;
        Ok(buf)
    }
}

/// A trait for decoding bytes into structure using the [Reader] trait.
///
/// [Reader]: crate::Reader
pub trait Decodable: Sized {
    /// Error produced by the decoder.
    type Error: std::error::Error + From<ReadError>;

    /// Decodes bytes into self by reading bytes from reader.
    fn decode(buf: &mut impl Reader) -> Result<Self, Self::Error>;

    /// Decodes a complete value from a slice, rejecting trailing bytes.
    fn decode_from_slice(bytes: &[u8]) -> Result<Self, Self::Error> {
        SliceReader::parse(bytes, |r| Self::decode(r))
    }
}
