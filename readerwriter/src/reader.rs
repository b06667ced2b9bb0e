use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

/// Error kinds returned by the reader.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// Fewer bytes are available than requested.
    #[error("unexpected end of input")]
    InsufficientBytes,

    /// Bytes were left over after a complete value was parsed.
    #[error("trailing bytes after the encoded value")]
    TrailingBytes,

    /// A compact length prefix is malformed or exceeds 16 bits.
    #[error("invalid compact length prefix")]
    InvalidLength,
}

/// An interface for reading binary data.
pub trait Reader {
    /// Copies bytes into a slice. If there are not enough bytes available,
    /// does not consume any byte and returns `ReadError::InsufficientBytes`.
    fn read(&mut self, dst: &mut [u8]) -> Result<(), ReadError>;

    /// Advances the internal cursor by the number of bytes.
    fn advance(&mut self, cnt: usize) -> Result<(), ReadError>;

    /// Returns remaining number of bytes available for reading.
    fn remaining_bytes(&self) -> usize;

    /// Reads a single byte.
    #[inline]
    fn read_u8(&mut self) -> Result<u8, ReadError> {
        let mut buf = [0u8; 1];
        self.read(&mut buf)?;
        Ok(buf[0])
    }

    /// Reads a LE32-encoded integer.
    #[inline]
    fn read_u32(&mut self) -> Result<u32, ReadError> {
        let mut buf = [0u8; 4];
        self.read(&mut buf)?;
        Ok(LittleEndian::read_u32(&buf))
    }

    /// Reads a LE64-encoded integer.
    #[inline]
    fn read_u64(&mut self) -> Result<u64, ReadError> {
        let mut buf = [0u8; 8];
        self.read(&mut buf)?;
        Ok(LittleEndian::read_u64(&buf))
    }

    /// Reads a 32-byte array.
    #[inline]
    fn read_u8x32(&mut self) -> Result<[u8; 32], ReadError> {
        let mut buf = [0u8; 32];
        self.read(&mut buf)?;
        Ok(buf)
    }

    /// Reads a 64-byte array.
    #[inline]
    fn read_u8x64(&mut self) -> Result<[u8; 64], ReadError> {
        let mut buf = [0u8; 64];
        self.read(&mut buf)?;
        Ok(buf)
    }

    /// Reads `len` bytes into a new vector.
    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>, ReadError> {
        if len > self.remaining_bytes() {
            return Err(ReadError::InsufficientBytes);
        }
        let mut buf = vec![0u8; len];
        self.read(&mut buf)?;
        Ok(buf)
    }

    /// Reads a compact length prefix: 7 bits per byte, least significant
    /// group first, high bit set on every byte but the last.
    /// At most three bytes are accepted and the value must fit in 16 bits.
    fn read_shortvec_len(&mut self) -> Result<usize, ReadError> {
        let mut value: usize = 0;
        for i in 0..3 {
            let byte = self.read_u8()?;
            value |= ((byte & 0x7f) as usize) << (7 * i);
            if byte & 0x80 == 0 {
                // a zero group after the first byte means a non-minimal encoding
                if i > 0 && byte == 0 {
                    return Err(ReadError::InvalidLength);
                }
                if value > u16::max_value() as usize {
                    return Err(ReadError::InvalidLength);
                }
                return Ok(value);
            }
        }
        Err(ReadError::InvalidLength)
    }
}

impl Reader for &[u8] {
    #[inline]
    fn read(&mut self, dst: &mut [u8]) -> Result<(), ReadError> {
        let n = dst.len();
        if n > self.len() {
            return Err(ReadError::InsufficientBytes);
        }
        let (a, b) = self.split_at(n);
        dst.copy_from_slice(a);
        *self = b;
        Ok(())
    }

    #[inline]
    fn advance(&mut self, cnt: usize) -> Result<(), ReadError> {
        if cnt > self.len() {
            return Err(ReadError::InsufficientBytes);
        }
        *self = &self[cnt..];
        Ok(())
    }

    #[inline]
    fn remaining_bytes(&self) -> usize {
        self.len()
    }
}

/// Cursor over a byte slice that remembers the whole input,
/// so callers can recover the exact bytes a sub-parser consumed.
#[derive(Debug)]
pub struct SliceReader<'a> {
    whole: &'a [u8],
    start: usize,
}

impl<'a> SliceReader<'a> {
    /// Creates a reader positioned at the beginning of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        SliceReader {
            whole: data,
            start: 0,
        }
    }

    /// Parses the whole slice with `parse_fn` and fails with
    /// `ReadError::TrailingBytes` if anything is left unread.
    pub fn parse<F, T, E>(data: &'a [u8], parse_fn: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<ReadError>,
    {
        let mut reader = Self::new(data);
        let result = parse_fn(&mut reader)?;
        if reader.remaining_bytes() != 0 {
            return Err(ReadError::TrailingBytes.into());
        }
        Ok(result)
    }

    /// Runs `slice_fn` and returns its result together with the bytes it consumed.
    pub fn slice<F, T, E>(&mut self, slice_fn: F) -> Result<(T, &'a [u8]), E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        let start = self.start;
        let result = slice_fn(self)?;
        let whole = self.whole;
        Ok((result, &whole[start..self.start]))
    }

    /// Marks remaining bytes as read and returns how many were skipped.
    pub fn skip_trailing_bytes(&mut self) -> usize {
        let trailing = self.whole.len() - self.start;
        self.start = self.whole.len();
        trailing
    }
}

impl<'a> Reader for SliceReader<'a> {
    fn read(&mut self, dst: &mut [u8]) -> Result<(), ReadError> {
        let n = dst.len();
        if n > self.remaining_bytes() {
            return Err(ReadError::InsufficientBytes);
        }
        dst.copy_from_slice(&self.whole[self.start..self.start + n]);
        self.start += n;
        Ok(())
    }

    fn advance(&mut self, cnt: usize) -> Result<(), ReadError> {
        if cnt > self.remaining_bytes() {
            return Err(ReadError::InsufficientBytes);
        }
        self.start += cnt;
        Ok(())
    }

    fn remaining_bytes(&self) -> usize {
        self.whole.len() - self.start
    }
}
