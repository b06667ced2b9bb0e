use core::mem;
use thiserror::Error;

/// Error kinds returned by the writer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// The target buffer cannot hold the bytes.
    #[error("insufficient capacity")]
    InsufficientCapacity,

    /// A list is too long for a compact length prefix.
    #[error("length {0} does not fit in a compact length prefix")]
    LengthOverflow(usize),
}

/// Interface for writing binary data.
pub trait Writer {
    /// Writes bytes with the given label. If there is no sufficient capacity,
    /// performs no modifications and returns WriteError::InsufficientCapacity.
    fn write(&mut self, label: &'static [u8], src: &[u8]) -> Result<(), WriteError>;

    /// Remaining number of bytes that can be written.
    fn remaining_capacity(&self) -> usize;

    /// Writes a single byte.
    #[inline]
    fn write_u8(&mut self, label: &'static [u8], x: u8) -> Result<(), WriteError> {
        self.write(label, &[x])
    }

    /// Writes a LE32-encoded integer.
    #[inline]
    fn write_u32(&mut self, label: &'static [u8], x: u32) -> Result<(), WriteError> {
        self.write(label, &x.to_le_bytes())
    }

    /// Writes a LE64-encoded integer.
    #[inline]
    fn write_u64(&mut self, label: &'static [u8], x: u64) -> Result<(), WriteError> {
        self.write(label, &x.to_le_bytes())
    }

    /// Writes a compact length prefix (see `Reader::read_shortvec_len`).
    fn write_shortvec_len(&mut self, label: &'static [u8], len: usize) -> Result<(), WriteError> {
        if len > u16::max_value() as usize {
            return Err(WriteError::LengthOverflow(len));
        }
        let mut buf = [0u8; 3];
        let mut n = 0;
        let mut rem = len;
        loop {
            let mut byte = (rem & 0x7f) as u8;
            rem >>= 7;
            if rem != 0 {
                byte |= 0x80;
            }
            buf[n] = byte;
            n += 1;
            if rem == 0 {
                break;
            }
        }
        self.write(label, &buf[..n])
    }
}

impl Writer for Vec<u8> {
    #[inline]
    fn write(&mut self, _label: &'static [u8], src: &[u8]) -> Result<(), WriteError> {
        self.extend_from_slice(src);
        Ok(())
    }

    #[inline]
    fn write_u8(&mut self, _label: &'static [u8], x: u8) -> Result<(), WriteError> {
        self.push(x);
        Ok(())
    }

    #[inline]
    fn remaining_capacity(&self) -> usize {
        usize::max_value()
    }
}

impl Writer for &mut [u8] {
    #[inline]
    fn write(&mut self, _label: &'static [u8], src: &[u8]) -> Result<(), WriteError> {
        let n = src.len();
        if n <= self.remaining_capacity() {
            let (a, b) = mem::replace(self, &mut []).split_at_mut(n);
            a.copy_from_slice(src);
            *self = b;
            Ok(())
        } else {
            Err(WriteError::InsufficientCapacity)
        }
    }

    #[inline]
    fn remaining_capacity(&self) -> usize {
        self.len()
    }
}

/// Returns the number of bytes a compact length prefix takes for `len`.
pub fn shortvec_encoded_length(len: usize) -> usize {
    match len {
        0..=0x7f => 1,
        0x80..=0x3fff => 2,
        _ => 3,
    }
}
