//! Bounds-checked sequential reader over an immutable byte buffer.
//!
//! Every decoder in the crate reads through [`ByteCursor`]. A read that would
//! run past the end of the buffer fails with [`FormatError::Truncated`] and
//! leaves the cursor where it was.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{FormatError, FormatResult};
use crate::string::BinString;

/// Little-endian cursor over a fully buffered file.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current byte offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true once every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Consume and return the next `len` bytes.
    pub fn take(&mut self, len: usize) -> FormatResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(FormatError::Truncated {
                offset: self.pos,
                needed: len,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Consume everything that is left.
    pub fn take_rest(&mut self) -> &'a [u8] {
        let rest = &self.data[self.pos..];
        self.pos = self.data.len();
        rest
    }

    pub fn read_u8(&mut self) -> FormatResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u32(&mut self) -> FormatResult<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_i32(&mut self) -> FormatResult<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn read_f32(&mut self) -> FormatResult<f32> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    /// Read a fixed number of consecutive `f32` values.
    pub fn read_f32_array<const N: usize>(&mut self) -> FormatResult<[f32; N]> {
        let bytes = self.take(N * 4)?;
        let mut out = [0.0f32; N];
        LittleEndian::read_f32_into(bytes, &mut out);
        Ok(out)
    }

    /// Read a fixed number of consecutive `u32` values.
    pub fn read_u32_array<const N: usize>(&mut self) -> FormatResult<[u32; N]> {
        let bytes = self.take(N * 4)?;
        let mut out = [0u32; N];
        LittleEndian::read_u32_into(bytes, &mut out);
        Ok(out)
    }

    /// Read a fixed-size raw byte block.
    pub fn read_byte_array<const N: usize>(&mut self) -> FormatResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Read a 32-bit element count.
    pub fn read_count(&mut self) -> FormatResult<usize> {
        Ok(self.read_u32()? as usize)
    }

    /// Read a length-prefixed string. Embedded NUL bytes are kept verbatim.
    pub fn read_string(&mut self) -> FormatResult<BinString> {
        let len = self.read_count()?;
        Ok(BinString::new(self.take(len)?.to_vec()))
    }

    /// Read a `u32` count followed by that many `u32` values.
    pub fn read_counted_u32s(&mut self) -> FormatResult<Vec<u32>> {
        let count = self.read_count()?;
        let bytes = self.take_elements(count, 4)?;
        let mut out = vec![0u32; count];
        LittleEndian::read_u32_into(bytes, &mut out);
        Ok(out)
    }

    /// Read a `u32` count followed by that many `f32` values.
    pub fn read_counted_f32s(&mut self) -> FormatResult<Vec<f32>> {
        let count = self.read_count()?;
        let bytes = self.take_elements(count, 4)?;
        let mut out = vec![0.0f32; count];
        LittleEndian::read_f32_into(bytes, &mut out);
        Ok(out)
    }

    /// Take `count * size` bytes, reporting overflow of the product as truncation.
    fn take_elements(&mut self, count: usize, size: usize) -> FormatResult<&'a [u8]> {
        let len = count.checked_mul(size).ok_or(FormatError::Truncated {
            offset: self.pos,
            needed: usize::MAX,
            available: self.remaining(),
        })?;
        self.take(len)
    }
}
