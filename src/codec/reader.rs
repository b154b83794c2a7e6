use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// Forward-only little-endian cursor over a CRUSH map buffer
pub struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::UnexpectedEndOfStream {
                offset: self.pos,
                need: n,
                have: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    /// Read exactly `n` single-byte characters. Each byte becomes the
    /// code point of the same value, so any byte sequence is accepted.
    pub fn read_chars(&mut self, n: usize) -> Result<String> {
        let bytes = self.read_bytes(n)?;
        Ok(bytes.iter().map(|&b| char::from(b)).collect())
    }

    /// Capacity hint for a stream-declared element count, clamped so a
    /// corrupt count cannot force a huge allocation.
    pub fn capacity_hint(&self, count: u32, elem_size: usize) -> usize {
        (count as usize).min(self.remaining() / elem_size.max(1))
    }
}
