// In-memory bit stream.
//
// Bits fill each byte from the least-significant bit up. Multi-bit values
// are written least-significant bit first, so a byte-aligned `u32` lands in
// little-endian byte order. Aligned byte writes zero-pad the current byte.

use super::{BitRead, BitWrite};
use crate::error::{DiffError, Result};

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Growable bit stream writer.
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    data: Vec<u8>,
    bit_len: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            data: Vec::with_capacity(bytes),
            bit_len: 0,
        }
    }

    /// Number of bits written so far.
    #[inline]
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Written bytes; the last byte may be partially used.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Pad with zero bits up to the next byte boundary.
    #[inline]
    pub fn align(&mut self) {
        self.bit_len = self.data.len() * 8;
    }

    fn write_bits(&mut self, value: u32, count: u32) {
        for i in 0..count {
            self.write_bit((value >> i) & 1 != 0);
        }
    }
}

impl BitWrite for BitWriter {
    #[inline]
    fn write_bit(&mut self, bit: bool) {
        let shift = self.bit_len % 8;
        if shift == 0 {
            self.data.push(0);
        }
        if bit {
            // `data` is non-empty: a byte was pushed above or earlier.
            let last = self.data.len() - 1;
            self.data[last] |= 1 << shift;
        }
        self.bit_len += 1;
    }

    fn write_u32(&mut self, value: u32) {
        self.write_bits(value, 32);
    }

    fn write_aligned_bytes(&mut self, bytes: &[u8]) {
        self.align();
        self.data.extend_from_slice(bytes);
        self.bit_len = self.data.len() * 8;
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Bit stream reader over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    bit_len: usize,
}

impl<'a> BitReader<'a> {
    /// Read every bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_bit_len(data, data.len() * 8)
    }

    /// Read only the first `bit_len` bits of `data`.
    pub fn with_bit_len(data: &'a [u8], bit_len: usize) -> Self {
        Self {
            data,
            pos: 0,
            bit_len: bit_len.min(data.len() * 8),
        }
    }

    /// Bits consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining_bits(&self) -> usize {
        self.bit_len.saturating_sub(self.pos)
    }

    /// Skip to the next byte boundary.
    #[inline]
    pub fn align(&mut self) {
        self.pos = self.pos.div_ceil(8) * 8;
    }

    fn ensure_bits(&self, needed: usize) -> Result<()> {
        let available = self.remaining_bits();
        if needed > available {
            return Err(DiffError::Truncated { needed, available });
        }
        Ok(())
    }

    fn read_bit_unchecked(&mut self) -> bool {
        let bit = (self.data[self.pos / 8] >> (self.pos % 8)) & 1 != 0;
        self.pos += 1;
        bit
    }
}

impl BitRead for BitReader<'_> {
    fn read_bit(&mut self) -> Result<bool> {
        self.ensure_bits(1)?;
        Ok(self.read_bit_unchecked())
    }

    fn read_u32(&mut self) -> Result<u32> {
        self.ensure_bits(32)?;
        let mut value = 0u32;
        for i in 0..32 {
            value |= u32::from(self.read_bit_unchecked()) << i;
        }
        Ok(value)
    }

    fn read_aligned_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        let start = self.pos.div_ceil(8) * 8;
        let available = self.bit_len.saturating_sub(start) / 8;
        if buf.len() > available {
            return Err(DiffError::Truncated {
                needed: buf.len(),
                available,
            });
        }
        let byte = start / 8;
        buf.copy_from_slice(&self.data[byte..byte + buf.len()]);
        self.pos = start + buf.len() * 8;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
