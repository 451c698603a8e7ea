//! Representations of encoded bit streams.
//!
//! The textual representation stores each bit as an ASCII `'0'` or `'1'` character.
//! The packed representation ([`bit_vec::BitVec`]) stores 8 bits per byte,
//! beginning from the most significant bit of the first byte.

use bit_vec::BitVec;

use crate::{Code, HuffmanError, Result};

/// Destination of encoded bits.
pub trait BitSink {
    /// Appends a single `bit` to `self`.
    fn push_bit(&mut self, bit: bool);

    /// Appends all bits of `code` to `self`.
    #[inline] fn push_code(&mut self, code: Code) {
        for bit in code.bits() { self.push_bit(bit); }
    }

    /// Returns number of bits stored in `self`.
    fn bit_len(&self) -> usize;
}

impl BitSink for String {
    #[inline] fn push_bit(&mut self, bit: bool) {
        self.push(if bit { '1' } else { '0' });
    }

    #[inline] fn bit_len(&self) -> usize { self.len() }
}

impl BitSink for BitVec {
    #[inline] fn push_bit(&mut self, bit: bool) { self.push(bit); }

    #[inline] fn bit_len(&self) -> usize { self.len() }
}

/// Returns iterator over the bits of the textual stream `bits`,
/// which yields [`HuffmanError::InvalidBit`] for any character other than `'0'` and `'1'`.
pub fn text_bits(bits: &str) -> impl Iterator<Item = Result<bool>> + '_ {
    bits.chars().enumerate().map(|(position, c)| match c {
        '0' => Ok(false),
        '1' => Ok(true),
        found => Err(HuffmanError::InvalidBit { position, found }),
    })
}

/// Returns iterator over the first `bit_len` bits of the packed stream `bytes`.
pub fn packed_bits(bytes: &[u8], bit_len: usize) -> impl Iterator<Item = bool> + '_ {
    (0..bit_len).map(move |i| (bytes[i / 8] >> (7 - i % 8)) & 1 == 1)
}
