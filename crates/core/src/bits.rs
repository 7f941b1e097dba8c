//! Bit-string utilities.
//!
//! Messages, codewords and channel streams are sequences of `bool` bits.
//! This module converts them to and from the textual `"0110"` form used in
//! diagnostics, and packs them MSB-first into bytes for storage.
//!
//! # Padding Rules
//! - BitWriter: pads the final partial byte with trailing zeros
//! - BitReader: cannot tell padding from data (caller tracks the bit count)
//!
//! # Example
//! ```
//! use hamming_sim_core::bits::{format_bits, parse_bits, BitReader, BitWriter};
//!
//! let bits = parse_bits("10111").unwrap();
//! let mut writer = BitWriter::new();
//! writer.write_slice(&bits);
//! let bytes = writer.finish();
//! assert_eq!(bytes, vec![0b1011_1000]);
//!
//! let mut reader = BitReader::new(&bytes);
//! let back = reader.read_slice(5).unwrap();
//! assert_eq!(format_bits(&back), "10111");
//! ```

use crate::error::{BitIoError, Result};

/// Parse a string of `'0'`/`'1'` characters into bits.
///
/// # Errors
/// `BitIoError::InvalidDigit` on the first character that is not a binary digit.
pub fn parse_bits(text: &str) -> Result<Vec<bool>> {
    text.chars()
        .enumerate()
        .map(|(index, digit)| match digit {
            '0' => Ok(false),
            '1' => Ok(true),
            _ => Err(BitIoError::InvalidDigit { digit, index }.into()),
        })
        .collect()
}

/// Render bits as a string of `'0'`/`'1'` characters.
pub fn format_bits(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

/// Expand bytes into bits, MSB of each byte first.
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    let mut reader = BitReader::new(bytes);
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    while let Ok(bit) = reader.read_bit() {
        bits.push(bit);
    }
    bits
}

/// Pack bits into bytes MSB-first, zero-padding the final byte.
pub fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    let mut writer = BitWriter::with_capacity(bits.len());
    writer.write_slice(bits);
    writer.finish()
}

/// Number of positions at which two bit strings differ.
///
/// Only the overlapping prefix is compared; callers compare equal-length
/// sequences.
pub fn hamming_distance(a: &[bool], b: &[bool]) -> usize {
    a.iter().zip(b).filter(|(x, y)| x != y).count()
}

/// Writes bits MSB-first into a byte buffer.
///
/// # Invariants
/// - `bit_count` is always < 8
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
}

impl BitWriter {
    /// Create a new BitWriter with empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer sized for roughly `bits` bits of output.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    /// Append one bit.
    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.bit_buffer |= 0x80 >> self.bit_count;
        }
        self.bit_count += 1;

        if self.bit_count == 8 {
            self.bytes.push(self.bit_buffer);
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
    }

    /// Append every bit of `bits` in order.
    pub fn write_slice(&mut self, bits: &[bool]) {
        for &bit in bits {
            self.write_bit(bit);
        }
    }

    /// Finish writing and return the output bytes, padding the last byte.
    pub fn finish(mut self) -> Vec<u8> {
        if self.bit_count > 0 {
            self.bytes.push(self.bit_buffer);
        }
        self.bytes
    }
}

/// Reads bits MSB-first from a byte buffer.
///
/// # Invariants
/// - `bit_position` never exceeds `data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Current bit position (0 = MSB of first byte)
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    /// Create a new BitReader for the given data.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            bit_position: 0,
        }
    }

    /// Read a single bit.
    ///
    /// # Errors
    /// `BitIoError::UnexpectedEof` once the buffer is exhausted.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.is_empty() {
            return Err(BitIoError::UnexpectedEof.into());
        }

        let byte = self.data[self.bit_position / 8];
        let bit = byte & (0x80 >> (self.bit_position % 8)) != 0;
        self.bit_position += 1;
        Ok(bit)
    }

    /// Read exactly `count` bits.
    ///
    /// Nothing is consumed when fewer than `count` bits remain.
    pub fn read_slice(&mut self, count: usize) -> Result<Vec<bool>> {
        if count > self.bits_remaining() {
            return Err(BitIoError::UnexpectedEof.into());
        }
        (0..count).map(|_| self.read_bit()).collect()
    }

    /// Return the number of bits remaining in the buffer.
    pub fn bits_remaining(&self) -> usize {
        self.data.len() * 8 - self.bit_position
    }

    /// Check if we're at the end of the buffer.
    pub fn is_empty(&self) -> bool {
        self.bit_position >= self.data.len() * 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_parse_and_format() {
        let bits = parse_bits("1011001").unwrap();
        assert_eq!(bits, vec![true, false, true, true, false, false, true]);
        assert_eq!(format_bits(&bits), "1011001");
        assert_eq!(parse_bits("").unwrap(), Vec::<bool>::new());
    }

    #[test]
    fn test_parse_rejects_non_binary() {
        let result = parse_bits("10x1");
        assert!(matches!(
            result,
            Err(Error::BitIo(BitIoError::InvalidDigit { digit: 'x', index: 2 }))
        ));
    }

    #[test]
    fn test_padding() {
        let mut writer = BitWriter::new();
        writer.write_bit(true);
        assert_eq!(writer.finish(), vec![0b1000_0000]);
    }

    #[test]
    fn test_multi_byte() {
        let bits = parse_bits("1010101111110000").unwrap();
        assert_eq!(bits_to_bytes(&bits), vec![0b1010_1011, 0b1111_0000]);
        assert_eq!(bytes_to_bits(&[0b1010_1011, 0b1111_0000]), bits);
    }

    #[test]
    fn test_read_slice_in_steps() {
        let data = [0b1011_0010];
        let mut reader = BitReader::new(&data);
        assert_eq!(format_bits(&reader.read_slice(3).unwrap()), "101");
        assert_eq!(reader.bits_remaining(), 5);
        assert_eq!(format_bits(&reader.read_slice(5).unwrap()), "10010");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_past_end() {
        let data = [0xFF];
        let mut reader = BitReader::new(&data);
        assert!(reader.read_slice(9).is_err());
        // failed read consumes nothing
        assert_eq!(reader.bits_remaining(), 8);
        assert_eq!(reader.read_slice(8).unwrap(), vec![true; 8]);
        assert!(matches!(
            reader.read_bit(),
            Err(Error::BitIo(BitIoError::UnexpectedEof))
        ));
    }

    #[test]
    fn test_hamming_distance() {
        let a = parse_bits("1100").unwrap();
        let b = parse_bits("1010").unwrap();
        assert_eq!(hamming_distance(&a, &b), 2);
        assert_eq!(hamming_distance(&a, &a), 0);
    }
}
