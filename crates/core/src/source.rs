//! Message sources feeding the encoder.
//!
//! A source hands out messages of an exact bit length on request. The
//! random source never runs dry; the byte source ends when its buffer is
//! consumed, zero-padding the final message.

use crate::bits::BitReader;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Supplier of fixed-length messages.
pub trait MessageSource {
    /// Next message of exactly `len` bits, or `None` once exhausted.
    fn next_message(&mut self, len: usize) -> Option<Vec<bool>>;
}

/// Uniformly random bits (each bit 1 with probability 0.5).
#[derive(Debug, Clone)]
pub struct RandomSource<R = ChaCha8Rng> {
    rng: R,
}

impl RandomSource<ChaCha8Rng> {
    /// Create a source seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource<R> {
    /// Create a source drawing from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> MessageSource for RandomSource<R> {
    fn next_message(&mut self, len: usize) -> Option<Vec<bool>> {
        Some((0..len).map(|_| self.rng.gen_bool(0.5)).collect())
    }
}

/// Messages cut from a byte buffer, MSB of each byte first.
#[derive(Debug, Clone)]
pub struct ByteSource<'a> {
    reader: BitReader<'a>,
    padding_bits: usize,
}

impl<'a> ByteSource<'a> {
    /// Create a source over `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: BitReader::new(data),
            padding_bits: 0,
        }
    }

    /// Data bits not yet handed out.
    pub fn bits_remaining(&self) -> usize {
        self.reader.bits_remaining()
    }

    /// Zero bits appended to complete the final message.
    pub fn padding_bits(&self) -> usize {
        self.padding_bits
    }
}

impl MessageSource for ByteSource<'_> {
    fn next_message(&mut self, len: usize) -> Option<Vec<bool>> {
        let available = self.reader.bits_remaining();
        if available == 0 || len == 0 {
            return None;
        }

        let take = available.min(len);
        let mut message = self.reader.read_slice(take).ok()?;
        if take < len {
            self.padding_bits += len - take;
            message.resize(len, false);
        }
        Some(message)
    }
}

impl<S: MessageSource + ?Sized> MessageSource for &mut S {
    fn next_message(&mut self, len: usize) -> Option<Vec<bool>> {
        (**self).next_message(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::format_bits;

    #[test]
    fn test_random_source_lengths() {
        let mut source = RandomSource::new(1);
        for len in [0, 1, 4, 11, 247] {
            assert_eq!(source.next_message(len).unwrap().len(), len);
        }
    }

    #[test]
    fn test_random_source_determinism() {
        let mut a = RandomSource::new(77);
        let mut b = RandomSource::new(77);
        let mut c = RandomSource::new(78);

        let ma = a.next_message(256).unwrap();
        assert_eq!(ma, b.next_message(256).unwrap());
        assert_ne!(ma, c.next_message(256).unwrap());
    }

    #[test]
    fn test_random_source_balance() {
        let mut source = RandomSource::new(5);
        let bits = source.next_message(100_000).unwrap();
        let ones = bits.iter().filter(|&&b| b).count() as f64 / bits.len() as f64;
        assert!((ones - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_byte_source_chunks_and_pads() {
        let data = [0b1011_0011, 0b1100_0000];
        let mut source = ByteSource::new(&data);

        assert_eq!(format_bits(&source.next_message(4).unwrap()), "1011");
        assert_eq!(format_bits(&source.next_message(4).unwrap()), "0011");
        assert_eq!(format_bits(&source.next_message(11).unwrap()), "11000000000");
        assert_eq!(source.padding_bits(), 3);
        assert_eq!(source.bits_remaining(), 0);
        assert!(source.next_message(4).is_none());
    }

    #[test]
    fn test_byte_source_empty() {
        let mut source = ByteSource::new(&[]);
        assert!(source.next_message(4).is_none());
    }
}
