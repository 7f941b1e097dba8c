use super::{default_cache_capacity, CacheStats, CodeParameters, Codeword, PositionRoleTable};
use crate::error::Result;
use std::collections::HashMap;

/// Maps `k`-bit messages to `n`-bit codewords.
///
/// Results are memoized; the cache stops growing once it holds
/// `cache_capacity` entries, after which new messages are computed on every
/// call.
#[derive(Debug)]
pub struct HammingEncoder {
    params: CodeParameters,
    cache: HashMap<Vec<bool>, Codeword>,
    cache_capacity: usize,
    hits: u64,
    misses: u64,
}

impl HammingEncoder {
    /// Create an encoder with the default cache capacity for its code size.
    pub fn new(params: CodeParameters) -> Self {
        let capacity = default_cache_capacity(&params);
        Self::with_cache_capacity(params, capacity)
    }

    /// Create an encoder whose cache holds at most `cache_capacity` entries.
    pub fn with_cache_capacity(params: CodeParameters, cache_capacity: usize) -> Self {
        Self {
            params,
            cache: HashMap::new(),
            cache_capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Parameters this encoder was built for.
    pub fn params(&self) -> &CodeParameters {
        &self.params
    }

    /// Encode exactly `k` message bits into a codeword.
    ///
    /// # Errors
    /// `CodeError::LengthMismatch` if `message.len() != k`.
    pub fn encode(&mut self, message: &[bool]) -> Result<Codeword> {
        self.params.check_message_len(message.len())?;

        if let Some(codeword) = self.cache.get(message) {
            self.hits += 1;
            return Ok(codeword.clone());
        }

        self.misses += 1;
        let codeword = Codeword::from_bits(compute_codeword(&self.params, message));
        if self.cache.len() < self.cache_capacity {
            self.cache.insert(message.to_vec(), codeword.clone());
        }
        Ok(codeword)
    }

    /// Most entries the cache will hold.
    pub fn cache_capacity(&self) -> usize {
        self.cache_capacity
    }

    /// Cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.cache.len(),
        }
    }
}

/// Place data bits and fill in parity. `message` must be `k` bits long.
fn compute_codeword(params: &CodeParameters, message: &[bool]) -> Vec<bool> {
    let roles = params.roles();
    let mut codeword = vec![false; params.codeword_len()];

    for (&position, &bit) in roles.data_positions().iter().zip(message) {
        codeword[position - 1] = bit;
    }

    // Parity positions are still zero, so the fold covers data bits only.
    let parity = PositionRoleTable::position_fold(&codeword);
    for &position in roles.parity_positions() {
        codeword[position - 1] = parity & position != 0;
    }

    codeword
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::parse_bits;
    use crate::error::{CodeError, Error};
    use crate::hamming::{DEFAULT_CACHE_BITS, DEFAULT_CACHE_CAPACITY};

    fn encoder(order: u32) -> HammingEncoder {
        HammingEncoder::new(CodeParameters::new(order).unwrap())
    }

    #[test]
    fn test_order_three_codeword() {
        // data 1,0,1,1 at positions 3,5,6,7
        // p1 = d3^d5^d7 = 0, p2 = d3^d6^d7 = 1, p4 = d5^d6^d7 = 0
        let mut enc = encoder(3);
        let codeword = enc.encode(&parse_bits("1011").unwrap()).unwrap();
        assert_eq!(codeword.to_string(), "0110011");
    }

    #[test]
    fn test_zero_message() {
        let mut enc = encoder(4);
        let codeword = enc.encode(&[false; 11]).unwrap();
        assert_eq!(codeword.bits(), &[false; 15]);
    }

    #[test]
    fn test_order_two_is_repetition() {
        let mut enc = encoder(2);
        assert_eq!(enc.encode(&[true]).unwrap().to_string(), "111");
        assert_eq!(enc.encode(&[false]).unwrap().to_string(), "000");
    }

    #[test]
    fn test_parity_matches_coverage_sets() {
        let params = CodeParameters::new(5).unwrap();
        let mut enc = HammingEncoder::new(params.clone());
        let message: Vec<bool> = (0..params.message_len()).map(|i| i % 3 == 0).collect();
        let codeword = enc.encode(&message).unwrap();

        for m in 0..params.order() {
            let parity = params
                .roles()
                .coverage(m)
                .filter(|&p| p != 1 << m)
                .fold(false, |acc, p| acc ^ codeword[p - 1]);
            assert_eq!(codeword[(1 << m) - 1], parity, "parity bit {}", m);
        }
    }

    #[test]
    fn test_length_mismatch() {
        let mut enc = encoder(3);
        let result = enc.encode(&[true; 5]);
        assert!(matches!(
            result,
            Err(Error::Code(CodeError::LengthMismatch {
                expected: 4,
                actual: 5
            }))
        ));
    }

    #[test]
    fn test_memoization() {
        let mut enc = encoder(3);
        let message = parse_bits("1100").unwrap();

        let first = enc.encode(&message).unwrap();
        let second = enc.encode(&message).unwrap();
        assert_eq!(first, second);

        let stats = enc.cache_stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_cache_capacity_bound() {
        let params = CodeParameters::new(3).unwrap();
        let mut enc = HammingEncoder::with_cache_capacity(params, 2);

        for text in ["0001", "0010", "0100", "1000"] {
            enc.encode(&parse_bits(text).unwrap()).unwrap();
        }
        assert_eq!(enc.cache_stats().entries, 2);

        // uncached message still encodes correctly
        let codeword = enc.encode(&parse_bits("1000").unwrap()).unwrap();
        assert_eq!(codeword.to_string(), "1110000");
    }

    #[test]
    fn test_default_cache_bounded_by_bits() {
        let params = CodeParameters::new(16).unwrap();
        let n = params.codeword_len();
        let mut enc = HammingEncoder::new(params.clone());
        assert_eq!(enc.cache_capacity(), DEFAULT_CACHE_BITS / n);

        for i in 0..80 {
            let mut message = vec![false; params.message_len()];
            message[i] = true;
            enc.encode(&message).unwrap();
        }
        let entries = enc.cache_stats().entries;
        assert_eq!(entries, enc.cache_capacity());
        assert!(entries * n <= DEFAULT_CACHE_BITS);

        let small = HammingEncoder::new(CodeParameters::new(3).unwrap());
        assert_eq!(small.cache_capacity(), DEFAULT_CACHE_CAPACITY);
        let large = HammingEncoder::new(CodeParameters::new(20).unwrap());
        assert_eq!(large.cache_capacity(), 4);
    }
}
