use super::{
    default_cache_capacity, CacheStats, CodeParameters, Codeword, Message, PositionRoleTable,
};
use crate::error::Result;
use std::collections::HashMap;

/// Outcome of decoding one received word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Data bits read from the corrected word
    pub message: Message,

    /// The received word after correction
    pub codeword: Codeword,

    /// 1-indexed position that was flipped, if the syndrome was non-zero
    pub corrected_position: Option<usize>,

    /// Whether the syndrome was non-zero
    pub error_detected: bool,
}

/// Maps possibly corrupted `n`-bit words back to `k`-bit messages.
///
/// At most one flipped bit per word is corrected. With two or more flips the
/// syndrome may name the wrong position and the returned message is silently
/// wrong; the decoder cannot tell this apart from a genuine correction.
#[derive(Debug)]
pub struct HammingDecoder {
    params: CodeParameters,
    cache: HashMap<Vec<bool>, Decoded>,
    cache_capacity: usize,
    hits: u64,
    misses: u64,
}

impl HammingDecoder {
    /// Create a decoder with the default cache capacity for its code size.
    pub fn new(params: CodeParameters) -> Self {
        let capacity = default_cache_capacity(&params);
        Self::with_cache_capacity(params, capacity)
    }

    /// Create a decoder whose cache holds at most `cache_capacity` entries.
    pub fn with_cache_capacity(params: CodeParameters, cache_capacity: usize) -> Self {
        Self {
            params,
            cache: HashMap::new(),
            cache_capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Parameters this decoder was built for.
    pub fn params(&self) -> &CodeParameters {
        &self.params
    }

    /// Syndrome of a received word: 0 if every parity check holds, otherwise
    /// the 1-indexed position a single flip would have to be at.
    ///
    /// # Errors
    /// `CodeError::LengthMismatch` if `received.len() != n`.
    pub fn syndrome(&self, received: &[bool]) -> Result<usize> {
        self.params.check_codeword_len(received.len())?;
        Ok(PositionRoleTable::position_fold(received))
    }

    /// Correct at most one bit of `received` and extract the message.
    ///
    /// # Errors
    /// `CodeError::LengthMismatch` if `received.len() != n`.
    pub fn decode(&mut self, received: &[bool]) -> Result<Decoded> {
        self.params.check_codeword_len(received.len())?;

        if let Some(decoded) = self.cache.get(received) {
            self.hits += 1;
            return Ok(decoded.clone());
        }

        self.misses += 1;
        let decoded = correct(&self.params, received);
        if self.cache.len() < self.cache_capacity {
            self.cache.insert(received.to_vec(), decoded.clone());
        }
        Ok(decoded)
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

fn correct(params: &CodeParameters, received: &[bool]) -> Decoded {
    let mut word = received.to_vec();

    // s <= n always: it is an XOR of positions below 2^r.
    let syndrome = PositionRoleTable::position_fold(&word);
    let corrected_position = (syndrome != 0).then(|| {
        word[syndrome - 1] = !word[syndrome - 1];
        syndrome
    });

    let message = params
        .roles()
        .data_positions()
        .iter()
        .map(|&position| word[position - 1])
        .collect();

    Decoded {
        message: Message::from_bits(message),
        codeword: Codeword::from_bits(word),
        corrected_position,
        error_detected: corrected_position.is_some(),
    }
}
