//! Single-error-correcting Hamming codes of arbitrary order.
//!
//! - `params`: code geometry and the shared position role table
//! - `encoder`: message -> codeword, memoized per encoder
//! - `decoder`: received word -> corrected message, memoized per decoder
//!
//! Encoders and decoders own their caches. Two instances built for different
//! orders never share state.
//!
//! # Example
//! ```
//! use hamming_sim_core::bits::parse_bits;
//! use hamming_sim_core::hamming::{CodeParameters, HammingDecoder, HammingEncoder};
//!
//! let params = CodeParameters::new(3).unwrap();
//! let mut encoder = HammingEncoder::new(params.clone());
//! let mut decoder = HammingDecoder::new(params);
//!
//! let codeword = encoder.encode(&parse_bits("1011").unwrap()).unwrap();
//! assert_eq!(codeword.to_string(), "0110011");
//!
//! let mut received = codeword.to_vec();
//! received[4] = !received[4];
//! let decoded = decoder.decode(&received).unwrap();
//! assert_eq!(decoded.message.to_string(), "1011");
//! assert_eq!(decoded.corrected_position, Some(5));
//! ```

mod decoder;
mod encoder;
mod params;

pub use decoder::{Decoded, HammingDecoder};
pub use encoder::HammingEncoder;
pub use params::{CodeParameters, PositionRole, PositionRoleTable, MAX_ORDER, MIN_ORDER};

use crate::bits::format_bits;
use std::fmt;
use std::ops::Deref;

/// Default number of entries an encoder or decoder cache may hold.
pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

/// Codeword bits a default-sized cache may hold across all its entries.
pub const DEFAULT_CACHE_BITS: usize = 1 << 22;

/// Entry limit for a default cache at this code size.
///
/// The entry count is capped by [`DEFAULT_CACHE_CAPACITY`] and by
/// [`DEFAULT_CACHE_BITS`] divided by the codeword length, so large orders
/// keep only a handful of entries.
pub fn default_cache_capacity(params: &CodeParameters) -> usize {
    (DEFAULT_CACHE_BITS / params.codeword_len()).min(DEFAULT_CACHE_CAPACITY)
}

macro_rules! bit_word {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(Vec<bool>);

        impl $name {
            pub(crate) fn from_bits(bits: Vec<bool>) -> Self {
                Self(bits)
            }

            /// The bits of this word.
            pub fn bits(&self) -> &[bool] {
                &self.0
            }
        }

        impl Deref for $name {
            type Target = [bool];

            fn deref(&self) -> &[bool] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&format_bits(&self.0))
            }
        }
    };
}

bit_word! {
    /// A `k`-bit message as produced by a decoder.
    Message
}

bit_word! {
    /// An `n`-bit codeword as produced by an encoder or after correction.
    Codeword
}

/// Hit/miss counters of a memoization cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,

    /// Lookups that had to be computed
    pub misses: u64,

    /// Entries currently stored
    pub entries: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
