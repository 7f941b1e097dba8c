//! hamming-sim-core: Hamming error correction over a bursty channel
//!
//! This library provides the core components of a simulator that:
//! - Encodes messages with a single-error-correcting Hamming code
//! - Interleaves codewords so channel bursts are spread across them
//! - Corrupts bits with a two-state (Good/Bad) burst error channel
//! - De-interleaves, corrects and measures how many bits survived
//!
//! # Architecture
//!
//! The system is designed around clear module boundaries:
//! - `bits`: Bit strings and MSB-first bit packing
//! - `hamming`: Code parameters, encoder and decoder
//! - `interleaver`: Block interleaving with partial-block support
//! - `channel`: Burst error channel with seeded randomness
//! - `source`: Message sources (random or byte buffer)
//! - `simulator`: Per-block transmission loop and accuracy statistics
//! - `container`: Self-describing encoded stream format
//! - `transfer`: Whole-buffer encode/channel/decode
//! - `metrics`: Observable system behavior
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured and recoverable
//! - **Deterministic**: Seeded randomness makes runs reproducible
//! - **No output**: The library logs through `tracing` and never prints

pub mod bits;
pub mod channel;
pub mod container;
pub mod error;
pub mod hamming;
pub mod interleaver;
pub mod metrics;
pub mod result;
pub mod simulator;
pub mod source;
pub mod transfer;

// Re-export commonly used types
pub use error::{Error, Result};
