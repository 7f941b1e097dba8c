//! Two-state burst error channel.
//!
//! A Markov chain alternates between a `Good` state, where bits pass
//! unchanged, and a `Bad` state, where each bit is flipped with probability
//! `error_probability`. Long stays in `Bad` produce bursts of errors.
//!
//! # Simulated Effects
//!
//! For every bit the channel:
//! 1. Transitions: `Good -> Good` with `good_to_good`, `Bad -> Bad` with
//!    `bad_to_bad`, otherwise switches state
//! 2. Flips the bit with the new state's flip probability
//! 3. Keeps the new state for the next bit
//!
//! # Determinism
//!
//! The default random source is a ChaCha8 RNG seeded from the config. Any
//! other `Rng` can be injected with [`BurstErrorChannel::with_rng`]. Given
//! the same seed and input, output is bit-identical.

use crate::error::{ChannelError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;
use tracing::{debug, warn};

/// Anything that carries bits one at a time and may corrupt them.
pub trait BitChannel {
    /// Transmit one bit, returning what the receiver sees.
    fn step(&mut self, bit: bool) -> bool;

    /// Transmit every bit of `bits` in order.
    fn transmit(&mut self, bits: &[bool]) -> Vec<bool> {
        bits.iter().map(|&bit| self.step(bit)).collect()
    }

    /// Counters accumulated since construction.
    fn stats(&self) -> ChannelStats;
}

/// State of the two-state chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Good,
    Bad,
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelState::Good => f.write_str("good"),
            ChannelState::Bad => f.write_str("bad"),
        }
    }
}

/// Configuration for the burst channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstChannelConfig {
    /// P(Good -> Good)
    pub good_to_good: f64,

    /// P(Bad -> Bad)
    pub bad_to_bad: f64,

    /// Flip probability while Bad
    pub error_probability: f64,

    /// Flip probability while Good (normally 0)
    pub good_error_probability: f64,

    /// Random seed for determinism
    pub seed: u64,
}

impl BurstChannelConfig {
    /// A channel that never leaves `Good` and never flips.
    pub fn perfect(seed: u64) -> Self {
        Self {
            good_to_good: 1.0,
            bad_to_bad: 0.0,
            error_probability: 0.0,
            good_error_probability: 0.0,
            seed,
        }
    }

    /// A moderately bursty channel.
    pub fn default_with_seed(seed: u64) -> Self {
        Self::from_transitions(0.6, 0.2, 0.3, seed)
    }

    /// Build from the switching probabilities instead of the staying ones.
    pub fn from_transitions(
        error_probability: f64,
        good_to_bad: f64,
        bad_to_good: f64,
        seed: u64,
    ) -> Self {
        Self {
            good_to_good: 1.0 - good_to_bad,
            bad_to_bad: 1.0 - bad_to_good,
            error_probability,
            good_error_probability: 0.0,
            seed,
        }
    }

    /// Set the flip probability used while Good.
    pub fn with_good_error_probability(mut self, probability: f64) -> Self {
        self.good_error_probability = probability;
        self
    }

    /// P(Good -> Bad)
    pub fn good_to_bad(&self) -> f64 {
        1.0 - self.good_to_good
    }

    /// P(Bad -> Good)
    pub fn bad_to_good(&self) -> f64 {
        1.0 - self.bad_to_bad
    }

    /// Long-run fraction of bits transmitted in the Bad state.
    ///
    /// A chain that can never switch stays in its initial `Good` state.
    pub fn stationary_bad_fraction(&self) -> f64 {
        let total = self.good_to_bad() + self.bad_to_good();
        if total == 0.0 {
            0.0
        } else {
            self.good_to_bad() / total
        }
    }

    /// Long-run fraction of bits flipped.
    pub fn expected_flip_rate(&self) -> f64 {
        let bad = self.stationary_bad_fraction();
        bad * self.error_probability + (1.0 - bad) * self.good_error_probability
    }

    /// Check every probability lies in `[0, 1]`.
    ///
    /// # Errors
    /// `ChannelError::InvalidProbability` naming the first bad parameter.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("good_to_good", self.good_to_good),
            ("bad_to_bad", self.bad_to_bad),
            ("error_probability", self.error_probability),
            ("good_error_probability", self.good_error_probability),
        ];

        for (name, value) in fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ChannelError::InvalidProbability { name, value }.into());
            }
        }
        Ok(())
    }
}

/// Two-state burst error channel.
///
/// # Thread Safety
/// Not thread-safe; the state belongs to one instance.
#[derive(Debug)]
pub struct BurstErrorChannel<R = ChaCha8Rng> {
    config: BurstChannelConfig,
    rng: R,
    state: ChannelState,

    // Statistics
    bits_sent: u64,
    bits_flipped: u64,
    bits_in_bad: u64,
}

impl BurstErrorChannel<ChaCha8Rng> {
    /// Create a channel seeded from `config.seed`.
    ///
    /// # Errors
    /// `ChannelError::InvalidProbability` if the config is invalid.
    pub fn new(config: BurstChannelConfig) -> Result<Self> {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(config.seed))
    }
}

impl<R: Rng> BurstErrorChannel<R> {
    /// Create a channel drawing randomness from `rng`.
    ///
    /// `config.seed` is ignored.
    pub fn with_rng(config: BurstChannelConfig, rng: R) -> Result<Self> {
        config.validate()?;

        debug!(
            good_to_good = config.good_to_good,
            bad_to_bad = config.bad_to_bad,
            error_probability = config.error_probability,
            "burst channel created"
        );
        if config.bad_to_bad == 1.0 && config.good_to_good < 1.0 {
            warn!("bad state is absorbing: once entered the channel never recovers");
        }

        Ok(Self {
            config,
            rng,
            state: ChannelState::Good,
            bits_sent: 0,
            bits_flipped: 0,
            bits_in_bad: 0,
        })
    }

    /// Current state (the state the last bit was sent in).
    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// Channel configuration.
    pub fn config(&self) -> &BurstChannelConfig {
        &self.config
    }

    /// Advance the chain by one bit.
    fn transition(&mut self) {
        let roll: f64 = self.rng.gen();
        self.state = match self.state {
            ChannelState::Good if roll < self.config.good_to_good => ChannelState::Good,
            ChannelState::Good => ChannelState::Bad,
            ChannelState::Bad if roll < self.config.bad_to_bad => ChannelState::Bad,
            ChannelState::Bad => ChannelState::Good,
        };
    }

    /// Decide whether the current bit is flipped.
    fn flip(&mut self) -> bool {
        let probability = match self.state {
            ChannelState::Good => self.config.good_error_probability,
            ChannelState::Bad => self.config.error_probability,
        };

        if probability == 0.0 {
            return false;
        }
        let roll: f64 = self.rng.gen();
        roll < probability
    }
}

impl<R: Rng> BitChannel for BurstErrorChannel<R> {
    fn step(&mut self, bit: bool) -> bool {
        self.bits_sent += 1;
        self.transition();

        if self.state == ChannelState::Bad {
            self.bits_in_bad += 1;
        }

        if self.flip() {
            self.bits_flipped += 1;
            !bit
        } else {
            bit
        }
    }

    fn stats(&self) -> ChannelStats {
        ChannelStats {
            bits_sent: self.bits_sent,
            bits_flipped: self.bits_flipped,
            bits_in_bad: self.bits_in_bad,
        }
    }
}

/// Statistics about channel behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelStats {
    /// Bits transmitted
    pub bits_sent: u64,

    /// Bits flipped
    pub bits_flipped: u64,

    /// Bits transmitted while in the Bad state
    pub bits_in_bad: u64,
}

impl ChannelStats {
    /// Observed flip rate.
    pub fn flip_rate(&self) -> f64 {
        if self.bits_sent == 0 {
            0.0
        } else {
            self.bits_flipped as f64 / self.bits_sent as f64
        }
    }

    /// Observed fraction of bits sent while Bad.
    pub fn bad_fraction(&self) -> f64 {
        if self.bits_sent == 0 {
            0.0
        } else {
            self.bits_in_bad as f64 / self.bits_sent as f64
        }
    }
}
