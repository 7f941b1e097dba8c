//! Metrics collection for simulation runs and transfers.
//!
//! This module tracks:
//! - Bit accuracy (bits transferred vs. bits wrong after decoding)
//! - Codeword outcomes (clean, corrected, mis-corrected, undetected)
//! - Channel behavior (flips and burst lengths)
//! - Timing information
//!
//! # Thread Safety
//!
//! `Metrics` is NOT thread-safe. Runs are single-threaded; merge per-run
//! metrics with [`Metrics::merge`] if needed.

use crate::result::CodewordOutcome;
use std::time::{Duration, Instant};

/// Counters for one simulation run or transfer.
#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Blocks ===
    /// Interleaving blocks processed
    pub blocks: u64,

    // === Codewords ===
    /// Codewords delivered without any detected error
    pub codewords_clean: u64,

    /// Codewords with a single error that was corrected
    pub codewords_corrected: u64,

    /// Codewords whose "correction" produced a wrong message
    pub codewords_miscorrected: u64,

    /// Codewords corrupted into another valid codeword
    pub codewords_undetected: u64,

    // === Channel ===
    /// Bits pushed through the channel
    pub channel_bits: u64,

    /// Bits flipped by the channel
    pub channel_flips: u64,

    /// Runs of consecutive flipped bits
    pub bursts: u64,

    /// Longest run of consecutive flipped bits
    pub longest_burst: u64,

    // === Accuracy ===
    /// Message bits compared after decoding
    pub bits_transferred: u64,

    /// Message bits that differ from the original after decoding
    pub bit_errors: u64,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            blocks: 0,
            codewords_clean: 0,
            codewords_corrected: 0,
            codewords_miscorrected: 0,
            codewords_undetected: 0,
            channel_bits: 0,
            channel_flips: 0,
            bursts: 0,
            longest_burst: 0,
            bits_transferred: 0,
            bit_errors: 0,
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Count one decoded codeword.
    pub fn record_codeword(&mut self, outcome: CodewordOutcome) {
        match outcome {
            CodewordOutcome::Clean => self.codewords_clean += 1,
            CodewordOutcome::Corrected => self.codewords_corrected += 1,
            CodewordOutcome::Miscorrected => self.codewords_miscorrected += 1,
            CodewordOutcome::Undetected => self.codewords_undetected += 1,
        }
    }

    /// Count a stretch of channel traffic.
    pub fn record_channel(&mut self, sent: &[bool], received: &[bool], bursts: &mut BurstTracker) {
        for (a, b) in sent.iter().zip(received) {
            let flipped = a != b;
            if flipped {
                self.channel_flips += 1;
            }
            bursts.track(flipped);
        }
        self.channel_bits += sent.len() as u64;
        self.bursts = bursts.bursts();
        self.longest_burst = bursts.longest();
    }

    /// Count compared message bits.
    pub fn record_accuracy(&mut self, bits: u64, errors: u64) {
        self.bits_transferred += bits;
        self.bit_errors += errors;
    }

    /// Total codewords decoded.
    pub fn codewords(&self) -> u64 {
        self.codewords_clean
            + self.codewords_corrected
            + self.codewords_miscorrected
            + self.codewords_undetected
    }

    /// Codewords whose message arrived wrong.
    pub fn codewords_failed(&self) -> u64 {
        self.codewords_miscorrected + self.codewords_undetected
    }

    /// Percentage of message bits delivered correctly.
    ///
    /// Returns 100.0 when nothing was transferred.
    pub fn success_rate_percent(&self) -> f64 {
        if self.bits_transferred == 0 {
            100.0
        } else {
            (self.bits_transferred - self.bit_errors) as f64 / self.bits_transferred as f64 * 100.0
        }
    }

    /// Residual bit error rate after decoding.
    pub fn residual_error_rate(&self) -> f64 {
        if self.bits_transferred == 0 {
            0.0
        } else {
            self.bit_errors as f64 / self.bits_transferred as f64
        }
    }

    /// Raw channel flip rate.
    pub fn channel_flip_rate(&self) -> f64 {
        if self.channel_bits == 0 {
            0.0
        } else {
            self.channel_flips as f64 / self.channel_bits as f64
        }
    }

    /// Mean length of a burst of flips.
    pub fn mean_burst_len(&self) -> f64 {
        if self.bursts == 0 {
            0.0
        } else {
            self.channel_flips as f64 / self.bursts as f64
        }
    }

    /// Fold another run's counters into this one.
    pub fn merge(&mut self, other: &Metrics) {
        self.blocks += other.blocks;
        self.codewords_clean += other.codewords_clean;
        self.codewords_corrected += other.codewords_corrected;
        self.codewords_miscorrected += other.codewords_miscorrected;
        self.codewords_undetected += other.codewords_undetected;
        self.channel_bits += other.channel_bits;
        self.channel_flips += other.channel_flips;
        self.bursts += other.bursts;
        self.longest_burst = self.longest_burst.max(other.longest_burst);
        self.bits_transferred += other.bits_transferred;
        self.bit_errors += other.bit_errors;
    }

    /// Export metrics as a simple `key=value` text format.
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             blocks={}\n\
             codewords={}\n\
             codewords_corrected={}\n\
             codewords_miscorrected={}\n\
             codewords_undetected={}\n\
             channel_bits={}\n\
             channel_flips={}\n\
             channel_flip_rate={:.6}\n\
             longest_burst={}\n\
             bits_transferred={}\n\
             bit_errors={}\n\
             success_rate_percent={:.4}\n",
            self.duration().as_millis(),
            self.blocks,
            self.codewords(),
            self.codewords_corrected,
            self.codewords_miscorrected,
            self.codewords_undetected,
            self.channel_bits,
            self.channel_flips,
            self.channel_flip_rate(),
            self.longest_burst,
            self.bits_transferred,
            self.bit_errors,
            self.success_rate_percent(),
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper for measuring error bursts.
///
/// Fed one flag per transmitted bit (flipped or not), it counts runs of
/// consecutive flips and remembers the longest.
#[derive(Debug, Clone, Default)]
pub struct BurstTracker {
    current: u64,
    longest: u64,
    bursts: u64,
}

impl BurstTracker {
    /// Create a new burst tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one bit and return the length of the burst it extends (0 if
    /// the bit was not flipped).
    pub fn track(&mut self, flipped: bool) -> u64 {
        if !flipped {
            self.current = 0;
            return 0;
        }

        if self.current == 0 {
            self.bursts += 1;
        }
        self.current += 1;
        self.longest = self.longest.max(self.current);
        self.current
    }

    /// Number of bursts seen.
    pub fn bursts(&self) -> u64 {
        self.bursts
    }

    /// Longest burst seen.
    pub fn longest(&self) -> u64 {
        self.longest
    }
}
