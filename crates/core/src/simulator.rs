//! End-to-end transmission loop.
//!
//! One iteration moves one interleaving block through the whole pipeline:
//!
//! ```text
//! source -> encode (x depth) -> interleave -> channel -> deinterleave
//!        -> decode (x depth) -> compare with the original messages
//! ```
//!
//! The simulator accumulates [`Metrics`] across iterations and hands a
//! per-iteration [`IterationReport`] to an optional observer. It never prints.
//!
//! # Determinism
//!
//! The message source and the channel are the only sources of randomness and
//! both are seeded. Same seeds and parameters give identical summaries.

use crate::bits::hamming_distance;
use crate::channel::{BitChannel, BurstChannelConfig, BurstErrorChannel};
use crate::error::Result;
use crate::hamming::{CodeParameters, HammingDecoder, HammingEncoder};
use crate::interleaver::Interleaver;
use crate::metrics::{BurstTracker, Metrics};
use crate::result::{CodewordOutcome, DecodingResult, EncodingResult};
use crate::source::{MessageSource, RandomSource};
use tracing::{debug, trace};

/// Parameters of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Hamming order `r`
    pub order: u32,

    /// Codewords per interleaving block
    pub depth: usize,

    /// Channel behavior (carries its own seed)
    pub channel: BurstChannelConfig,

    /// Number of blocks to transmit
    pub iterations: u64,

    /// Seed for the random message source
    pub source_seed: u64,
}

/// Headline numbers of a finished run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSummary {
    /// Blocks actually transmitted
    pub iterations: u64,

    /// Message bits compared
    pub bits_transferred: u64,

    /// Message bits that arrived wrong
    pub bit_errors: u64,

    /// `(bits_transferred - bit_errors) / bits_transferred * 100`
    pub success_rate_percent: f64,
}

impl SimulationSummary {
    fn from_metrics(iterations: u64, metrics: &Metrics) -> Self {
        Self {
            iterations,
            bits_transferred: metrics.bits_transferred,
            bit_errors: metrics.bit_errors,
            success_rate_percent: metrics.success_rate_percent(),
        }
    }
}

/// Everything that happened to one block.
#[derive(Debug, Clone)]
pub struct IterationReport {
    /// Zero-based iteration number
    pub index: u64,

    /// Sending side
    pub encoding: EncodingResult,

    /// Receiving side
    pub decoding: DecodingResult,

    /// Message bits that differ after decoding
    pub bit_errors: u64,

    /// Outcome per codeword, in row order
    pub outcomes: Vec<CodewordOutcome>,
}

/// Drives messages through encoder, interleaver, channel and decoder.
pub struct TransmissionSimulator<S = RandomSource, C = BurstErrorChannel> {
    params: CodeParameters,
    encoder: HammingEncoder,
    decoder: HammingDecoder,
    interleaver: Interleaver,
    source: S,
    channel: C,
    metrics: Metrics,
    bursts: BurstTracker,
    iterations: u64,
}

impl TransmissionSimulator<RandomSource, BurstErrorChannel> {
    /// Build a simulator with a seeded random source and a burst channel.
    ///
    /// # Errors
    /// Invalid order, zero depth or an invalid channel config.
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        let params = CodeParameters::new(config.order)?;
        let channel = BurstErrorChannel::new(config.channel)?;
        Self::with_parts(
            params,
            config.depth,
            RandomSource::new(config.source_seed),
            channel,
        )
    }
}

impl<S: MessageSource, C: BitChannel> TransmissionSimulator<S, C> {
    /// Build a simulator from explicit parts.
    ///
    /// # Errors
    /// `InterleaveError::InvalidDimensions` if `depth` is zero.
    pub fn with_parts(params: CodeParameters, depth: usize, source: S, channel: C) -> Result<Self> {
        let interleaver = Interleaver::new(depth, params.codeword_len())?;
        debug!(
            order = params.order(),
            n = params.codeword_len(),
            k = params.message_len(),
            depth,
            "simulator created"
        );

        Ok(Self {
            encoder: HammingEncoder::new(params.clone()),
            decoder: HammingDecoder::new(params.clone()),
            params,
            interleaver,
            source,
            channel,
            metrics: Metrics::new(),
            bursts: BurstTracker::new(),
            iterations: 0,
        })
    }

    /// Code parameters in use.
    pub fn params(&self) -> &CodeParameters {
        &self.params
    }

    /// Interleaver in use.
    pub fn interleaver(&self) -> &Interleaver {
        &self.interleaver
    }

    /// The channel (for its statistics).
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Counters accumulated so far.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Encoder (for its cache statistics).
    pub fn encoder(&self) -> &HammingEncoder {
        &self.encoder
    }

    /// Decoder (for its cache statistics).
    pub fn decoder(&self) -> &HammingDecoder {
        &self.decoder
    }

    /// Summary of everything transmitted so far.
    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary::from_metrics(self.iterations, &self.metrics)
    }

    /// Transmit one block.
    ///
    /// Returns `Ok(None)` once the source is exhausted. A source that runs dry
    /// mid-block yields a partial block of fewer than `depth` codewords.
    pub fn run_iteration(&mut self) -> Result<Option<IterationReport>> {
        let k = self.params.message_len();
        let n = self.params.codeword_len();

        let mut messages = Vec::with_capacity(self.interleaver.depth());
        while messages.len() < self.interleaver.depth() {
            match self.source.next_message(k) {
                Some(message) => messages.push(message),
                None => break,
            }
        }
        if messages.is_empty() {
            return Ok(None);
        }

        // === Send ===
        let mut codewords = Vec::with_capacity(messages.len());
        for message in &messages {
            codewords.push(self.encoder.encode(message)?);
        }
        let flat: Vec<bool> = codewords.iter().flat_map(|c| c.iter().copied()).collect();
        let interleaved = self.interleaver.encode(&flat)?;

        // === Channel ===
        let received = self.channel.transmit(&interleaved);
        self.metrics
            .record_channel(&interleaved, &received, &mut self.bursts);

        // === Receive ===
        let deinterleaved = self.interleaver.decode(&received)?;
        let words: Vec<Vec<bool>> = deinterleaved.chunks(n).map(<[bool]>::to_vec).collect();
        let mut decoded = Vec::with_capacity(words.len());
        for word in &words {
            decoded.push(self.decoder.decode(word)?);
        }

        // === Compare ===
        let mut bit_errors = 0u64;
        let mut outcomes = Vec::with_capacity(messages.len());
        for (message, d) in messages.iter().zip(&decoded) {
            bit_errors += hamming_distance(message, d.message.bits()) as u64;
            let outcome = CodewordOutcome::classify(message, d);
            self.metrics.record_codeword(outcome);
            outcomes.push(outcome);
        }
        self.metrics
            .record_accuracy((messages.len() * k) as u64, bit_errors);
        self.metrics.blocks += 1;

        let index = self.iterations;
        self.iterations += 1;
        trace!(
            iteration = index,
            codewords = messages.len(),
            flips = hamming_distance(&interleaved, &received),
            bit_errors,
            "block transmitted"
        );

        Ok(Some(IterationReport {
            index,
            encoding: EncodingResult {
                messages,
                codewords,
                interleaved,
            },
            decoding: DecodingResult {
                received,
                deinterleaved: words,
                decoded,
            },
            bit_errors,
            outcomes,
        }))
    }

    /// Transmit up to `iterations` blocks.
    pub fn run(&mut self, iterations: u64) -> Result<SimulationSummary> {
        self.run_with(iterations, |_| {})
    }

    /// Transmit up to `iterations` blocks, passing each report to `observer`.
    ///
    /// Stops early if the source is exhausted.
    pub fn run_with<F>(&mut self, iterations: u64, mut observer: F) -> Result<SimulationSummary>
    where
        F: FnMut(&IterationReport),
    {
        for _ in 0..iterations {
            match self.run_iteration()? {
                Some(report) => observer(&report),
                None => break,
            }
        }
        self.metrics.complete();

        let summary = self.summary();
        debug!(
            iterations = summary.iterations,
            bits = summary.bits_transferred,
            errors = summary.bit_errors,
            success = summary.success_rate_percent,
            "simulation finished"
        );
        Ok(summary)
    }
}

/// Run a full simulation with a random source seeded by `seed`.
///
/// The channel is seeded from `channel_config.seed`.
///
/// # Example
///
/// ```
/// use hamming_sim_core::channel::BurstChannelConfig;
/// use hamming_sim_core::hamming::CodeParameters;
/// use hamming_sim_core::simulator::simulate;
///
/// let params = CodeParameters::new(3).unwrap();
/// let summary = simulate(&params, BurstChannelConfig::perfect(1), 4, 10, 7).unwrap();
/// assert_eq!(summary.bits_transferred, 10 * 4 * 4);
/// assert_eq!(summary.success_rate_percent, 100.0);
/// ```
pub fn simulate(
    params: &CodeParameters,
    channel_config: BurstChannelConfig,
    depth: usize,
    iterations: u64,
    seed: u64,
) -> Result<SimulationSummary> {
    let channel = BurstErrorChannel::new(channel_config)?;
    let mut simulator =
        TransmissionSimulator::with_parts(params.clone(), depth, RandomSource::new(seed), channel)?;
    simulator.run(iterations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::parse_bits;
    use crate::channel::ChannelStats;
    use crate::error::{Error, InterleaveError};

    /// Flips a fixed set of transmitted bit indices.
    struct ScriptedChannel {
        flips: Vec<u64>,
        sent: u64,
        flipped: u64,
    }

    impl ScriptedChannel {
        fn new(flips: Vec<u64>) -> Self {
            Self {
                flips,
                sent: 0,
                flipped: 0,
            }
        }
    }

    impl BitChannel for ScriptedChannel {
        fn step(&mut self, bit: bool) -> bool {
            let index = self.sent;
            self.sent += 1;
            if self.flips.contains(&index) {
                self.flipped += 1;
                !bit
            } else {
                bit
            }
        }

        fn stats(&self) -> ChannelStats {
            ChannelStats {
                bits_sent: self.sent,
                bits_flipped: self.flipped,
                bits_in_bad: 0,
            }
        }
    }

    /// Yields a fixed list of messages.
    struct ListSource(Vec<Vec<bool>>);

    impl MessageSource for ListSource {
        fn next_message(&mut self, _len: usize) -> Option<Vec<bool>> {
            if self.0.is_empty() {
                None
            } else {
                Some(self.0.remove(0))
            }
        }
    }

    fn config(channel: BurstChannelConfig) -> SimulationConfig {
        SimulationConfig {
            order: 3,
            depth: 4,
            channel,
            iterations: 50,
            source_seed: 11,
        }
    }

    #[test]
    fn test_perfect_channel_is_lossless() {
        let cfg = config(BurstChannelConfig::perfect(1));
        let mut sim = TransmissionSimulator::new(&cfg).unwrap();
        let summary = sim.run(cfg.iterations).unwrap();

        assert_eq!(summary.iterations, 50);
        assert_eq!(summary.bits_transferred, 50 * 4 * 4);
        assert_eq!(summary.bit_errors, 0);
        assert_eq!(summary.success_rate_percent, 100.0);
        assert_eq!(sim.metrics().codewords_clean, 200);
    }

    #[test]
    fn test_zero_iterations() {
        let params = CodeParameters::new(3).unwrap();
        let summary = simulate(&params, BurstChannelConfig::default_with_seed(3), 2, 0, 1).unwrap();
        assert_eq!(summary.bits_transferred, 0);
        assert_eq!(summary.success_rate_percent, 100.0);
    }

    #[test]
    fn test_determinism() {
        let params = CodeParameters::new(4).unwrap();
        let channel = BurstChannelConfig::default_with_seed(99);

        let a = simulate(&params, channel, 5, 200, 42).unwrap();
        let b = simulate(&params, channel, 5, 200, 42).unwrap();
        assert_eq!(a, b);
        assert!(a.bit_errors > 0);
    }

    #[test]
    fn test_burst_within_depth_is_corrected() {
        // depth 4, n 7: transmitted bits 8..12 are column 2 of every row
        let params = CodeParameters::new(3).unwrap();
        let channel = ScriptedChannel::new(vec![8, 9, 10, 11]);
        let mut sim =
            TransmissionSimulator::with_parts(params, 4, RandomSource::new(5), channel).unwrap();

        let report = sim.run_iteration().unwrap().unwrap();
        assert_eq!(report.bit_errors, 0);
        assert_eq!(report.decoding.error_count(), 4);
        assert!(report
            .outcomes
            .iter()
            .all(|&o| o == CodewordOutcome::Corrected));
        assert_eq!(
            report.decoding.corrected_positions(),
            vec![Some(3), Some(3), Some(3), Some(3)]
        );
        assert_eq!(sim.metrics().longest_burst, 4);
    }

    #[test]
    fn test_burst_longer_than_depth_miscorrects() {
        // depth 2: bits 0..4 hit positions 1 and 2 of both rows
        let params = CodeParameters::new(3).unwrap();
        let message = parse_bits("1011").unwrap();
        let source = ListSource(vec![message.clone(), message]);
        let channel = ScriptedChannel::new(vec![0, 1, 2, 3]);
        let mut sim = TransmissionSimulator::with_parts(params, 2, source, channel).unwrap();

        let report = sim.run_iteration().unwrap().unwrap();
        assert!(report
            .outcomes
            .iter()
            .all(|&o| o == CodewordOutcome::Miscorrected));
        assert!(report.bit_errors > 0);
        assert!(sim.summary().success_rate_percent < 100.0);
    }

    #[test]
    fn test_partial_block_and_exhaustion() {
        let params = CodeParameters::new(3).unwrap();
        let source = ListSource(vec![
            parse_bits("1011").unwrap(),
            parse_bits("0001").unwrap(),
            parse_bits("1111").unwrap(),
        ]);
        let channel = BurstErrorChannel::new(BurstChannelConfig::perfect(0)).unwrap();
        let mut sim = TransmissionSimulator::with_parts(params, 2, source, channel).unwrap();

        let mut seen = Vec::new();
        let summary = sim
            .run_with(10, |report| seen.push(report.encoding.codewords.len()))
            .unwrap();

        assert_eq!(seen, vec![2, 1]);
        assert_eq!(summary.iterations, 2);
        assert_eq!(summary.bits_transferred, 12);
        assert!(sim.run_iteration().unwrap().is_none());
    }

    #[test]
    fn test_report_contents() {
        let params = CodeParameters::new(3).unwrap();
        let source = ListSource(vec![parse_bits("1011").unwrap()]);
        let channel = BurstErrorChannel::new(BurstChannelConfig::perfect(0)).unwrap();
        let mut sim = TransmissionSimulator::with_parts(params, 1, source, channel).unwrap();

        let report = sim.run_iteration().unwrap().unwrap();
        assert_eq!(report.index, 0);
        assert_eq!(report.encoding.conversion_lines(), vec!["1011 => 0110011"]);
        assert_eq!(report.decoding.result_stream(), parse_bits("1011").unwrap());
    }

    #[test]
    fn test_invalid_depth() {
        let params = CodeParameters::new(3).unwrap();
        let result = simulate(&params, BurstChannelConfig::perfect(0), 0, 1, 0);
        assert!(matches!(
            result,
            Err(Error::Interleave(InterleaveError::InvalidDimensions { depth: 0, .. }))
        ));
    }
}
