//! Integration tests for the full hamming-sim pipeline.
//!
//! These tests verify end-to-end behavior: source -> encode -> interleave ->
//! channel -> deinterleave -> decode, with verification of the accuracy
//! statistics against what the channel actually did.

use hamming_sim_core::{
    bits::{format_bits, parse_bits},
    channel::{BitChannel, BurstChannelConfig, BurstErrorChannel},
    container::{parse_container, HEADER_SIZE},
    hamming::{CodeParameters, HammingDecoder, HammingEncoder},
    interleaver::{deinterleave, interleave},
    result::CodewordOutcome,
    simulator::{simulate, SimulationConfig, TransmissionSimulator},
    source::RandomSource,
    transfer::{decode_from_container, encode_to_container, transfer},
    Error,
};

/// Encode "1011" with r=3, interleave alone, send clean, decode.
#[test]
fn test_reference_scenarios() {
    let params = CodeParameters::new(3).expect("valid order");
    let mut encoder = HammingEncoder::new(params.clone());
    let mut decoder = HammingDecoder::new(params);

    let codeword = encoder.encode(&parse_bits("1011").unwrap()).unwrap();
    assert_eq!(codeword.to_string(), "0110011");
    assert_eq!(decoder.decode(&codeword).unwrap().message.to_string(), "1011");

    let interleaved = interleave(&parse_bits("101110").unwrap(), 2, 3).unwrap();
    assert_eq!(format_bits(&interleaved), "110110");
    assert_eq!(
        format_bits(&deinterleave(&interleaved, 2, 3).unwrap()),
        "101110"
    );
}

/// A channel stuck in Bad with certain flips inverts every bit from the start.
#[test]
fn test_always_bad_channel() {
    let config = BurstChannelConfig {
        good_to_good: 0.0,
        bad_to_bad: 1.0,
        error_probability: 1.0,
        good_error_probability: 0.0,
        seed: 3,
    };
    let mut channel = BurstErrorChannel::new(config).unwrap();
    let input = parse_bits("0110011010").unwrap();
    let output = channel.transmit(&input);

    assert_eq!(format_bits(&output), "1001100101");
    assert_eq!(channel.stats().bits_flipped, 10);
}

/// Full simulation over a perfect channel: nothing lost.
#[test]
fn test_full_pipeline_perfect_channel() {
    for order in 2..=6 {
        let params = CodeParameters::new(order).unwrap();
        let summary = simulate(&params, BurstChannelConfig::perfect(1), 3, 20, 9).unwrap();

        assert_eq!(
            summary.bits_transferred,
            20 * 3 * params.message_len() as u64
        );
        assert_eq!(summary.bit_errors, 0);
        assert_eq!(summary.success_rate_percent, 100.0);
    }
}

/// Statistics stay consistent with what the channel did.
#[test]
fn test_full_pipeline_bursty_channel() {
    let config = SimulationConfig {
        order: 4,
        depth: 6,
        channel: BurstChannelConfig::from_transitions(0.5, 0.05, 0.4, 77),
        iterations: 300,
        source_seed: 5,
    };
    let mut sim = TransmissionSimulator::new(&config).unwrap();
    let summary = sim.run(config.iterations).unwrap();
    let metrics = sim.metrics();

    assert_eq!(summary.iterations, 300);
    assert_eq!(metrics.codewords(), 300 * 6);
    assert_eq!(metrics.channel_bits, sim.channel().stats().bits_sent);
    assert_eq!(metrics.channel_flips, sim.channel().stats().bits_flipped);
    assert!(metrics.channel_flips > 0);
    assert!(summary.success_rate_percent > 0.0 && summary.success_rate_percent <= 100.0);

    // A codeword can only be wrong if the channel touched it
    assert!(metrics.codewords_failed() <= metrics.channel_flips);
}

/// Interleaving depth spreads bursts: deeper interleaving never loses to none
/// on the same channel realization.
#[test]
fn test_interleaving_helps_on_bursty_channel() {
    let params = CodeParameters::new(3).unwrap();
    // Long Bad stays with certain flips, rare entry
    let channel = BurstChannelConfig::from_transitions(1.0, 0.01, 0.25, 2024);

    let shallow = simulate(&params, channel, 1, 4000, 8).unwrap();
    let deep = simulate(&params, channel, 16, 250, 8).unwrap();

    assert_eq!(shallow.bits_transferred, deep.bits_transferred);
    assert!(
        deep.success_rate_percent > shallow.success_rate_percent,
        "deep {} vs shallow {}",
        deep.success_rate_percent,
        shallow.success_rate_percent
    );
}

/// Same seeds, same numbers.
#[test]
fn test_determinism() {
    let params = CodeParameters::new(5).unwrap();
    let channel = BurstChannelConfig::default_with_seed(31);

    let runs: Vec<_> = (0..3)
        .map(|_| simulate(&params, channel, 4, 100, 17).unwrap())
        .collect();
    assert_eq!(runs[0], runs[1]);
    assert_eq!(runs[1], runs[2]);

    let input = vec![false; 2000];
    let mut a = BurstErrorChannel::new(BurstChannelConfig::default_with_seed(31)).unwrap();
    let mut b = BurstErrorChannel::new(BurstChannelConfig::default_with_seed(31)).unwrap();
    let mut c = BurstErrorChannel::new(BurstChannelConfig::default_with_seed(32)).unwrap();
    let out_a = a.transmit(&input);
    assert_eq!(out_a, b.transmit(&input));
    assert_ne!(out_a, c.transmit(&input));
}

/// The observer sees every block, and the reported errors add up.
#[test]
fn test_observer_reports() {
    let params = CodeParameters::new(3).unwrap();
    let channel = BurstErrorChannel::new(BurstChannelConfig::default_with_seed(4)).unwrap();
    let mut sim =
        TransmissionSimulator::with_parts(params, 3, RandomSource::new(12), channel).unwrap();

    let mut blocks = 0;
    let mut errors = 0;
    let mut failed = 0;
    let summary = sim
        .run_with(40, |report| {
            blocks += 1;
            errors += report.bit_errors;
            failed += report.outcomes.iter().filter(|o| !o.is_success()).count();
            assert_eq!(report.encoding.interleaved.len(), 21);
            assert_eq!(report.decoding.decoded.len(), 3);
        })
        .unwrap();

    assert_eq!(blocks, 40);
    assert_eq!(errors, summary.bit_errors);
    assert_eq!(failed as u64, sim.metrics().codewords_failed());
    assert_eq!(
        sim.metrics().codewords_clean + sim.metrics().codewords_corrected,
        120 - failed as u64
    );
}

/// Encode a buffer into a container, then decode from the bytes alone.
#[test]
fn test_container_transfer_perfect() {
    let data: Vec<u8> = b"The quick brown fox jumps over the lazy dog. ".repeat(50);
    let mut channel = BurstErrorChannel::new(BurstChannelConfig::perfect(1)).unwrap();

    let bytes = encode_to_container(&data, 5, 7, &mut channel).unwrap();
    let container = parse_container(&bytes).unwrap();
    assert_eq!(container.header.order, 5);
    assert_eq!(container.header.depth, 7);
    assert_eq!(container.header.data_len, data.len() as u64);
    assert!(bytes.len() > HEADER_SIZE);

    let decoded = decode_from_container(&bytes).unwrap();
    assert_eq!(decoded.data, data);
    assert_eq!(decoded.corrections(), 0);
}

/// Header corruption is caught before decoding.
#[test]
fn test_crc_corruption_detection() {
    let data = b"header integrity";
    let mut channel = BurstErrorChannel::new(BurstChannelConfig::perfect(1)).unwrap();
    let mut bytes = encode_to_container(data, 3, 2, &mut channel).unwrap();

    bytes[12] ^= 0xFF;
    assert!(matches!(
        decode_from_container(&bytes),
        Err(Error::Crc { .. })
    ));
}

/// In-memory transfer over a noisy channel: accuracy counts data bits only.
#[test]
fn test_transfer_noisy_channel() {
    let data: Vec<u8> = (0..2000u32).map(|i| (i * 7 % 251) as u8).collect();
    let mut channel =
        BurstErrorChannel::new(BurstChannelConfig::from_transitions(0.3, 0.02, 0.5, 66)).unwrap();

    let report = transfer(&data, 4, 8, &mut channel).unwrap();
    assert_eq!(report.received.len(), data.len());
    assert_eq!(report.metrics.bits_transferred, 2000 * 8);
    assert!(report.metrics.codewords_corrected > 0);

    let wrong = report
        .received
        .iter()
        .zip(&data)
        .filter(|(a, b)| a != b)
        .count();
    assert_eq!(wrong, report.byte_errors);
}

/// Two flips in one codeword are outside the code's guarantee.
#[test]
fn test_double_error_is_not_corrected() {
    let params = CodeParameters::new(4).unwrap();
    let mut encoder = HammingEncoder::new(params.clone());
    let mut decoder = HammingDecoder::new(params);

    let message = parse_bits("10110011101").unwrap();
    let mut received = encoder.encode(&message).unwrap().to_vec();
    received[0] = !received[0];
    received[5] = !received[5];

    let decoded = decoder.decode(&received).unwrap();
    assert!(decoded.error_detected);
    assert_ne!(
        CodewordOutcome::classify(&message, &decoded),
        CodewordOutcome::Corrected
    );
}
