//! Console output.
//!
//! The core library never prints; everything a user sees comes from here.

use crate::sweep::{Series, SweepResult};
use hamming_sim_core::bits::format_bits;
use hamming_sim_core::channel::ChannelStats;
use hamming_sim_core::hamming::CacheStats;
use hamming_sim_core::metrics::Metrics;
use hamming_sim_core::simulator::{IterationReport, SimulationSummary};
use hamming_sim_core::transfer::TransferReport;

/// Print every stage of one block.
///
/// Transmitted streams are printed `depth` bits per line, so each line is
/// one column of the interleaving grid.
pub fn print_iteration(report: &IterationReport, depth: usize) {
    println!("=== Iteration {} ===", report.index + 1);
    println!("Input:       {}", format_bits(&report.encoding.input_stream()));
    println!();

    println!("Encoding:");
    for line in report.encoding.conversion_lines() {
        println!("  {line}");
    }
    println!();

    println!("Interleaved:");
    for row in report.encoding.interleaved_rows(depth) {
        println!("  {row}");
    }
    println!("Received:");
    for row in report.decoding.received_rows(depth) {
        println!("  {row}");
    }
    println!();

    println!("Decoding (received => corrected => message):");
    for (line, position) in report
        .decoding
        .conversion_lines()
        .iter()
        .zip(report.decoding.corrected_positions())
    {
        match position {
            Some(p) => println!("  {line}   (fixed bit {p})"),
            None => println!("  {line}"),
        }
    }
    println!();

    println!("Output:      {}", format_bits(&report.decoding.result_stream()));
    println!(
        "Bit errors:  {} of {}",
        report.bit_errors,
        report.encoding.input_stream().len()
    );
    println!();
}

/// Print the outcome of a simulation run.
pub fn print_summary(
    summary: &SimulationSummary,
    metrics: &Metrics,
    channel: &ChannelStats,
    encoder_cache: &CacheStats,
    decoder_cache: &CacheStats,
) {
    println!("=== Results ===");
    println!("Blocks:             {}", summary.iterations);
    println!("Bits transferred:   {}", summary.bits_transferred);
    println!("Bit errors:         {}", summary.bit_errors);
    println!("Success rate:       {:.4}%", summary.success_rate_percent);
    println!();

    print_codewords(metrics);
    print_channel(metrics, channel);

    println!("=== Caches ===");
    println!(
        "Encoder: {} entries, {:.1}% hits",
        encoder_cache.entries,
        encoder_cache.hit_rate() * 100.0
    );
    println!(
        "Decoder: {} entries, {:.1}% hits",
        decoder_cache.entries,
        decoder_cache.hit_rate() * 100.0
    );
    println!();
    println!("Duration: {:.3}s", metrics.duration().as_secs_f64());
}

/// Print the outcome of a byte transfer.
pub fn print_transfer(report: &TransferReport, channel: &ChannelStats) {
    let metrics = &report.metrics;
    println!("=== Transfer ===");
    println!("Bytes:              {}", report.received.len());
    println!("Bytes altered:      {}", report.byte_errors);
    println!("Data bit errors:    {}", metrics.bit_errors);
    println!("Success rate:       {:.4}%", metrics.success_rate_percent());
    println!(
        "Result:             {}",
        if report.is_exact() {
            "exact copy"
        } else {
            "corrupted"
        }
    );
    println!();

    print_codewords(metrics);
    print_channel(metrics, channel);
}

fn print_codewords(metrics: &Metrics) {
    let total = metrics.codewords().max(1) as f64;
    println!("=== Codewords ===");
    println!("Total:              {}", metrics.codewords());
    println!(
        "Clean:              {} ({:.2}%)",
        metrics.codewords_clean,
        metrics.codewords_clean as f64 / total * 100.0
    );
    println!(
        "Corrected:          {} ({:.2}%)",
        metrics.codewords_corrected,
        metrics.codewords_corrected as f64 / total * 100.0
    );
    println!(
        "Mis-corrected:      {} ({:.2}%)",
        metrics.codewords_miscorrected,
        metrics.codewords_miscorrected as f64 / total * 100.0
    );
    println!(
        "Undetected:         {} ({:.2}%)",
        metrics.codewords_undetected,
        metrics.codewords_undetected as f64 / total * 100.0
    );
    println!();
}

fn print_channel(metrics: &Metrics, channel: &ChannelStats) {
    println!("=== Channel ===");
    println!("Bits sent:          {}", channel.bits_sent);
    println!(
        "Bits flipped:       {} ({:.3}%)",
        channel.bits_flipped,
        channel.flip_rate() * 100.0
    );
    println!("Time in bad state:  {:.2}%", channel.bad_fraction() * 100.0);
    println!(
        "Bursts:             {} (mean {:.2}, longest {})",
        metrics.bursts,
        metrics.mean_burst_len(),
        metrics.longest_burst
    );
    println!();
}

/// Header line for grid sweep output.
pub fn print_grid_header() {
    println!("order,depth,p_error,p_good_bad,p_bad_good,success_rate");
}

/// One grid sweep row.
pub fn print_grid_row(result: &SweepResult) {
    let p = &result.point;
    println!(
        "{},{},{:.1},{:.1},{:.1},{:.6}",
        p.order,
        p.depth,
        p.p_error,
        p.p_good_bad,
        p.p_bad_good,
        result.summary.success_rate_percent
    );
}

/// Heading for one graph series.
pub fn print_series_header(series: &Series) {
    println!();
    println!("# {}", series.parameter);
    println!("{},success_rate", series.parameter);
}

/// One `(x, success rate)` coordinate of a graph series.
pub fn print_series_row(series: &Series, result: &SweepResult) {
    println!(
        "{},{:.6}",
        series.x(&result.point),
        result.summary.success_rate_percent
    );
}
