//! hamming-sim: Hamming codes and interleaving over a bursty channel
//!
//! Runs with zero arguments: a single simulation with randomized, printed,
//! reproducible defaults. Subcommands cover sweeps and whole-file transfers.

mod config;
mod input_gen;
mod report;
mod sweep;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use config::{CodecArgs, CodecConfig, Config, SimulateArgs};
use hamming_sim_core::channel::{BitChannel, BurstErrorChannel};
use hamming_sim_core::simulator::TransmissionSimulator;
use hamming_sim_core::transfer::{decode_from_container, encode_to_container, transfer};
use std::path::{Path, PathBuf};
use sweep::SweepMode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hamming-sim", version)]
#[command(about = "Hamming error correction with block interleaving over a burst error channel")]
struct Cli {
    /// Log filter (e.g. "debug", "hamming_sim_core=trace"); overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Transmit random messages and report accuracy (default)
    Simulate(SimulateArgs),

    /// Run many simulations over a range of parameters, printing CSV
    Sweep(SweepArgs),

    /// Encode a file, pass it through the channel and write a container
    Encode(CodecArgs),

    /// Decode a container written by `encode`
    Decode(DecodeArgs),

    /// Encode, transmit and decode a file in memory
    Transfer(CodecArgs),

    /// Write generated sample data to a file
    Sample(SampleArgs),
}

#[derive(Args, Debug)]
struct SweepArgs {
    /// Sweep layout
    #[arg(long, value_enum, default_value_t = SweepMode::Grid)]
    mode: SweepMode,

    /// Blocks per point (default: 1000 for grid, 500 for graph)
    #[arg(short = 'n', long)]
    iterations: Option<u64>,

    /// Random seed shared by every point
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Container written by `encode`
    #[arg(long = "in")]
    input: PathBuf,

    /// Where to write the decoded data
    #[arg(long = "out", default_value = "./decoded.bin")]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct SampleArgs {
    /// Output file
    #[arg(long = "out", default_value = "./sample.bin")]
    output: PathBuf,

    /// Size in bytes
    #[arg(long, default_value_t = config::DEFAULT_SAMPLE_BYTES)]
    bytes: usize,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match cli.command {
        None => run_simulate(&SimulateArgs::default()),
        Some(Command::Simulate(args)) => run_simulate(&args),
        Some(Command::Sweep(args)) => run_sweep(&args),
        Some(Command::Encode(args)) => run_encode(&args),
        Some(Command::Decode(args)) => run_decode(&args),
        Some(Command::Transfer(args)) => run_transfer(&args),
        Some(Command::Sample(args)) => {
            input_gen::write_sample_file(&args.output, args.seed, args.bytes)
                .with_context(|| format!("failed to write {}", args.output.display()))?;
            info!(path = %args.output.display(), bytes = args.bytes, "sample written");
            Ok(())
        }
    }
}

/// Install the fmt subscriber. `--log-level` wins over `RUST_LOG`; the
/// fallback is `info`.
fn init_logging(level: Option<&str>) {
    let filter = level
        .and_then(|l| EnvFilter::try_new(l).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_simulate(args: &SimulateArgs) -> Result<()> {
    let config = Config::from_args(args)?;
    info!(seed = config.seed, "resolved configuration (pass --seed to reproduce)");
    if config.print_config || config.verbose {
        config.print();
    }

    let mut simulator = TransmissionSimulator::new(&config.simulation())?;
    let summary = if config.verbose {
        let depth = config.depth;
        simulator.run_with(config.iterations, |r| report::print_iteration(r, depth))?
    } else {
        simulator.run(config.iterations)?
    };

    report::print_summary(
        &summary,
        simulator.metrics(),
        &simulator.channel().stats(),
        &simulator.encoder().cache_stats(),
        &simulator.decoder().cache_stats(),
    );
    if config.export_metrics {
        println!();
        print!("{}", simulator.metrics().export_text());
    }
    Ok(())
}

fn run_sweep(args: &SweepArgs) -> Result<()> {
    let iterations = args
        .iterations
        .unwrap_or_else(|| args.mode.default_iterations());

    match args.mode {
        SweepMode::Grid => {
            report::print_grid_header();
            sweep::run_points(&sweep::grid_points(), iterations, args.seed, report::print_grid_row)
        }
        SweepMode::Graph => {
            for series in sweep::graph_series() {
                report::print_series_header(&series);
                sweep::run_points(&series.points, iterations, args.seed, |result| {
                    report::print_series_row(&series, result)
                })?;
            }
            Ok(())
        }
    }
}

/// Read `--in`, or generate sample data from the seed.
fn load_input(config: &CodecConfig) -> Result<Vec<u8>> {
    match &config.input {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => Ok(input_gen::generate_sample_data(config.seed, config.sample_bytes)),
    }
}

fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    std::fs::write(path, data).with_context(|| format!("failed to write {}", path.display()))
}

fn run_encode(args: &CodecArgs) -> Result<()> {
    let config = CodecConfig::from_args(args, "./encoded.hmng")?;
    if config.print_config {
        config.print();
    }

    let data = load_input(&config)?;
    let mut channel = BurstErrorChannel::new(config.channel)?;
    let container = encode_to_container(&data, config.order, config.depth, &mut channel)?;
    write_output(&config.output, &container)?;

    let stats = channel.stats();
    info!(
        seed = config.seed,
        bytes = data.len(),
        container_bytes = container.len(),
        flipped = stats.bits_flipped,
        path = %config.output.display(),
        "encoded"
    );
    Ok(())
}

fn run_decode(args: &DecodeArgs) -> Result<()> {
    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let decoded = decode_from_container(&bytes)
        .with_context(|| format!("{} is not a valid container", args.input.display()))?;
    write_output(&args.output, &decoded.data)?;

    info!(
        bytes = decoded.data.len(),
        codewords = decoded.decoded.len(),
        corrections = decoded.corrections(),
        path = %args.output.display(),
        "decoded"
    );
    Ok(())
}

fn run_transfer(args: &CodecArgs) -> Result<()> {
    let config = CodecConfig::from_args(args, "./received.bin")?;
    info!(seed = config.seed, "resolved configuration (pass --seed to reproduce)");
    if config.print_config {
        config.print();
    }

    let data = load_input(&config)?;
    let mut channel = BurstErrorChannel::new(config.channel)?;
    let result = transfer(&data, config.order, config.depth, &mut channel)?;
    write_output(&config.output, &result.received)?;

    report::print_transfer(&result, &channel.stats());
    Ok(())
}
