//! Configuration for the hamming-sim application.
//!
//! Handles command-line arguments and generates sensible defaults
//! (including randomized defaults that are reproducible with a seed).
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments, using intelligent defaults.
//! All defaults are printed so runs are reproducible.

use anyhow::{ensure, Context, Result};
use clap::Args;
use hamming_sim_core::channel::BurstChannelConfig;
use hamming_sim_core::hamming::{CodeParameters, MAX_ORDER};
use hamming_sim_core::simulator::SimulationConfig;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

/// Iterations for a normal run.
pub const DEFAULT_ITERATIONS: u64 = 1000;

/// Iterations when every block is printed.
pub const VERBOSE_ITERATIONS: u64 = 3;

/// Largest accepted `--depth`.
pub const MAX_DEPTH: usize = 4096;

/// Size of generated sample data for `encode`/`transfer` without `--in`.
pub const DEFAULT_SAMPLE_BYTES: usize = 16 * 1024;

// === Command-line arguments ===

/// Channel flags shared by every subcommand that transmits.
#[derive(Args, Debug, Clone, Default)]
pub struct ChannelArgs {
    /// Flip probability while in the Bad state (default: random 0.1-0.9)
    #[arg(long)]
    pub p_error: Option<f64>,

    /// Probability of switching Good -> Bad (default: random 0.1-0.9)
    #[arg(long)]
    pub p_good_bad: Option<f64>,

    /// Probability of switching Bad -> Good (default: random 0.1-0.9)
    #[arg(long)]
    pub p_bad_good: Option<f64>,

    /// Flip probability while in the Good state
    #[arg(long, default_value_t = 0.0)]
    pub p_good_error: f64,

    /// Disable the channel entirely (no flips)
    #[arg(long, conflicts_with_all = ["p_error", "p_good_bad", "p_bad_good"])]
    pub perfect: bool,
}

/// Code flags shared by every subcommand that encodes.
#[derive(Args, Debug, Clone, Default)]
pub struct CodeArgs {
    /// Hamming order r, codewords are 2^r - 1 bits (default: random 3-8)
    #[arg(short = 'r', long)]
    pub order: Option<u32>,

    /// Interleaving depth in codewords, at most 4096 (default: random 1-10)
    #[arg(short = 'd', long)]
    pub depth: Option<usize>,

    /// Random seed for determinism (default: time-based)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print resolved configuration
    #[arg(long)]
    pub print_config: bool,
}

/// `simulate` arguments.
#[derive(Args, Debug, Clone, Default)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub code: CodeArgs,

    #[command(flatten)]
    pub channel: ChannelArgs,

    /// Blocks to transmit (default: 1000, or 3 with --verbose)
    #[arg(short = 'n', long)]
    pub iterations: Option<u64>,

    /// Print every block's conversions
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the raw metrics export after the summary
    #[arg(long)]
    pub export_metrics: bool,
}

/// `encode` and `transfer` arguments.
#[derive(Args, Debug, Clone, Default)]
pub struct CodecArgs {
    #[command(flatten)]
    pub code: CodeArgs,

    #[command(flatten)]
    pub channel: ChannelArgs,

    /// Input file (default: generate sample data)
    #[arg(long = "in")]
    pub input: Option<PathBuf>,

    /// Output file
    #[arg(long = "out")]
    pub output: Option<PathBuf>,

    /// Size of generated sample data in bytes
    #[arg(long, default_value_t = DEFAULT_SAMPLE_BYTES)]
    pub sample_bytes: usize,
}

// === Resolved configuration ===

/// Complete configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Seed every default was drawn from
    pub seed: u64,

    /// Hamming order r
    pub order: u32,

    /// Codewords per interleaving block
    pub depth: usize,

    /// Channel model
    pub channel: BurstChannelConfig,

    /// Blocks to transmit
    pub iterations: u64,

    /// Whether to print every block
    pub verbose: bool,

    /// Whether to print the resolved config
    pub print_config: bool,

    /// Whether to print the metrics export
    pub export_metrics: bool,
}

impl Config {
    /// Resolve `simulate` arguments into a configuration.
    ///
    /// If `--seed` is provided, every unset value is drawn from that seed and
    /// the run is fully deterministic.
    pub fn from_args(args: &SimulateArgs) -> Result<Self> {
        let resolved = Resolver::new(args.code.seed);
        let (seed, order, depth, channel) = resolved.resolve(&args.code, &args.channel)?;

        let default_iterations = if args.verbose {
            VERBOSE_ITERATIONS
        } else {
            DEFAULT_ITERATIONS
        };

        Ok(Self {
            seed,
            order,
            depth,
            channel,
            iterations: args.iterations.unwrap_or(default_iterations),
            verbose: args.verbose,
            print_config: args.code.print_config,
            export_metrics: args.export_metrics,
        })
    }

    /// Core simulation parameters.
    pub fn simulation(&self) -> SimulationConfig {
        SimulationConfig {
            order: self.order,
            depth: self.depth,
            channel: self.channel,
            iterations: self.iterations,
            source_seed: source_seed(self.seed),
        }
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Seed: {}", self.seed);
        print_code(self.order, self.depth);
        println!("Iterations: {}", self.iterations);
        println!();
        print_channel(&self.channel);
    }
}

/// Complete configuration for `encode` and `transfer`.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Seed every default was drawn from
    pub seed: u64,

    /// Hamming order r
    pub order: u32,

    /// Codewords per interleaving block
    pub depth: usize,

    /// Channel model
    pub channel: BurstChannelConfig,

    /// Input file (None = generate sample)
    pub input: Option<PathBuf>,

    /// Output file
    pub output: PathBuf,

    /// Size of generated sample data
    pub sample_bytes: usize,

    /// Whether to print the resolved config
    pub print_config: bool,
}

impl CodecConfig {
    /// Resolve `encode`/`transfer` arguments; `default_output` is used when
    /// `--out` is absent.
    pub fn from_args(args: &CodecArgs, default_output: &str) -> Result<Self> {
        let resolved = Resolver::new(args.code.seed);
        let (seed, order, depth, channel) = resolved.resolve(&args.code, &args.channel)?;

        Ok(Self {
            seed,
            order,
            depth,
            channel,
            input: args.input.clone(),
            output: args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(default_output)),
            sample_bytes: args.sample_bytes,
            print_config: args.code.print_config,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.input {
            Some(path) => println!("Input file:  {}", path.display()),
            None => println!(
                "Input file:  (generate {} sample bytes)",
                self.sample_bytes
            ),
        }
        println!("Output file: {}", self.output.display());
        println!("Seed: {}", self.seed);
        print_code(self.order, self.depth);
        println!();
        print_channel(&self.channel);
    }
}

/// Seed for the message source, kept apart from the channel seed.
pub fn source_seed(seed: u64) -> u64 {
    seed.wrapping_add(1)
}

/// Draws unset values from a seeded RNG.
struct Resolver {
    seed: u64,
    rng: ChaCha8Rng,
}

impl Resolver {
    fn new(seed: Option<u64>) -> Self {
        // Determine seed (explicit or time-based)
        let seed = seed.unwrap_or_else(time_seed);
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn resolve(
        mut self,
        code: &CodeArgs,
        channel: &ChannelArgs,
    ) -> Result<(u64, u32, usize, BurstChannelConfig)> {
        // Draw every default even when overridden so the remaining defaults
        // stay the same for a given seed.
        let order = pick(code.order, self.rng.gen_range(3..=8));
        let depth = pick(code.depth, self.rng.gen_range(1..=10));
        let p_error = pick(channel.p_error, self.probability());
        let p_good_bad = pick(channel.p_good_bad, self.probability());
        let p_bad_good = pick(channel.p_bad_good, self.probability());

        CodeParameters::new(order).with_context(|| {
            format!("--order must be between 2 and {MAX_ORDER}, got {order}")
        })?;
        ensure!(
            (1..=MAX_DEPTH).contains(&depth),
            "--depth must be between 1 and {MAX_DEPTH}, got {depth}"
        );

        let channel = if channel.perfect {
            BurstChannelConfig::perfect(self.seed)
        } else {
            BurstChannelConfig::from_transitions(p_error, p_good_bad, p_bad_good, self.seed)
                .with_good_error_probability(channel.p_good_error)
        };
        channel.validate().context("invalid channel probabilities")?;

        Ok((self.seed, order, depth, channel))
    }

    /// One of 0.1, 0.2, ..., 0.9.
    fn probability(&mut self) -> f64 {
        f64::from(self.rng.gen_range(1..=9u8)) / 10.0
    }
}

fn pick<T>(explicit: Option<T>, drawn: T) -> T {
    explicit.unwrap_or(drawn)
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|t| t.as_millis() as u64)
        .unwrap_or(0)
}

fn print_code(order: u32, depth: usize) {
    let n = (1usize << order) - 1;
    println!("Code: Hamming({}, {}), r = {}", n, n - order as usize, order);
    println!("Interleave depth: {} codewords", depth);
}

fn print_channel(channel: &BurstChannelConfig) {
    println!("=== Channel ===");
    println!("P(error | bad):  {:.2}", channel.error_probability);
    println!("P(error | good): {:.2}", channel.good_error_probability);
    println!("P(good -> bad):  {:.2}", channel.good_to_bad());
    println!("P(bad -> good):  {:.2}", channel.bad_to_good());
    println!(
        "Expected time in bad state: {:.1}%",
        channel.stationary_bad_fraction() * 100.0
    );
    println!();
}
