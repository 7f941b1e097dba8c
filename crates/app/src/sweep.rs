//! Parameter sweeps over many simulation runs.
//!
//! Two layouts are supported:
//! - `grid`: every combination of order 3-8, depth 1-10 and each channel
//!   probability 0.1-0.9 (step 0.1)
//! - `graph`: one parameter varied at a time around a fixed point, giving one
//!   series per parameter, suitable for plotting
//!
//! Runs are sequential and each uses the same seeds, so two points differ
//! only in their parameters.

use anyhow::{Context, Result};
use clap::ValueEnum;
use hamming_sim_core::channel::BurstChannelConfig;
use hamming_sim_core::hamming::CodeParameters;
use hamming_sim_core::simulator::{simulate, SimulationSummary};
use std::fmt;
use tracing::{debug, info};

/// Sweep layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SweepMode {
    /// Full cartesian grid
    Grid,
    /// One parameter at a time
    Graph,
}

impl SweepMode {
    /// Iterations per point when not given on the command line.
    pub fn default_iterations(self) -> u64 {
        match self {
            SweepMode::Grid => 1000,
            SweepMode::Graph => 500,
        }
    }
}

/// Parameters of one simulation run in a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    pub order: u32,
    pub depth: usize,
    pub p_error: f64,
    pub p_good_bad: f64,
    pub p_bad_good: f64,
}

impl SweepPoint {
    /// Fixed point the graph series vary around.
    pub const GRAPH_BASE: SweepPoint = SweepPoint {
        order: 2,
        depth: 4,
        p_error: 0.6,
        p_good_bad: 0.8,
        p_bad_good: 0.3,
    };

    fn channel(&self, seed: u64) -> BurstChannelConfig {
        BurstChannelConfig::from_transitions(self.p_error, self.p_good_bad, self.p_bad_good, seed)
    }
}

/// A point together with its result.
#[derive(Debug, Clone, Copy)]
pub struct SweepResult {
    pub point: SweepPoint,
    pub summary: SimulationSummary,
}

/// The parameter a graph series varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepParameter {
    Order,
    Depth,
    PError,
    PGoodBad,
    PBadGood,
}

impl SweepParameter {
    /// Column name used in sweep output.
    pub fn name(self) -> &'static str {
        match self {
            SweepParameter::Order => "order",
            SweepParameter::Depth => "depth",
            SweepParameter::PError => "p_error",
            SweepParameter::PGoodBad => "p_good_bad",
            SweepParameter::PBadGood => "p_bad_good",
        }
    }

    /// Value of this parameter at `point`.
    pub fn value(self, point: &SweepPoint) -> f64 {
        match self {
            SweepParameter::Order => f64::from(point.order),
            SweepParameter::Depth => point.depth as f64,
            SweepParameter::PError => point.p_error,
            SweepParameter::PGoodBad => point.p_good_bad,
            SweepParameter::PBadGood => point.p_bad_good,
        }
    }
}

impl fmt::Display for SweepParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Points sharing the parameter being varied.
#[derive(Debug, Clone)]
pub struct Series {
    /// The varied parameter
    pub parameter: SweepParameter,

    /// Points in ascending order of that parameter
    pub points: Vec<SweepPoint>,
}

impl Series {
    /// Value of the varied parameter at `point`.
    pub fn x(&self, point: &SweepPoint) -> f64 {
        self.parameter.value(point)
    }
}

/// 0.1, 0.2, ..., 0.9 without accumulated rounding.
fn probabilities() -> impl Iterator<Item = f64> + Clone {
    (1..=9u8).map(|i| f64::from(i) / 10.0)
}

/// Every point of the full grid, order varying slowest.
pub fn grid_points() -> Vec<SweepPoint> {
    let mut points = Vec::new();
    for order in 3..=8 {
        for depth in 1..=10 {
            for p_error in probabilities() {
                for p_good_bad in probabilities() {
                    for p_bad_good in probabilities() {
                        points.push(SweepPoint {
                            order,
                            depth,
                            p_error,
                            p_good_bad,
                            p_bad_good,
                        });
                    }
                }
            }
        }
    }
    points
}

/// One series per parameter, each varying only that parameter.
pub fn graph_series() -> Vec<Series> {
    let base = SweepPoint::GRAPH_BASE;
    vec![
        Series {
            parameter: SweepParameter::Order,
            points: (3..=8).map(|order| SweepPoint { order, ..base }).collect(),
        },
        Series {
            parameter: SweepParameter::PError,
            points: probabilities()
                .map(|p_error| SweepPoint { p_error, ..base })
                .collect(),
        },
        Series {
            parameter: SweepParameter::PGoodBad,
            points: probabilities()
                .map(|p_good_bad| SweepPoint { p_good_bad, ..base })
                .collect(),
        },
        Series {
            parameter: SweepParameter::PBadGood,
            points: probabilities()
                .map(|p_bad_good| SweepPoint { p_bad_good, ..base })
                .collect(),
        },
        Series {
            parameter: SweepParameter::Depth,
            points: (1..=20).map(|depth| SweepPoint { depth, ..base }).collect(),
        },
    ]
}

/// Run one point.
pub fn run_point(point: SweepPoint, iterations: u64, seed: u64) -> Result<SweepResult> {
    let params = CodeParameters::new(point.order)?;
    let summary = simulate(
        &params,
        point.channel(seed),
        point.depth,
        iterations,
        crate::config::source_seed(seed),
    )
    .with_context(|| format!("sweep point {point:?} failed"))?;

    debug!(?point, success = summary.success_rate_percent, "sweep point done");
    Ok(SweepResult { point, summary })
}

/// Run every point in order, handing each result to `on_result`.
pub fn run_points<F>(points: &[SweepPoint], iterations: u64, seed: u64, mut on_result: F) -> Result<()>
where
    F: FnMut(&SweepResult),
{
    info!(points = points.len(), iterations, "sweep started");
    for &point in points {
        let result = run_point(point, iterations, seed)?;
        on_result(&result);
    }
    Ok(())
}
