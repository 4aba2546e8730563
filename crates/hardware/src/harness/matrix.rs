//! Test-matrix generation and execution.
//!
//! The matrix is the cross product of the four option lists, iterated outer to inner as
//! period A, period B, initiator pacing, target pacing. Each combination runs on a fresh
//! testbench with its own seed; a failing combination is recorded and the rest still run.

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use super::bench::{LinkStats, TestbenchBuilder};
use super::driver::TransactionDriver;
use super::report::{CombinationResult, MatrixReport, Outcome};
use crate::common::{Result, SimTime};
use crate::config::{MatrixConfig, PacingChoice};
use crate::pacing::derive_seed;

/// One tuple of the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TestCombination {
    /// Position in iteration order.
    pub index: usize,
    /// Domain A clock period.
    pub period_a: SimTime,
    /// Domain B clock period.
    pub period_b: SimTime,
    /// Initiator-side pacing.
    pub initiator: PacingChoice,
    /// Target-side pacing.
    pub target: PacingChoice,
    /// Seed for this combination's shuffled patterns.
    pub seed: u64,
}

impl fmt::Display for TestCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} A={} B={} initiator={} target={}",
            self.index, self.period_a, self.period_b, self.initiator, self.target
        )
    }
}

/// Enumerates every combination in iteration order.
pub fn combinations(config: &MatrixConfig) -> Vec<TestCombination> {
    let mut out = Vec::with_capacity(config.combination_count());
    for &a in &config.domain_a_periods {
        for &b in &config.domain_b_periods {
            for &initiator in &config.initiator_pacing {
                for &target in &config.target_pacing {
                    let index = out.len();
                    out.push(TestCombination {
                        index,
                        period_a: config.time(a),
                        period_b: config.time(b),
                        initiator,
                        target,
                        seed: derive_seed(config.seed, index as u64),
                    });
                }
            }
        }
    }
    out
}

/// Runs one combination on a fresh testbench.
///
/// Errors never escape: they are folded into the returned result.
pub fn run_combination(config: &MatrixConfig, combination: TestCombination) -> CombinationResult {
    info!(%combination, "combination start");
    let built = TestbenchBuilder::new()
        .bench(config.bench.clone())
        .time_unit(config.time_unit)
        .clock_periods(combination.period_a, combination.period_b)
        .pacing(combination.initiator, combination.target)
        .pacing_base(config.pacing_base.clone())
        .seed(combination.seed)
        .build();
    let mut bench = match built {
        Ok(bench) => bench,
        Err(e) => {
            warn!(%combination, error = %e, "combination could not be built");
            let stats = LinkStats::default();
            return CombinationResult::new(combination, Err(e), SimTime::ZERO, &stats);
        }
    };

    let settle = config.time(config.bench.settle_time);
    let result = bench
        .reset()
        .and_then(|()| TransactionDriver::new(settle).run(&mut bench));

    let report = CombinationResult::new(combination, result, bench.now(), bench.channel_stats());
    match &report.error {
        None => info!(%combination, end = %report.end_time, "combination passed"),
        Some(e) => {
            warn!(%combination, outcome = %report.outcome, error = %e, "combination failed");
        }
    }
    report
}

/// Validates `config` and runs every combination.
///
/// # Errors
///
/// Returns a configuration error before any simulation if `config` is invalid. Failures of
/// individual combinations are reported in the [`MatrixReport`], not as errors.
pub fn run_matrix(config: &MatrixConfig) -> Result<MatrixReport> {
    config.validate()?;
    let combos = combinations(config);
    info!(count = combos.len(), seed = config.seed, "matrix start");
    let report = MatrixReport {
        seed: config.seed,
        results: combos
            .into_iter()
            .map(|c| run_combination(config, c))
            .collect(),
    };
    info!(
        passed = report.count(Outcome::Pass),
        total = report.results.len(),
        "matrix finished"
    );
    Ok(report)
}
