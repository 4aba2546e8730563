//! Matrix outcome reporting.
//!
//! One [`CombinationResult`] per tuple, gathered into a [`MatrixReport`] that prints as a
//! fixed-width table and serializes to JSON.

use std::fmt;

use serde::Serialize;

use super::bench::LinkStats;
use super::matrix::TestCombination;
use crate::axi::ChannelStats;
use crate::common::{HarnessError, Result, SimTime};
use crate::pacing::ChannelId;

/// Final classification of one combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// Reset ordered correctly and every value read back intact.
    Pass,
    /// Data mismatch, ordering violation, bus error or bad configuration.
    Fail,
    /// A reset or handshake wait expired.
    Timeout,
}

impl Outcome {
    /// Classifies a run result.
    pub const fn of(result: &Result<()>) -> Self {
        match result {
            Ok(()) => Self::Pass,
            Err(e) if e.is_timeout() => Self::Timeout,
            Err(_) => Self::Fail,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Timeout => "TIMEOUT",
        })
    }
}

/// Statistics for one link, labelled for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    /// Pacing point the link is keyed by.
    pub link: ChannelId,
    /// Handshake counters.
    #[serde(flatten)]
    pub stats: ChannelStats,
}

/// Result of one combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinationResult {
    /// Parameters that were run.
    pub combination: TestCombination,
    /// Classification.
    pub outcome: Outcome,
    /// Failure detail, absent on pass.
    pub error: Option<HarnessError>,
    /// Simulated time when the run ended.
    pub end_time: SimTime,
    /// Handshake counters per link.
    pub channel_stats: Vec<LinkReport>,
}

impl CombinationResult {
    /// Packs a finished run.
    pub fn new(
        combination: TestCombination,
        result: Result<()>,
        end_time: SimTime,
        stats: &LinkStats,
    ) -> Self {
        let outcome = Outcome::of(&result);
        Self {
            combination,
            outcome,
            error: result.err(),
            end_time,
            channel_stats: ChannelId::all()
                .map(|link| LinkReport {
                    link,
                    stats: stats[link.index()],
                })
                .collect(),
        }
    }

    /// Returns `true` for [`Outcome::Pass`].
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Pass
    }

    /// Total completed handshakes across all links.
    pub fn transfers(&self) -> u64 {
        self.channel_stats.iter().map(|l| l.stats.transfers).sum()
    }
}

/// Aggregated matrix results in combination order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatrixReport {
    /// Seed the matrix was run with.
    pub seed: u64,
    /// One entry per combination.
    pub results: Vec<CombinationResult>,
}

impl MatrixReport {
    /// Number of combinations with `outcome`.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    /// Returns `true` if every combination passed.
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(CombinationResult::passed)
    }

    /// Results that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &CombinationResult> {
        self.results.iter().filter(|r| !r.passed())
    }

    /// Pretty-printed JSON rendering.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Encode`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| HarnessError::Encode {
            reason: e.to_string(),
        })
    }

    /// Prints the table to stdout.
    pub fn print(&self) {
        println!("{self}");
    }
}

impl fmt::Display for MatrixReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "AXI CLOCK-CROSSING CONFORMANCE MATRIX (seed {:#x})", self.seed)?;
        writeln!(f, "==========================================================")?;
        writeln!(
            f,
            "{:>4}  {:>8}  {:>8}  {:<9} {:<9} {:<8} {:>12}  {:>9}",
            "#", "clk_a", "clk_b", "init", "target", "result", "end", "beats"
        )?;
        writeln!(f, "----------------------------------------------------------")?;
        for r in &self.results {
            let c = &r.combination;
            writeln!(
                f,
                "{:>4}  {:>8}  {:>8}  {:<9} {:<9} {:<8} {:>12}  {:>9}",
                c.index,
                c.period_a.to_string(),
                c.period_b.to_string(),
                c.initiator.to_string(),
                c.target.to_string(),
                r.outcome.to_string(),
                r.end_time.to_string(),
                r.transfers()
            )?;
            if let Some(error) = &r.error {
                writeln!(f, "      -> {error}")?;
            }
        }
        writeln!(f, "----------------------------------------------------------")?;
        write!(
            f,
            "total {}  pass {}  fail {}  timeout {}",
            self.results.len(),
            self.count(Outcome::Pass),
            self.count(Outcome::Fail),
            self.count(Outcome::Timeout)
        )
    }
}
