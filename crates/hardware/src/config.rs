//! Configuration system for the conformance harness.
//!
//! This module defines the structures that parameterize a matrix run. It provides:
//! 1. **Defaults:** Reference clock periods, pacing lists, memory size and timing bounds.
//! 2. **Structures:** `MatrixConfig` (option lists) and `BenchConfig` (per-combination bench).
//! 3. **Enums:** Pacing choices per side.
//!
//! Configuration is supplied as JSON (CLI `--config`) or taken from `MatrixConfig::default()`.
//! All validation happens in [`MatrixConfig::validate`], before any simulated time advances.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::constants::{
    MAX_FIFO_DEPTH, MAX_RAM_SIZE, MAX_SYNC_STAGES, REFERENCE_PACING,
};
use crate::common::{HarnessError, Result, SimTime, TimeUnit};
use crate::pacing::PacingPattern;

/// Default configuration constants for the harness.
mod defaults {
    /// Clock periods tried for the initiator domain (A), in nanoseconds.
    pub const DOMAIN_A_PERIODS: [u64; 2] = [10, 20];

    /// Clock periods tried for the target domain (B), in nanoseconds.
    pub const DOMAIN_B_PERIODS: [u64; 2] = [10, 20];

    /// Base seed from which every combination and channel seed is derived.
    pub const SEED: u64 = 0x5EED_A11C_0DE5_CDC0;

    /// Target backing-store size (256 KiB).
    pub const RAM_SIZE: usize = 1 << 18;

    /// Bus data width in bytes (32-bit data bus).
    pub const DATA_WIDTH_BYTES: usize = 4;

    /// Entries per clock-crossing FIFO.
    pub const FIFO_DEPTH: usize = 16;

    /// Synchronizer flops per crossing pointer.
    pub const SYNC_STAGES: usize = 2;

    /// Edges a domain holds reset asserted before release.
    pub const RESET_HOLD_EDGES: u32 = 10;

    /// Settle interval before and after the transaction sequence.
    pub const SETTLE_TIME: u64 = 100;

    /// Bound on any single handshake wait.
    pub const HANDSHAKE_TIMEOUT: u64 = 100_000;

    /// Bound on the whole reset sequence.
    pub const RESET_TIMEOUT: u64 = 10_000;
}

/// Pacing applied to all five channels of one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PacingChoice {
    /// No pattern: the side's endpoints advance whenever they can.
    #[default]
    #[serde(alias = "none")]
    None,
    /// The base pattern in fixed order.
    #[serde(alias = "cyclic")]
    Cyclic,
    /// A seeded permutation of the base pattern.
    #[serde(alias = "shuffled")]
    Shuffled,
}

impl PacingChoice {
    /// Instantiates a fresh pattern for one channel, or `None` for unthrottled.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty `base` when a pattern is requested.
    pub fn build(self, base: &[bool], seed: u64) -> Result<Option<PacingPattern>> {
        match self {
            Self::None => Ok(None),
            Self::Cyclic => PacingPattern::cyclic(base).map(Some),
            Self::Shuffled => PacingPattern::shuffled(base, seed).map(Some),
        }
    }
}

impl fmt::Display for PacingChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Cyclic => "cyclic",
            Self::Shuffled => "shuffled",
        })
    }
}

/// Root configuration: the option lists whose cross product forms the matrix.
///
/// # Examples
///
/// ```
/// use mcdc_core::config::{MatrixConfig, PacingChoice};
///
/// let json = r#"{
///     "domain_a_periods": [10],
///     "domain_b_periods": [20],
///     "initiator_pacing": ["Shuffled"],
///     "target_pacing": ["None", "Cyclic"],
///     "bench": { "fifo_depth": 8 }
/// }"#;
///
/// let config = MatrixConfig::from_json_str(json).unwrap();
/// assert_eq!(config.target_pacing, vec![PacingChoice::None, PacingChoice::Cyclic]);
/// assert_eq!(config.bench.fifo_depth, 8);
/// assert_eq!(config.bench.sync_stages, 2);
/// assert_eq!(config.combination_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixConfig {
    /// Clock periods for domain A (initiator side), in `time_unit`.
    #[serde(default = "MatrixConfig::default_domain_a_periods")]
    pub domain_a_periods: Vec<u64>,

    /// Clock periods for domain B (target side), in `time_unit`.
    #[serde(default = "MatrixConfig::default_domain_b_periods")]
    pub domain_b_periods: Vec<u64>,

    /// Unit for every time value in this configuration.
    #[serde(default)]
    pub time_unit: TimeUnit,

    /// Pacing choices for the initiator's five channels.
    #[serde(default = "MatrixConfig::default_initiator_pacing")]
    pub initiator_pacing: Vec<PacingChoice>,

    /// Pacing choices for the target's five channels.
    #[serde(default = "MatrixConfig::default_target_pacing")]
    pub target_pacing: Vec<PacingChoice>,

    /// Base advance/stall sequence used by both pattern variants.
    #[serde(default = "MatrixConfig::default_pacing_base")]
    pub pacing_base: Vec<bool>,

    /// Base seed; combination and channel seeds are derived from it.
    #[serde(default = "MatrixConfig::default_seed")]
    pub seed: u64,

    /// Per-combination testbench parameters.
    #[serde(default)]
    pub bench: BenchConfig,
}

impl MatrixConfig {
    fn default_domain_a_periods() -> Vec<u64> {
        defaults::DOMAIN_A_PERIODS.to_vec()
    }

    fn default_domain_b_periods() -> Vec<u64> {
        defaults::DOMAIN_B_PERIODS.to_vec()
    }

    fn default_initiator_pacing() -> Vec<PacingChoice> {
        vec![
            PacingChoice::Shuffled,
            PacingChoice::None,
            PacingChoice::Cyclic,
        ]
    }

    fn default_target_pacing() -> Vec<PacingChoice> {
        vec![
            PacingChoice::None,
            PacingChoice::Cyclic,
            PacingChoice::Shuffled,
        ]
    }

    fn default_pacing_base() -> Vec<bool> {
        REFERENCE_PACING.to_vec()
    }

    fn default_seed() -> u64 {
        defaults::SEED
    }

    /// Parses a JSON document; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Parse`] for malformed JSON or unknown enum values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| HarnessError::Parse {
            reason: e.to_string(),
        })
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] if the file cannot be read, or a parse error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| HarnessError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&text)
    }

    /// Number of combinations in the cross product.
    pub fn combination_count(&self) -> usize {
        self.domain_a_periods.len()
            * self.domain_b_periods.len()
            * self.initiator_pacing.len()
            * self.target_pacing.len()
    }

    /// Converts a configured time value to kernel time.
    pub const fn time(&self, value: u64) -> SimTime {
        SimTime::from_unit(value, self.time_unit)
    }

    /// Rejects empty option lists, non-positive periods and invalid bench parameters.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Configuration`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let lists = [
            ("domain_a_periods", self.domain_a_periods.is_empty()),
            ("domain_b_periods", self.domain_b_periods.is_empty()),
            ("initiator_pacing", self.initiator_pacing.is_empty()),
            ("target_pacing", self.target_pacing.is_empty()),
        ];
        if let Some((name, _)) = lists.iter().find(|(_, empty)| *empty) {
            return Err(HarnessError::config(format!("option list `{name}` is empty")));
        }
        for (name, periods) in [
            ("domain_a_periods", &self.domain_a_periods),
            ("domain_b_periods", &self.domain_b_periods),
        ] {
            if periods.iter().any(|&p| self.time(p) == SimTime::ZERO) {
                return Err(HarnessError::config(format!(
                    "`{name}` contains a zero period (in {})",
                    self.time_unit
                )));
            }
        }
        let uses_pattern = self
            .initiator_pacing
            .iter()
            .chain(&self.target_pacing)
            .any(|&c| c != PacingChoice::None);
        if uses_pattern && self.pacing_base.is_empty() {
            return Err(HarnessError::config(
                "pacing_base must not be empty when a pattern is selected",
            ));
        }
        self.bench.validate()
    }
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            domain_a_periods: Self::default_domain_a_periods(),
            domain_b_periods: Self::default_domain_b_periods(),
            time_unit: TimeUnit::default(),
            initiator_pacing: Self::default_initiator_pacing(),
            target_pacing: Self::default_target_pacing(),
            pacing_base: Self::default_pacing_base(),
            seed: defaults::SEED,
            bench: BenchConfig::default(),
        }
    }
}

/// Testbench parameters shared by every combination.
///
/// Time values are in the enclosing [`MatrixConfig::time_unit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Target memory size in bytes.
    #[serde(default = "BenchConfig::default_ram_size")]
    pub ram_size: usize,

    /// Bus data width in bytes (power of two, 1..=128).
    #[serde(default = "BenchConfig::default_data_width_bytes")]
    pub data_width_bytes: usize,

    /// Depth of each clock-crossing FIFO.
    #[serde(default = "BenchConfig::default_fifo_depth")]
    pub fifo_depth: usize,

    /// Synchronizer stages on every crossing pointer.
    #[serde(default = "BenchConfig::default_sync_stages")]
    pub sync_stages: usize,

    /// Edges each domain holds reset asserted before release.
    #[serde(default = "BenchConfig::default_reset_hold_edges")]
    pub reset_hold_edges: u32,

    /// Settle interval before and after the transaction sequence.
    #[serde(default = "BenchConfig::default_settle_time")]
    pub settle_time: u64,

    /// Bound on any single awaited transfer.
    #[serde(default = "BenchConfig::default_handshake_timeout")]
    pub handshake_timeout: u64,

    /// Bound on the whole reset sequence.
    #[serde(default = "BenchConfig::default_reset_timeout")]
    pub reset_timeout: u64,
}

impl BenchConfig {
    fn default_ram_size() -> usize {
        defaults::RAM_SIZE
    }

    fn default_data_width_bytes() -> usize {
        defaults::DATA_WIDTH_BYTES
    }

    fn default_fifo_depth() -> usize {
        defaults::FIFO_DEPTH
    }

    fn default_sync_stages() -> usize {
        defaults::SYNC_STAGES
    }

    fn default_reset_hold_edges() -> u32 {
        defaults::RESET_HOLD_EDGES
    }

    fn default_settle_time() -> u64 {
        defaults::SETTLE_TIME
    }

    fn default_handshake_timeout() -> u64 {
        defaults::HANDSHAKE_TIMEOUT
    }

    fn default_reset_timeout() -> u64 {
        defaults::RESET_TIMEOUT
    }

    /// Checks structural constraints on the bench parameters.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Configuration`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.ram_size == 0 || self.ram_size > MAX_RAM_SIZE {
            return Err(HarnessError::config(format!(
                "ram_size must be in 1..={MAX_RAM_SIZE}, got {}",
                self.ram_size
            )));
        }
        if !self.data_width_bytes.is_power_of_two() || self.data_width_bytes > 128 {
            return Err(HarnessError::config(format!(
                "data_width_bytes must be a power of two in 1..=128, got {}",
                self.data_width_bytes
            )));
        }
        if !(2..=MAX_FIFO_DEPTH).contains(&self.fifo_depth) {
            return Err(HarnessError::config(format!(
                "fifo_depth must be in 2..={MAX_FIFO_DEPTH}, got {}",
                self.fifo_depth
            )));
        }
        if !(1..=MAX_SYNC_STAGES).contains(&self.sync_stages) {
            return Err(HarnessError::config(format!(
                "sync_stages must be in 1..={MAX_SYNC_STAGES}, got {}",
                self.sync_stages
            )));
        }
        if self.reset_hold_edges == 0 {
            return Err(HarnessError::config("reset_hold_edges must be at least 1"));
        }
        if self.handshake_timeout == 0 || self.reset_timeout == 0 {
            return Err(HarnessError::config("timeouts must be positive"));
        }
        Ok(())
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            ram_size: defaults::RAM_SIZE,
            data_width_bytes: defaults::DATA_WIDTH_BYTES,
            fifo_depth: defaults::FIFO_DEPTH,
            sync_stages: defaults::SYNC_STAGES,
            reset_hold_edges: defaults::RESET_HOLD_EDGES,
            settle_time: defaults::SETTLE_TIME,
            handshake_timeout: defaults::HANDSHAKE_TIMEOUT,
            reset_timeout: defaults::RESET_TIMEOUT,
        }
    }
}
