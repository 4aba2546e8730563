//! Dual-clock AXI crossing conformance harness.
//!
//! This crate stresses an AXI clock-domain crossing with patterned flow control and checks
//! that data survives bit-exact. It provides:
//! 1. **Simulation:** A discrete-time kernel with two free-running clocks and ordered resets.
//! 2. **Pacing:** Cyclic and seeded-shuffle pause patterns, one per channel per side.
//! 3. **Bus models:** AXI beats, valid/ready handshakes, an asynchronous-FIFO bridge, an
//!    initiator and a memory target.
//! 4. **Harness:** A per-combination testbench, the write/read/compare driver, the test
//!    matrix runner and its report.
//!
//! # Examples
//!
//! ```
//! use mcdc_core::config::{MatrixConfig, PacingChoice};
//! use mcdc_core::harness::run_matrix;
//!
//! let config = MatrixConfig {
//!     domain_a_periods: vec![10],
//!     domain_b_periods: vec![20],
//!     initiator_pacing: vec![PacingChoice::Shuffled],
//!     target_pacing: vec![PacingChoice::None],
//!     ..MatrixConfig::default()
//! };
//! let report = run_matrix(&config).unwrap();
//! assert!(report.all_passed());
//! ```

/// AXI beats, handshakes, the clock-crossing bridge and the endpoint models.
pub mod axi;
/// Common types (time, constants, errors).
pub mod common;
/// Matrix and testbench configuration.
pub mod config;
/// Testbench, driver, matrix runner and reporting.
pub mod harness;
/// Pause patterns and per-channel injectors.
pub mod pacing;
/// Clock kernel, domains and reset sequencing.
pub mod sim;

/// Error type returned by every fallible operation.
pub use crate::common::{HarnessError, Result};
/// Root configuration; use `MatrixConfig::default()` or load JSON.
pub use crate::config::MatrixConfig;
/// Runs a validated matrix and returns its report.
pub use crate::harness::{MatrixReport, run_matrix};
