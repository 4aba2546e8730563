//! Common types used throughout the harness.
//!
//! This module provides the building blocks shared by every other component:
//! 1. **Time:** Picosecond-resolution simulated time and configuration units.
//! 2. **Constants:** AXI burst limits and the reference verification parameters.
//! 3. **Error Handling:** The `HarnessError` taxonomy and `Result` alias.

/// Protocol and verification constants.
pub mod constants;

/// Error types for combination and configuration failures.
pub mod error;

/// Simulated time and time units.
pub mod time;

pub use error::{HarnessError, Result};
pub use time::{SimTime, TimeUnit};
