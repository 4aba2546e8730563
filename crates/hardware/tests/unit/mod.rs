//! # Unit Components
//!
//! Tests for each harness component, leaves first.


/// Configuration parsing, defaults and validation.
pub mod config;

/// Transaction driver against the mock bus.
pub mod driver;

/// Matrix generation, execution and reporting.
pub mod matrix;


/// Clock kernel and reset sequencing.
pub mod sim;

/// End-to-end testbench scenarios.
pub mod scenarios;
