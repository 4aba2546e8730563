/// Tracing set-up and pre-configured testbenches and matrices.
pub mod harness;
