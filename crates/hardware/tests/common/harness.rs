use mcdc_core::config::{BenchConfig, MatrixConfig, PacingChoice};
use mcdc_core::harness::TestbenchBuilder;
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Bench parameters with a short handshake bound, for tests that expect a timeout.
pub fn impatient_bench() -> BenchConfig {
    BenchConfig {
        handshake_timeout: 2_000,
        ..BenchConfig::default()
    }
}

/// Testbench builder for one pacing pair at the reference 10 ns / 20 ns clocks.
pub fn bench_with(initiator: PacingChoice, target: PacingChoice) -> TestbenchBuilder {
    init_tracing();
    TestbenchBuilder::new()
        .periods(10, 20)
        .pacing(initiator, target)
        .seed(0xC0FFEE)
}

/// Single-period matrix over the given pacing lists.
pub fn matrix(initiator: Vec<PacingChoice>, target: Vec<PacingChoice>) -> MatrixConfig {
    init_tracing();
    MatrixConfig {
        domain_a_periods: vec![10],
        domain_b_periods: vec![20],
        initiator_pacing: initiator,
        target_pacing: target,
        ..MatrixConfig::default()
    }
}
