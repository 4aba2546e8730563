//! # Configuration Tests
//!
//! Defaults, JSON deserialization (including partial documents and files), and validation.

use std::io::Write;

use mcdc_core::common::constants::{MAX_FIFO_DEPTH, MAX_SYNC_STAGES};
use mcdc_core::common::{HarnessError, SimTime, TimeUnit};
use mcdc_core::config::{BenchConfig, MatrixConfig, PacingChoice};
use mcdc_core::harness::{TestbenchBuilder, run_matrix};
use pretty_assertions::assert_eq;

#[test]
fn test_matrix_defaults() {
    let config = MatrixConfig::default();
    assert_eq!(config.domain_a_periods, vec![10, 20]);
    assert_eq!(config.domain_b_periods, vec![10, 20]);
    assert_eq!(config.time_unit, TimeUnit::Ns);
    assert_eq!(
        config.initiator_pacing,
        vec![PacingChoice::Shuffled, PacingChoice::None, PacingChoice::Cyclic]
    );
    assert_eq!(
        config.target_pacing,
        vec![PacingChoice::None, PacingChoice::Cyclic, PacingChoice::Shuffled]
    );
    assert_eq!(config.pacing_base.len(), 14);
    assert!(config.validate().is_ok());
}

#[test]
fn test_bench_defaults() {
    let bench = BenchConfig::default();
    assert_eq!(bench.ram_size, 1 << 18);
    assert_eq!(bench.data_width_bytes, 4);
    assert_eq!(bench.fifo_depth, 16);
    assert_eq!(bench.sync_stages, 2);
    assert_eq!(bench.reset_hold_edges, 10);
    assert_eq!(bench.settle_time, 100);
    assert_eq!(bench.handshake_timeout, 100_000);
    assert_eq!(bench.reset_timeout, 10_000);
}

#[test]
fn test_empty_document_is_default() {
    assert_eq!(MatrixConfig::from_json_str("{}").unwrap(), MatrixConfig::default());
}

#[test]
fn test_partial_document_and_aliases() {
    let config = MatrixConfig::from_json_str(
        r#"{
            "domain_a_periods": [2500],
            "time_unit": "ps",
            "initiator_pacing": ["shuffled", "None"],
            "seed": 7,
            "bench": { "sync_stages": 3 }
        }"#,
    )
    .unwrap();
    assert_eq!(config.time(config.domain_a_periods[0]), SimTime::from_unit(2500, TimeUnit::Ps));
    assert_eq!(config.initiator_pacing, vec![PacingChoice::Shuffled, PacingChoice::None]);
    assert_eq!(config.target_pacing.len(), 3);
    assert_eq!(config.bench.sync_stages, 3);
    assert_eq!(config.bench.fifo_depth, 16);
    assert_eq!(config.seed, 7);
}

#[test]
fn test_serialization_round_trip() {
    let config = MatrixConfig::default();
    let text = serde_json::to_string(&config).unwrap();
    assert_eq!(MatrixConfig::from_json_str(&text).unwrap(), config);
}

#[test]
fn test_unknown_pacing_is_parse_error() {
    let err = MatrixConfig::from_json_str(r#"{ "target_pacing": ["Bursty"] }"#).unwrap_err();
    assert_eq!(err.kind(), "Parse");
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "domain_b_periods": [15, 25] }}"#).unwrap();
    let config = MatrixConfig::from_file(file.path()).unwrap();
    assert_eq!(config.domain_b_periods, vec![15, 25]);
    assert_eq!(config.combination_count(), 2 * 2 * 3 * 3);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = MatrixConfig::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, HarnessError::Io { .. }));
}

fn rejects(config: &MatrixConfig, needle: &str) {
    let err = config.validate().unwrap_err();
    assert_eq!(err.kind(), "Configuration");
    assert!(err.to_string().contains(needle), "{err}");
}

#[test]
fn test_validation_rejects_bad_lists() {
    let mut config = MatrixConfig::default();
    config.domain_b_periods.clear();
    rejects(&config, "domain_b_periods");

    let mut config = MatrixConfig::default();
    config.domain_a_periods = vec![10, 0];
    rejects(&config, "zero period");

    let mut config = MatrixConfig::default();
    config.pacing_base.clear();
    rejects(&config, "pacing_base");
}

#[test]
fn test_empty_base_allowed_without_patterns() {
    let config = MatrixConfig {
        initiator_pacing: vec![PacingChoice::None],
        target_pacing: vec![PacingChoice::None],
        pacing_base: Vec::new(),
        ..MatrixConfig::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_validation_rejects_bad_bench() {
    let cases = [
        BenchConfig { data_width_bytes: 3, ..BenchConfig::default() },
        BenchConfig { fifo_depth: 1, ..BenchConfig::default() },
        BenchConfig { sync_stages: 0, ..BenchConfig::default() },
        BenchConfig { reset_hold_edges: 0, ..BenchConfig::default() },
        BenchConfig { ram_size: 0, ..BenchConfig::default() },
        BenchConfig { handshake_timeout: 0, ..BenchConfig::default() },
        BenchConfig { fifo_depth: usize::MAX, ..BenchConfig::default() },
        BenchConfig { sync_stages: usize::MAX, ..BenchConfig::default() },
        BenchConfig { ram_size: usize::MAX, ..BenchConfig::default() },
    ];
    for bench in cases {
        let config = MatrixConfig {
            bench: bench.clone(),
            ..MatrixConfig::default()
        };
        assert!(config.validate().is_err(), "{bench:?}");
    }
}

#[test]
fn test_oversized_bench_never_reaches_simulation() {
    let config = MatrixConfig {
        bench: BenchConfig {
            fifo_depth: usize::MAX,
            ..BenchConfig::default()
        },
        ..MatrixConfig::default()
    };
    let err = run_matrix(&config).unwrap_err();
    assert_eq!(err.kind(), "Configuration");
    assert!(err.to_string().contains("fifo_depth"), "{err}");

    let built = TestbenchBuilder::new()
        .bench(BenchConfig {
            sync_stages: usize::MAX,
            ..BenchConfig::default()
        })
        .build();
    assert!(matches!(built, Err(HarnessError::Configuration { .. })));
}

#[test]
fn test_bench_limits_are_inclusive() {
    let bench = BenchConfig {
        fifo_depth: MAX_FIFO_DEPTH,
        sync_stages: MAX_SYNC_STAGES,
        ..BenchConfig::default()
    };
    assert!(bench.validate().is_ok());
}
