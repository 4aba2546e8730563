//! # Matrix Tests
//!
//! Combination ordering and seeding, failure isolation between combinations, report
//! aggregation, and the reference matrix.

use mcdc_core::common::{HarnessError, SimTime};
use mcdc_core::config::{MatrixConfig, PacingChoice};
use mcdc_core::harness::{Outcome, combinations, run_combination, run_matrix};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::{impatient_bench, init_tracing, matrix};

use PacingChoice::{Cyclic, None as Unpaced, Shuffled};

#[test]
fn iteration_order_is_a_b_initiator_target() {
    let config = MatrixConfig {
        domain_a_periods: vec![10, 20],
        domain_b_periods: vec![30],
        initiator_pacing: vec![Shuffled, Unpaced],
        target_pacing: vec![Cyclic, Shuffled],
        ..MatrixConfig::default()
    };
    let combos = combinations(&config);
    assert_eq!(combos.len(), config.combination_count());
    let keys: Vec<(u64, PacingChoice, PacingChoice)> = combos
        .iter()
        .map(|c| (c.period_a.as_ps() / 1_000, c.initiator, c.target))
        .collect();
    assert_eq!(
        keys,
        vec![
            (10, Shuffled, Cyclic),
            (10, Shuffled, Shuffled),
            (10, Unpaced, Cyclic),
            (10, Unpaced, Shuffled),
            (20, Shuffled, Cyclic),
            (20, Shuffled, Shuffled),
            (20, Unpaced, Cyclic),
            (20, Unpaced, Shuffled),
        ]
    );
    assert!(combos.iter().enumerate().all(|(i, c)| c.index == i));
    assert!(combos.iter().all(|c| c.period_b == SimTime::from_ns(30)));
}

#[test]
fn combination_seeds_are_distinct_and_stable() {
    let config = MatrixConfig::default();
    let a = combinations(&config);
    let b = combinations(&config);
    assert_eq!(a, b);
    let seeds: std::collections::BTreeSet<u64> = a.iter().map(|c| c.seed).collect();
    assert_eq!(seeds.len(), a.len());
}

#[test]
fn reference_matrix_has_36_combinations() {
    assert_eq!(MatrixConfig::default().combination_count(), 36);
}

#[test]
fn reference_matrix_passes() {
    init_tracing();
    let report = run_matrix(&MatrixConfig::default()).unwrap();
    assert_eq!(report.results.len(), 36);
    for result in &report.results {
        assert_eq!(result.outcome, Outcome::Pass, "{}", result.combination);
        assert!(result.error.is_none());
        assert!(result.end_time > SimTime::ZERO);
    }
    assert!(report.all_passed());
}

#[test]
fn failing_combination_does_not_stop_the_matrix() {
    let mut config = matrix(vec![Unpaced], vec![Unpaced, Cyclic, Unpaced]);
    config.pacing_base = vec![false];
    config.bench = impatient_bench();

    let report = run_matrix(&config).unwrap();
    let outcomes: Vec<Outcome> = report.results.iter().map(|r| r.outcome).collect();
    assert_eq!(outcomes, vec![Outcome::Pass, Outcome::Timeout, Outcome::Pass]);
    assert!(!report.all_passed());
    assert_eq!(report.count(Outcome::Timeout), 1);
    assert_eq!(report.failures().count(), 1);
    assert!(matches!(
        report.results[1].error,
        Some(HarnessError::HandshakeTimeout { .. })
    ));
}

#[rstest]
#[case::empty_initiator_list(vec![], vec![Unpaced])]
#[case::empty_target_list(vec![Shuffled], vec![])]
fn invalid_matrix_fails_before_simulation(
    #[case] initiator: Vec<PacingChoice>,
    #[case] target: Vec<PacingChoice>,
) {
    let config = matrix(initiator, target);
    let err = run_matrix(&config).unwrap_err();
    assert_eq!(err.kind(), "Configuration");
}

#[test]
fn rerun_gives_identical_result() {
    let config = matrix(vec![Shuffled], vec![Cyclic]);
    let combo = combinations(&config)[0];
    let first = run_combination(&config, combo);
    let second = run_combination(&config, combo);
    assert_eq!(first, second);
    assert_eq!(first.outcome, Outcome::Pass);
}

#[test]
fn report_renders_table_and_json() {
    let mut config = matrix(vec![Unpaced], vec![Unpaced, Cyclic]);
    config.pacing_base = vec![false];
    config.bench = impatient_bench();
    let report = run_matrix(&config).unwrap();

    let table = report.to_string();
    assert!(table.contains("PASS"));
    assert!(table.contains("TIMEOUT"));
    assert!(table.contains("total 2  pass 1  fail 0  timeout 1"));
    assert!(table.contains("handshake timeout during write"));

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["seed"], config.seed);
    assert_eq!(json["results"][0]["outcome"], "Pass");
    assert_eq!(json["results"][1]["outcome"], "Timeout");
    assert_eq!(json["results"][1]["error"]["kind"], "HandshakeTimeout");
    assert_eq!(json["results"][1]["combination"]["target"], "Cyclic");
    assert_eq!(json["results"][0]["channel_stats"].as_array().unwrap().len(), 10);
}

#[test]
fn error_kinds_map_to_outcomes() {
    let stalled = HarnessError::ClockStalled {
        domain: mcdc_core::sim::Domain::B,
        waited: SimTime::from_ns(5),
    };
    let encode = HarnessError::Encode {
        reason: "key must be a string".to_owned(),
    };
    assert_eq!(Outcome::of(&Err(stalled)), Outcome::Timeout);
    assert_eq!(Outcome::of(&Err(encode.clone())), Outcome::Fail);
    assert_eq!(encode.kind(), "Encode");
    assert!(encode.to_string().starts_with("failed to encode report"));
}
