//! # Simulation Kernel and Reset Tests
//!
//! Edge ordering in the two-clock kernel, reset sequencing rules, and the release-order
//! guarantee across arbitrary clock periods.

use mcdc_core::common::{HarnessError, SimTime, TimeUnit};
use mcdc_core::config::BenchConfig;
use mcdc_core::harness::TestbenchBuilder;
use mcdc_core::sim::{
    ClockSource, Domain, ResetPhase, ResetSequencer, SimKernel, verify_release_order,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn ns(n: u64) -> SimTime {
    SimTime::from_ns(n)
}

#[test]
fn coincident_edges_report_a_first() {
    let mut k = SimKernel::with_periods(ns(10), ns(20));
    let _ = k.step();
    let event = k.step().unwrap();
    assert_eq!(event.time, ns(20));
    assert!(event.a && event.b);
    assert_eq!(event.domains().collect::<Vec<_>>(), vec![Domain::A, Domain::B]);
}

#[test]
fn step_until_stops_at_deadline() {
    let mut k = SimKernel::with_periods(ns(10), ns(30));
    assert!(k.step_until(ns(5)).is_none());
    assert_eq!(k.now(), ns(5));
    assert_eq!(k.step_until(ns(10)).map(|e| e.time), Some(ns(10)));
    assert_eq!(k.clock(Domain::A).edges(), 1);
}

#[test]
fn zero_period_clock_is_stopped() {
    assert!(ClockSource::new(SimTime::ZERO).is_stopped());
    assert_eq!(ClockSource::new(ns(10)).next_edge(), Some(ns(10)));
}

#[test]
fn time_units_convert_to_picoseconds() {
    assert_eq!(SimTime::from_unit(3, TimeUnit::Us).as_ps(), 3_000_000);
    assert_eq!(SimTime::from_unit(7, TimeUnit::Ps).as_ps(), 7);
    assert_eq!(ns(20).to_string(), "20ns");
}

#[test]
fn b_waits_for_a_even_when_faster() {
    let mut seq = ResetSequencer::new(2, ns(50), ns(10));
    let mut t = 0;
    // Ten B edges while A has not ticked at all.
    for _ in 0..10 {
        t += 10;
        let _ = seq.on_edge(Domain::B, ns(t));
    }
    assert_eq!(seq.phase(Domain::B), ResetPhase::Asserted);

    for n in 1..=3 {
        let _ = seq.on_edge(Domain::A, ns(50 * n));
    }
    assert!(seq.is_released(Domain::A));
    assert_eq!(seq.pending_domain(), Some(Domain::B));

    // B already met its hold: one edge to Releasing, one more to Released.
    let _ = seq.on_edge(Domain::B, ns(160));
    assert_eq!(seq.phase(Domain::B), ResetPhase::Releasing);
    let _ = seq.on_edge(Domain::B, ns(170));
    assert!(seq.is_done());
    assert!(seq.verify_order().is_ok());
    assert_eq!(seq.released_at(Domain::B), Some(ns(170)));
}

#[test]
fn release_order_check() {
    assert!(verify_release_order(Some(ns(10)), Some(ns(20))).is_ok());
    assert!(verify_release_order(Some(ns(10)), None).is_ok());
    assert_eq!(
        verify_release_order(Some(ns(20)), Some(ns(20))),
        Err(HarnessError::ResetOrderingViolation {
            a_released: Some(ns(20)),
            b_released: ns(20),
        })
    );
    assert!(verify_release_order(None, Some(ns(5))).is_err());
}

#[test]
fn stopped_b_clock_times_out_reset() {
    let mut bench = TestbenchBuilder::new().stop_clock(Domain::B).build().unwrap();
    let err = bench.reset().unwrap_err();
    assert_eq!(
        err,
        HarnessError::ResetTimeout {
            domain: Domain::B,
            waited: ns(BenchConfig::default().reset_timeout),
        }
    );
    assert!(err.is_timeout());
    assert!(bench.sequencer().is_released(Domain::A));
}

#[test]
fn stopped_a_clock_blocks_both_domains() {
    let mut bench = TestbenchBuilder::new().stop_clock(Domain::A).build().unwrap();
    let err = bench.reset().unwrap_err();
    assert!(matches!(err, HarnessError::ResetTimeout { domain: Domain::A, .. }));
    assert!(!bench.sequencer().is_released(Domain::B));
}

#[test]
fn wait_edge_on_stopped_clock_is_bounded() {
    let mut bench = TestbenchBuilder::new().stop_clock(Domain::B).build().unwrap();
    assert!(bench.wait_edge(Domain::A).is_ok());
    let err = bench.wait_edge(Domain::B).unwrap_err();
    assert_eq!(
        err,
        HarnessError::ClockStalled {
            domain: Domain::B,
            waited: ns(BenchConfig::default().handshake_timeout),
        }
    );
    assert_eq!(err.kind(), "ClockStalled");
    assert!(err.is_timeout());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn b_always_released_strictly_after_a(
        period_a in 1u64..60,
        period_b in 1u64..60,
        hold in 1u32..16,
    ) {
        let bench_config = BenchConfig {
            reset_hold_edges: hold,
            ..BenchConfig::default()
        };
        let mut bench = TestbenchBuilder::new()
            .periods(period_a, period_b)
            .bench(bench_config)
            .build()
            .unwrap();
        bench.reset().unwrap();

        let seq = bench.sequencer();
        let a = seq.released_at(Domain::A).unwrap();
        let b = seq.released_at(Domain::B).unwrap();
        prop_assert!(b > a);
        // A holds for `hold` edges, then releases on the next one.
        prop_assert_eq!(a, ns(period_a * (u64::from(hold) + 1)));
        prop_assert!(seq.state(Domain::B).asserted_edges >= hold);
    }
}
