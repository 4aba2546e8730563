//! # Transaction Driver Tests
//!
//! The verification sequence against an instant in-memory bus: ordering of the phases,
//! settle handling, and the exact location reported for a corrupted value.

use mcdc_core::axi::Resp;
use mcdc_core::common::{HarnessError, SimTime};
use mcdc_core::harness::{BusAccess, TransactionDriver, burst_pattern};
use pretty_assertions::assert_eq;

use crate::common::mocks::bus::MockBus;

#[test]
fn full_sequence_leaves_words_over_burst_prefix() {
    let mut bus = MockBus::new(1024);
    TransactionDriver::new(SimTime::from_ns(100)).run(&mut bus).unwrap();

    for i in 0..8u32 {
        let at = (i * 4) as usize;
        assert_eq!(&bus.mem[at..at + 4], &i.to_le_bytes());
    }
    assert_eq!(&bus.mem[32..256], &burst_pattern()[32..]);
    assert_eq!(bus.writes, 1 + 8);
    assert_eq!(bus.reads, 1 + 8);
}

#[test]
fn settles_before_and_after() {
    let mut bus = MockBus::new(1024);
    TransactionDriver::new(SimTime::from_ns(100)).run(&mut bus).unwrap();
    assert_eq!(bus.elapsed, SimTime::from_ns(200));
}

#[test]
fn corrupted_burst_byte_is_located_exactly() {
    let mut bus = MockBus::new(1024).corrupt(0x2A, 0x80);
    let err = TransactionDriver::new(SimTime::ZERO).run(&mut bus).unwrap_err();
    assert_eq!(
        err,
        HarnessError::DataMismatch {
            address: 0x2A,
            index: 0x2A,
            expected: 0x2A,
            actual: 0x2A ^ 0x80,
        }
    );
    // The word phase never started.
    assert_eq!(bus.writes, 1);
}

#[test]
fn corruption_past_the_burst_hits_the_word_phase_only() {
    let mut bus = MockBus::new(1024).corrupt(0x1000, 0xFF);
    assert!(TransactionDriver::new(SimTime::ZERO).run(&mut bus).is_ok());

    // Relocated so the fourth word sits on the corrupted byte.
    let mut bus = MockBus::new(8192).corrupt(0x100C, 0x01);
    let err = TransactionDriver::new(SimTime::ZERO)
        .at(0x1000)
        .word_round_trips(&mut bus)
        .unwrap_err();
    assert_eq!(
        err,
        HarnessError::DataMismatch {
            address: 0x100C,
            index: 3,
            expected: 3,
            actual: 2,
        }
    );
}

#[test]
fn bus_errors_propagate() {
    let mut bus = MockBus::new(128);
    let err = TransactionDriver::new(SimTime::ZERO).run(&mut bus).unwrap_err();
    assert_eq!(
        err,
        HarnessError::BusResponse {
            operation: "write",
            address: 0,
            resp: Resp::DecErr,
        }
    );
}

#[test]
fn word_helpers_are_little_endian() {
    let mut bus = MockBus::new(16);
    bus.write_word(4, 0x1122_3344).unwrap();
    assert_eq!(&bus.mem[4..8], &[0x44, 0x33, 0x22, 0x11]);
    assert_eq!(bus.read_word(4).unwrap(), 0x1122_3344);
}

#[test]
fn sequence_near_address_limit_reports_decerr() {
    let mut bus = MockBus::new(64);
    let err = TransactionDriver::new(SimTime::ZERO)
        .at(u64::MAX - 16)
        .run(&mut bus)
        .unwrap_err();
    assert!(matches!(err, HarnessError::BusResponse { resp: Resp::DecErr, .. }), "{err}");
    assert_eq!(bus.writes, 0);
}
