//! Transaction and verification sequence.
//!
//! The sequence is fixed: settle, one 256-byte burst written and read back, eight single
//! words written and read back, settle again. Every observed value is checked the moment it
//! is read; the first difference ends the run with [`HarnessError::DataMismatch`].

use tracing::debug;

use super::BusAccess;
use crate::common::constants::{BURST_PATTERN_LEN, WORD_BYTES, WORD_ROUND_TRIPS};
use crate::common::{HarnessError, Result, SimTime};

/// One expected/observed pair.
///
/// Built and checked on the spot; nothing keeps records around after the check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Bus address of the checked byte or word.
    pub address: u64,
    /// Byte offset within the burst, or word number.
    pub index: usize,
    /// Value written.
    pub expected: u64,
    /// Value read back.
    pub actual: u64,
}

impl TransactionRecord {
    /// Passes when the values agree.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::DataMismatch`] carrying this record otherwise.
    pub const fn check(self) -> Result<()> {
        if self.expected == self.actual {
            Ok(())
        } else {
            Err(HarnessError::DataMismatch {
                address: self.address,
                index: self.index,
                expected: self.expected,
                actual: self.actual,
            })
        }
    }
}

/// Bytes `0, 1, .., 255` written by the burst phase.
pub fn burst_pattern() -> Vec<u8> {
    (0..BURST_PATTERN_LEN).map(|i| i as u8).collect()
}

/// Drives the verification sequence against any [`BusAccess`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionDriver {
    settle: SimTime,
    base: u64,
}

impl TransactionDriver {
    /// Driver targeting address 0 with the given settle interval.
    pub const fn new(settle: SimTime) -> Self {
        Self { settle, base: 0 }
    }

    /// Moves the whole sequence to start at `base`.
    #[must_use]
    pub const fn at(mut self, base: u64) -> Self {
        self.base = base;
        self
    }

    /// Runs the full sequence.
    ///
    /// # Errors
    ///
    /// Propagates the first bus, timeout or mismatch error.
    pub fn run<B: BusAccess + ?Sized>(&self, bus: &mut B) -> Result<()> {
        bus.wait(self.settle)?;
        self.burst_round_trip(bus)?;
        self.word_round_trips(bus)?;
        bus.wait(self.settle)
    }

    /// Writes the 256-byte pattern in one burst and compares it byte for byte on read-back.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::DataMismatch`] for the first differing byte (a short read
    /// counts as zeros), or any error from the bus.
    pub fn burst_round_trip<B: BusAccess + ?Sized>(&self, bus: &mut B) -> Result<()> {
        let pattern = burst_pattern();
        bus.write(self.base, &pattern)?;
        debug!(base = self.base, len = pattern.len(), "burst written");
        let observed = bus.read(self.base, pattern.len())?;
        for (index, &expected) in pattern.iter().enumerate() {
            TransactionRecord {
                address: self.base.saturating_add(index as u64),
                index,
                expected: u64::from(expected),
                actual: u64::from(observed.get(index).copied().unwrap_or(0)),
            }
            .check()?;
        }
        debug!(base = self.base, "burst verified");
        Ok(())
    }

    /// Writes word `i` to `base + 4 * i` for eight words, then reads and compares each.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::DataMismatch`] for the first differing word, or any error
    /// from the bus.
    pub fn word_round_trips<B: BusAccess + ?Sized>(&self, bus: &mut B) -> Result<()> {
        for i in 0..WORD_ROUND_TRIPS {
            bus.write_word(self.word_address(i), i)?;
        }
        for i in 0..WORD_ROUND_TRIPS {
            let address = self.word_address(i);
            TransactionRecord {
                address,
                index: i as usize,
                expected: u64::from(i),
                actual: u64::from(bus.read_word(address)?),
            }
            .check()?;
        }
        debug!(base = self.base, words = WORD_ROUND_TRIPS, "words verified");
        Ok(())
    }

    const fn word_address(&self, i: u32) -> u64 {
        self.base.saturating_add(i as u64 * WORD_BYTES as u64)
    }
}
