//! Conformance harness: testbench, verification driver, matrix runner and reporting.

/// Per-combination testbench and its builder.
pub mod bench;
/// Fixed write/read/compare sequence.
pub mod driver;
/// Cross-product generation and execution.
pub mod matrix;
/// Outcome classification and matrix report.
pub mod report;

pub use bench::{LinkStats, Testbench, TestbenchBuilder};
pub use driver::{TransactionDriver, TransactionRecord, burst_pattern};
pub use matrix::{TestCombination, combinations, run_combination, run_matrix};
pub use report::{CombinationResult, LinkReport, MatrixReport, Outcome};

use crate::common::constants::WORD_BYTES;
use crate::common::{Result, SimTime};

/// Byte-level access to a bus, as seen by the transaction driver.
///
/// Every call blocks in simulated time until the operation completes. Word accesses are
/// little-endian, [`WORD_BYTES`] wide.
pub trait BusAccess {
    /// Writes `data` starting at `addr`.
    ///
    /// # Errors
    ///
    /// Returns a timeout or bus-response error if the write does not complete cleanly.
    fn write(&mut self, addr: u64, data: &[u8]) -> Result<()>;

    /// Reads `len` bytes starting at `addr`.
    ///
    /// # Errors
    ///
    /// Returns a timeout or bus-response error if the read does not complete cleanly.
    fn read(&mut self, addr: u64, len: usize) -> Result<Vec<u8>>;

    /// Lets `duration` of simulated time pass.
    ///
    /// # Errors
    ///
    /// Implementations may fail if time cannot advance.
    fn wait(&mut self, duration: SimTime) -> Result<()>;

    /// Writes one little-endian word.
    ///
    /// # Errors
    ///
    /// As for [`write`](Self::write).
    fn write_word(&mut self, addr: u64, value: u32) -> Result<()> {
        self.write(addr, &value.to_le_bytes())
    }

    /// Reads one little-endian word; missing bytes read as zero.
    ///
    /// # Errors
    ///
    /// As for [`read`](Self::read).
    fn read_word(&mut self, addr: u64) -> Result<u32> {
        let bytes = self.read(addr, WORD_BYTES)?;
        let mut word = [0u8; WORD_BYTES];
        for (dst, src) in word.iter_mut().zip(&bytes) {
            *dst = *src;
        }
        Ok(u32::from_le_bytes(word))
    }
}
