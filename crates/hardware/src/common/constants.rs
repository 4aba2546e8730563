//! Protocol constants shared by the AXI model, the CDC bridge and the harness.

/// Maximum number of beats in a single INCR burst (AXI4 `AxLEN` is 8 bits).
pub const MAX_BURST_BEATS: usize = 256;

/// Bursts must not cross this address boundary.
pub const BURST_BOUNDARY: u64 = 4096;

/// Width of a "word" access issued by the transaction driver, in bytes.
pub const WORD_BYTES: usize = 4;

/// Reference pause pattern: 7 advance, 7 stall decisions.
pub const REFERENCE_PACING: [bool; 14] = [
    true, true, false, false, true, false, true, false, true, true, true, false, false, false,
];

/// Length of the burst round-trip pattern (`0..=255`).
pub const BURST_PATTERN_LEN: usize = 256;

/// Number of single-word write/read pairs in the verification sequence.
pub const WORD_ROUND_TRIPS: u32 = 8;

/// Largest target backing store a bench may allocate (1 GiB).
pub const MAX_RAM_SIZE: usize = 1 << 30;

/// Deepest clock-crossing FIFO a bench may configure.
pub const MAX_FIFO_DEPTH: usize = 4096;

/// Longest synchronizer chain a bench may configure.
pub const MAX_SYNC_STAGES: usize = 8;
