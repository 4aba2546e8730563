//! Clock, time and reset infrastructure.
//!
//! 1. **Clocks:** Free-running (or stopped) periodic rising-edge sources.
//! 2. **Kernel:** Advances time edge by edge across both domains.
//! 3. **Domains:** Per-domain reset phase and cycle counters.
//! 4. **Reset:** The ordered A-then-B reset release state machine.

/// Periodic clock generators.
pub mod clock;

/// Domain identifiers and per-domain state.
pub mod domain;

/// Edge-stepping simulation kernel.
pub mod kernel;

/// Two-domain reset sequencer.
pub mod reset;

pub use clock::ClockSource;
pub use domain::{Domain, DomainState, ResetPhase};
pub use kernel::{EdgeEvent, SimKernel};
pub use reset::{ResetSequencer, ResetTransition, verify_release_order};
