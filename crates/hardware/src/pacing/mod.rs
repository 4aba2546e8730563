//! Flow-control pacing for the ten handshake endpoints.
//!
//! 1. **Patterns:** Cyclic and seeded-shuffled advance/stall sequences.
//! 2. **Injectors:** One independent pacing slot per (side, channel) pair.

/// Per-channel pacing slots and channel identities.
pub mod injector;

/// Advance/stall pattern generators.
pub mod pattern;

pub use injector::{Channel, ChannelId, PacingInjectors, PacingSource, Side};
pub use pattern::{PacingPattern, PatternKind, derive_seed};
