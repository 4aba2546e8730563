//! Pause patterns for handshake pacing.
//!
//! A pattern is an infinite, cyclic sequence of advance/stall decisions. Two variants exist:
//! 1. **Cyclic:** the base sequence, in order, wrapping forever.
//! 2. **Shuffled:** one seeded permutation of the base computed at construction, then cycled.
//!
//! The permutation is never recomputed on wrap, so every window of `len()` consecutive
//! decisions (aligned to the start) holds exactly the base multiset.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::common::{HarnessError, Result};

/// How a pattern's order was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Base sequence in its given order.
    Cyclic,
    /// Seeded permutation of the base sequence.
    Shuffled {
        /// Seed the permutation was drawn with; recorded for reproduction.
        seed: u64,
    },
}

/// Restartable, infinite advance (`true`) / stall (`false`) sequence.
#[derive(Debug, Clone)]
pub struct PacingPattern {
    sequence: Vec<bool>,
    cursor: usize,
    kind: PatternKind,
}

impl PacingPattern {
    /// Creates a pattern that replays `base` in order.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `base` is empty.
    pub fn cyclic(base: &[bool]) -> Result<Self> {
        Self::check_base(base)?;
        Ok(Self {
            sequence: base.to_vec(),
            cursor: 0,
            kind: PatternKind::Cyclic,
        })
    }

    /// Creates a pattern from one seeded permutation of `base`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `base` is empty.
    pub fn shuffled(base: &[bool], seed: u64) -> Result<Self> {
        Self::check_base(base)?;
        let mut sequence = base.to_vec();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        sequence.shuffle(&mut rng);
        Ok(Self {
            sequence,
            cursor: 0,
            kind: PatternKind::Shuffled { seed },
        })
    }

    fn check_base(base: &[bool]) -> Result<()> {
        if base.is_empty() {
            return Err(HarnessError::config(
                "pacing pattern base sequence must not be empty",
            ));
        }
        Ok(())
    }

    /// Returns the next decision and advances the cursor, wrapping at the end.
    #[inline]
    pub fn next_decision(&mut self) -> bool {
        let decision = self.sequence[self.cursor];
        self.cursor += 1;
        if self.cursor == self.sequence.len() {
            self.cursor = 0;
        }
        decision
    }

    /// Rewinds to the first decision; the order itself is kept.
    pub fn restart(&mut self) {
        self.cursor = 0;
    }

    /// The (possibly permuted) sequence being cycled.
    pub fn sequence(&self) -> &[bool] {
        &self.sequence
    }

    /// Number of decisions before the pattern wraps.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Always `false`: construction rejects empty bases.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Number of advance decisions per period.
    pub fn advance_count(&self) -> usize {
        self.sequence.iter().filter(|&&d| d).count()
    }

    /// Number of stall decisions per period.
    pub fn stall_count(&self) -> usize {
        self.sequence.len() - self.advance_count()
    }

    /// Construction variant.
    pub const fn kind(&self) -> PatternKind {
        self.kind
    }
}

impl Iterator for PacingPattern {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        Some(self.next_decision())
    }
}

/// Mixes `salt` into `base` (SplitMix64 finalizer) to give independent per-stream seeds.
pub const fn derive_seed(base: u64, salt: u64) -> u64 {
    let mut z = base ^ salt.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
