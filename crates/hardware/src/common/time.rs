//! Simulation time types.
//!
//! This module defines a strong type for simulated time so that configuration values
//! (expressed in a user-chosen unit) cannot be mixed with raw kernel timestamps. It provides:
//! 1. **Resolution:** All kernel time is kept in integer picoseconds.
//! 2. **Units:** `TimeUnit` converts configuration values (ps, ns, us) to kernel time.
//! 3. **Arithmetic:** Saturating helpers used by the kernel and bounded waits.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unit in which configuration time values (clock periods, settle intervals, timeouts) are given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Picoseconds.
    Ps,
    /// Nanoseconds.
    #[default]
    Ns,
    /// Microseconds.
    Us,
}

impl TimeUnit {
    /// Number of picoseconds in one of this unit.
    pub const fn picoseconds(self) -> u64 {
        match self {
            Self::Ps => 1,
            Self::Ns => 1_000,
            Self::Us => 1_000_000,
        }
    }

    /// Short suffix used when printing values in this unit.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Ps => "ps",
            Self::Ns => "ns",
            Self::Us => "us",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// An absolute point (or a span) of simulated time, in picoseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTime(pub u64);

impl SimTime {
    /// Time zero; every simulation starts here.
    pub const ZERO: Self = Self(0);

    /// Builds a time value from a count of `unit`s, saturating on overflow.
    #[inline]
    pub const fn from_unit(value: u64, unit: TimeUnit) -> Self {
        Self(value.saturating_mul(unit.picoseconds()))
    }

    /// Shorthand for nanoseconds.
    #[inline]
    pub const fn from_ns(ns: u64) -> Self {
        Self::from_unit(ns, TimeUnit::Ns)
    }

    /// Returns the raw picosecond count.
    #[inline]
    pub const fn as_ps(self) -> u64 {
        self.0
    }

    /// Returns the value expressed in `unit`, truncating any remainder.
    #[inline]
    pub const fn in_unit(self, unit: TimeUnit) -> u64 {
        self.0 / unit.picoseconds()
    }

    /// Adds a span, saturating at the end of representable time.
    #[inline]
    pub const fn saturating_add(self, span: Self) -> Self {
        Self(self.0.saturating_add(span.0))
    }

    /// Span from `earlier` to `self`, or zero if `earlier` is later.
    #[inline]
    pub const fn saturating_since(self, earlier: Self) -> Self {
        Self(self.0.saturating_sub(earlier.0))
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 1_000 == 0 {
            write!(f, "{}ns", self.0 / 1_000)
        } else {
            write!(f, "{}ps", self.0)
        }
    }
}
