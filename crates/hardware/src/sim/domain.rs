//! Clock domains and their per-domain state.

use std::fmt;

use serde::Serialize;

use crate::common::SimTime;

/// One of the two independently clocked regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Domain {
    /// Initiator-side clock (`axis_aclk`-style).
    A,
    /// Target-side clock (`axim_aclk`-style).
    B,
}

impl Domain {
    /// Both domains, A first; also the evaluation order on coincident edges.
    pub const ALL: [Self; 2] = [Self::A, Self::B];

    /// Dense index (A = 0, B = 1).
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// Reset line state of one domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ResetPhase {
    /// Reset held active.
    #[default]
    Asserted,
    /// Hold requirement met; reset drops on the next edge of the domain's own clock.
    Releasing,
    /// Reset de-asserted; logic in the domain runs.
    Released,
}

/// Book-keeping for one domain during and after reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainState {
    /// Clock period of the domain.
    pub period: SimTime,
    /// Current reset phase.
    pub phase: ResetPhase,
    /// Rising edges seen since time zero.
    pub cycles: u64,
    /// Rising edges seen while reset was asserted.
    pub asserted_edges: u32,
    /// Time at which reset was de-asserted.
    pub released_at: Option<SimTime>,
}

impl DomainState {
    /// Fresh state: reset asserted, no edges seen.
    pub const fn new(period: SimTime) -> Self {
        Self {
            period,
            phase: ResetPhase::Asserted,
            cycles: 0,
            asserted_edges: 0,
            released_at: None,
        }
    }

    /// Returns `true` once reset has been de-asserted.
    pub fn is_released(&self) -> bool {
        self.phase == ResetPhase::Released
    }
}
