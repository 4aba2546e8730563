//! Two-domain reset sequencing.
//!
//! Both domains start with reset asserted. Domain A releases first, synchronized to its
//! own clock; domain B may only release strictly after A, synchronized to B's clock:
//!
//! - A: `Asserted` until `hold_edges` A edges have been seen, then `Releasing`; the next A
//!   edge de-asserts reset (`Released`).
//! - B: edges before A's release only count toward B's own hold requirement. Once A is
//!   released and B has held for `hold_edges` edges, B enters `Releasing` and de-asserts on
//!   its next edge, which is necessarily later than A's release.
//!
//! A clock that never ticks hangs the sequence; callers bound it with a timeout.

use tracing::debug;

use super::domain::{Domain, DomainState, ResetPhase};
use crate::common::{HarnessError, Result, SimTime};

/// Phase change produced by an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetTransition {
    /// Domain whose reset line changed phase.
    pub domain: Domain,
    /// New phase.
    pub phase: ResetPhase,
    /// Edge time.
    pub time: SimTime,
}

/// Edge-driven reset state machine for domains A and B.
#[derive(Debug, Clone)]
pub struct ResetSequencer {
    hold_edges: u32,
    domains: [DomainState; 2],
}

impl ResetSequencer {
    /// Creates a sequencer with both resets asserted.
    pub const fn new(hold_edges: u32, period_a: SimTime, period_b: SimTime) -> Self {
        Self {
            hold_edges,
            domains: [DomainState::new(period_a), DomainState::new(period_b)],
        }
    }

    /// Number of edges each domain holds reset before release.
    pub const fn hold_edges(&self) -> u32 {
        self.hold_edges
    }

    /// State of `domain`.
    pub const fn state(&self, domain: Domain) -> &DomainState {
        &self.domains[domain.index()]
    }

    /// Current reset phase of `domain`.
    pub const fn phase(&self, domain: Domain) -> ResetPhase {
        self.domains[domain.index()].phase
    }

    /// Returns `true` when `domain`'s logic is out of reset.
    pub fn is_released(&self, domain: Domain) -> bool {
        self.domains[domain.index()].is_released()
    }

    /// Returns `true` once both domains are released.
    pub fn is_done(&self) -> bool {
        Domain::ALL.iter().all(|&d| self.is_released(d))
    }

    /// First domain (A before B) still held in reset.
    pub fn pending_domain(&self) -> Option<Domain> {
        Domain::ALL.into_iter().find(|&d| !self.is_released(d))
    }

    /// Release time of `domain`, if released.
    pub const fn released_at(&self, domain: Domain) -> Option<SimTime> {
        self.domains[domain.index()].released_at
    }

    /// Reacts to one rising edge of `domain` at `time`.
    ///
    /// Edges of domain B before A's release are not errors; they only count toward B's hold.
    pub fn on_edge(&mut self, domain: Domain, time: SimTime) -> Option<ResetTransition> {
        let a_released = self.is_released(Domain::A);
        let hold = self.hold_edges;
        let state = &mut self.domains[domain.index()];
        state.cycles += 1;

        let next = match state.phase {
            ResetPhase::Asserted => {
                state.asserted_edges = state.asserted_edges.saturating_add(1);
                let upstream_ready = domain == Domain::A || a_released;
                (state.asserted_edges >= hold && upstream_ready).then_some(ResetPhase::Releasing)
            }
            ResetPhase::Releasing => {
                state.released_at = Some(time);
                Some(ResetPhase::Released)
            }
            ResetPhase::Released => None,
        }?;

        state.phase = next;
        debug!(%domain, ?next, %time, edges = state.cycles, "reset phase change");
        Some(ResetTransition {
            domain,
            phase: next,
            time,
        })
    }

    /// Checks that B was released strictly after A.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::ResetOrderingViolation`] if the recorded release times disagree.
    pub fn verify_order(&self) -> Result<()> {
        verify_release_order(self.released_at(Domain::A), self.released_at(Domain::B))
    }
}

/// Checks a pair of observed release times: B, if released, must follow A strictly.
///
/// # Errors
///
/// Returns [`HarnessError::ResetOrderingViolation`] when B is released while A is not, or at
/// or before A's release.
pub fn verify_release_order(a: Option<SimTime>, b: Option<SimTime>) -> Result<()> {
    match (a, b) {
        (_, None) => Ok(()),
        (Some(a_time), Some(b_time)) if b_time > a_time => Ok(()),
        (a_released, Some(b_released)) => Err(HarnessError::ResetOrderingViolation {
            a_released,
            b_released,
        }),
    }
}
