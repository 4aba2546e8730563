//! Free-running clock generators.

use crate::common::SimTime;

/// Periodic clock source producing rising edges at `k * period` for `k >= 1`.
///
/// A stopped source produces no edges; it models a stalled generator for hang tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSource {
    period: SimTime,
    next_edge: SimTime,
    edges: u64,
    stopped: bool,
}

impl ClockSource {
    /// Creates a running clock whose first rising edge occurs one period after time zero.
    ///
    /// A zero period cannot make progress and yields a stopped clock.
    pub const fn new(period: SimTime) -> Self {
        Self {
            period,
            next_edge: period,
            edges: 0,
            stopped: period.as_ps() == 0,
        }
    }

    /// Creates a clock that never ticks.
    pub const fn stopped(period: SimTime) -> Self {
        let mut clock = Self::new(period);
        clock.stopped = true;
        clock
    }

    /// Clock period.
    pub const fn period(&self) -> SimTime {
        self.period
    }

    /// Time of the next rising edge, or `None` while stopped.
    pub const fn next_edge(&self) -> Option<SimTime> {
        if self.stopped {
            None
        } else {
            Some(self.next_edge)
        }
    }

    /// Number of rising edges produced so far.
    pub const fn edges(&self) -> u64 {
        self.edges
    }

    /// Returns `true` if the clock is stopped.
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Consumes the pending edge and schedules the following one.
    pub(crate) const fn fire(&mut self) {
        self.edges += 1;
        self.next_edge = self.next_edge.saturating_add(self.period);
    }
}
