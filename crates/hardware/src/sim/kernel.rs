//! Discrete-time kernel driving the two clock domains.
//!
//! The kernel is a single cooperative context: it only ever advances to the next rising
//! edge of either clock. Domains are not assumed phase-aligned or related by any ratio.
//! When both clocks have an edge at the same instant, domain A is reported (and must be
//! evaluated) first, which keeps runs deterministic.

use super::clock::ClockSource;
use super::domain::Domain;
use crate::common::SimTime;

/// Rising edges occurring at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeEvent {
    /// Time of the edge(s).
    pub time: SimTime,
    /// Domain A ticked.
    pub a: bool,
    /// Domain B ticked.
    pub b: bool,
}

impl EdgeEvent {
    /// Returns `true` if `domain` has a rising edge in this event.
    pub const fn ticked(&self, domain: Domain) -> bool {
        match domain {
            Domain::A => self.a,
            Domain::B => self.b,
        }
    }

    /// Domains that ticked, in evaluation order.
    pub fn domains(&self) -> impl Iterator<Item = Domain> + '_ {
        Domain::ALL.into_iter().filter(|&d| self.ticked(d))
    }
}

/// Two-clock simulation kernel.
#[derive(Debug, Clone)]
pub struct SimKernel {
    now: SimTime,
    clocks: [ClockSource; 2],
}

impl SimKernel {
    /// Creates a kernel at time zero with the given clock sources for A and B.
    pub const fn new(clock_a: ClockSource, clock_b: ClockSource) -> Self {
        Self {
            now: SimTime::ZERO,
            clocks: [clock_a, clock_b],
        }
    }

    /// Convenience constructor for two running clocks.
    pub const fn with_periods(period_a: SimTime, period_b: SimTime) -> Self {
        Self::new(ClockSource::new(period_a), ClockSource::new(period_b))
    }

    /// Current simulated time.
    pub const fn now(&self) -> SimTime {
        self.now
    }

    /// Clock source of `domain`.
    pub const fn clock(&self, domain: Domain) -> &ClockSource {
        &self.clocks[domain.index()]
    }

    /// Time of the earliest pending edge across both domains.
    pub fn next_edge(&self) -> Option<SimTime> {
        self.clocks.iter().filter_map(ClockSource::next_edge).min()
    }

    /// Advances to the next rising edge and returns it, or `None` if every clock is stopped.
    pub fn step(&mut self) -> Option<EdgeEvent> {
        let time = self.next_edge()?;
        Some(self.fire_at(time))
    }

    /// Like [`step`](Self::step) but never moves past `deadline`.
    ///
    /// If no edge occurs at or before `deadline`, time moves to `deadline` and `None` is
    /// returned.
    pub fn step_until(&mut self, deadline: SimTime) -> Option<EdgeEvent> {
        match self.next_edge() {
            Some(time) if time <= deadline => Some(self.fire_at(time)),
            _ => {
                self.now = self.now.max(deadline);
                None
            }
        }
    }

    fn fire_at(&mut self, time: SimTime) -> EdgeEvent {
        self.now = time;
        let mut event = EdgeEvent {
            time,
            a: false,
            b: false,
        };
        for domain in Domain::ALL {
            let clock = &mut self.clocks[domain.index()];
            if clock.next_edge() == Some(time) {
                clock.fire();
                match domain {
                    Domain::A => event.a = true,
                    Domain::B => event.b = true,
                }
            }
        }
        event
    }
}
