//! Valid/ready handshake evaluation.
//!
//! Every AXI channel is modeled as a producer queue, a consumer queue and one handshake per
//! rising edge of the clock both ends share. Each end may be gated by a pacing decision:
//! a gated source does not assert `valid`, a gated sink does not assert `ready`. A beat moves
//! only when both are asserted in the same cycle. Gating never touches the payload.

use std::collections::VecDeque;

use serde::Serialize;

/// Producer end of a channel.
pub trait BeatSource<T> {
    /// Beat that would be presented on the channel this cycle, if any.
    fn peek(&self) -> Option<&T>;
    /// Removes the presented beat after a handshake.
    fn pop(&mut self) -> Option<T>;
}

/// Consumer end of a channel.
pub trait BeatSink<T> {
    /// Returns `true` if the sink has room for a beat this cycle.
    fn can_accept(&self) -> bool;
    /// Stores a beat delivered by a handshake.
    fn accept(&mut self, beat: T);
}

/// FIFO with an optional capacity limit, usable as either end of a channel.
#[derive(Debug, Clone)]
pub struct BoundedQueue<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Creates a queue holding at most `capacity` beats.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            capacity,
        }
    }

    /// Creates a queue without a practical limit.
    pub fn unbounded() -> Self {
        Self::new(usize::MAX)
    }

    /// Appends a beat regardless of capacity (used when an endpoint enqueues its own work).
    pub fn push(&mut self, beat: T) {
        self.items.push_back(beat);
    }

    /// Number of queued beats.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no beats are queued.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> BeatSource<T> for BoundedQueue<T> {
    fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }
}

impl<T> BeatSink<T> for BoundedQueue<T> {
    fn can_accept(&self) -> bool {
        self.items.len() < self.capacity
    }

    fn accept(&mut self, beat: T) {
        self.items.push_back(beat);
    }
}

/// Per-channel activity counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChannelStats {
    /// Completed handshakes.
    pub transfers: u64,
    /// Cycles with `valid` high and `ready` low (back-pressure).
    pub stall_cycles: u64,
    /// Cycles with a beat pending but `valid` withheld by the source's pacing.
    pub held_cycles: u64,
    /// Cycles with nothing to send.
    pub idle_cycles: u64,
    /// Consecutive cycles, up to now, with a pending beat that did not transfer.
    pub blocked_streak: u64,
    /// Longest blocked streak observed.
    pub max_blocked_streak: u64,
}

impl ChannelStats {
    fn record(&mut self, pending: bool, valid: bool, fired: bool) {
        if fired {
            self.transfers += 1;
            self.blocked_streak = 0;
            return;
        }
        if !pending {
            self.idle_cycles += 1;
            self.blocked_streak = 0;
            return;
        }
        if valid {
            self.stall_cycles += 1;
        } else {
            self.held_cycles += 1;
        }
        self.blocked_streak += 1;
        self.max_blocked_streak = self.max_blocked_streak.max(self.blocked_streak);
    }
}

/// Evaluates one cycle of a channel and moves a beat if both ends permit.
///
/// `src_gate` and `dst_gate` are the pacing decisions for this cycle (`true` = advance).
/// Returns `true` if a beat was transferred.
pub fn handshake<T, S, D>(
    src: &mut S,
    src_gate: bool,
    dst: &mut D,
    dst_gate: bool,
    stats: &mut ChannelStats,
) -> bool
where
    S: BeatSource<T> + ?Sized,
    D: BeatSink<T> + ?Sized,
{
    let pending = src.peek().is_some();
    let valid = pending && src_gate;
    let ready = dst.can_accept() && dst_gate;
    let fired = valid && ready;
    if fired {
        if let Some(beat) = src.pop() {
            dst.accept(beat);
        }
    }
    stats.record(pending, valid, fired);
    fired
}
