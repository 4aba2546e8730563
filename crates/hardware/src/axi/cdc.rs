//! Clock-domain-crossing bridge model.
//!
//! The bridge carries each of the five channels through an asynchronous FIFO. Each FIFO
//! keeps a write pointer owned by the producing domain and a read pointer owned by the
//! consuming domain; each pointer reaches the opposite domain only through a chain of
//! `sync_stages` flops clocked by that domain. Consequently:
//! 1. A beat pushed in one domain becomes visible to the other only after `sync_stages`
//!    of the receiving domain's edges.
//! 2. Freed space becomes visible to the producer only after `sync_stages` producer edges.
//!
//! The bridge's own endpoints are never paced; only the initiator and target are.

use std::collections::VecDeque;

use super::channel::{BeatSink, BeatSource};
use super::types::{AddrBeat, BBeat, RBeat, WBeat};
use crate::sim::Domain;

/// Dual-clock FIFO with synchronized pointers.
#[derive(Debug, Clone)]
pub struct AsyncFifo<T> {
    slots: VecDeque<T>,
    depth: usize,
    wptr: u64,
    rptr: u64,
    /// Write pointer as seen through the reader's synchronizer (last element is the output).
    wptr_sync: Vec<u64>,
    /// Read pointer as seen through the writer's synchronizer.
    rptr_sync: Vec<u64>,
}

impl<T> AsyncFifo<T> {
    /// Creates an empty FIFO of `depth` entries with `sync_stages` flops per pointer crossing.
    pub fn new(depth: usize, sync_stages: usize) -> Self {
        let stages = sync_stages.max(1);
        Self {
            slots: VecDeque::new(),
            depth,
            wptr: 0,
            rptr: 0,
            wptr_sync: vec![0; stages],
            rptr_sync: vec![0; stages],
        }
    }

    fn synced(chain: &[u64]) -> u64 {
        chain.last().copied().unwrap_or(0)
    }

    fn shift(chain: &mut [u64], input: u64) {
        chain.rotate_right(1);
        if let Some(first) = chain.first_mut() {
            *first = input;
        }
    }

    /// Rising edge of the writer's clock: samples the read pointer.
    pub fn clock_writer(&mut self) {
        Self::shift(&mut self.rptr_sync, self.rptr);
    }

    /// Rising edge of the reader's clock: samples the write pointer.
    pub fn clock_reader(&mut self) {
        Self::shift(&mut self.wptr_sync, self.wptr);
    }

    /// Entries the reader can currently see.
    pub fn readable(&self) -> usize {
        (Self::synced(&self.wptr_sync) - self.rptr) as usize
    }

    /// Free entries the writer can currently see.
    pub fn writable(&self) -> usize {
        self.depth - (self.wptr - Self::synced(&self.rptr_sync)) as usize
    }

    /// Entries physically stored, visible or not.
    pub fn occupancy(&self) -> usize {
        self.slots.len()
    }
}

impl<T> BeatSource<T> for AsyncFifo<T> {
    fn peek(&self) -> Option<&T> {
        if self.readable() > 0 {
            self.slots.front()
        } else {
            None
        }
    }

    fn pop(&mut self) -> Option<T> {
        if self.readable() == 0 {
            return None;
        }
        let beat = self.slots.pop_front()?;
        self.rptr += 1;
        Some(beat)
    }
}

impl<T> BeatSink<T> for AsyncFifo<T> {
    fn can_accept(&self) -> bool {
        self.writable() > 0
    }

    fn accept(&mut self, beat: T) {
        self.slots.push_back(beat);
        self.wptr += 1;
    }
}

/// Five-channel AXI clock-domain crossing (domain A = initiator port, domain B = target port).
#[derive(Debug, Clone)]
pub struct CdcBridge {
    /// Write address, A → B.
    pub aw: AsyncFifo<AddrBeat>,
    /// Write data, A → B.
    pub w: AsyncFifo<WBeat>,
    /// Write response, B → A.
    pub b: AsyncFifo<BBeat>,
    /// Read address, A → B.
    pub ar: AsyncFifo<AddrBeat>,
    /// Read data, B → A.
    pub r: AsyncFifo<RBeat>,
}

impl CdcBridge {
    /// Creates a bridge whose five FIFOs share `depth` and `sync_stages`.
    pub fn new(depth: usize, sync_stages: usize) -> Self {
        Self {
            aw: AsyncFifo::new(depth, sync_stages),
            w: AsyncFifo::new(depth, sync_stages),
            b: AsyncFifo::new(depth, sync_stages),
            ar: AsyncFifo::new(depth, sync_stages),
            r: AsyncFifo::new(depth, sync_stages),
        }
    }

    /// Clocks the synchronizers belonging to `domain`; call after the domain's handshakes.
    pub fn clock(&mut self, domain: Domain) {
        match domain {
            Domain::A => {
                self.aw.clock_writer();
                self.w.clock_writer();
                self.ar.clock_writer();
                self.b.clock_reader();
                self.r.clock_reader();
            }
            Domain::B => {
                self.aw.clock_reader();
                self.w.clock_reader();
                self.ar.clock_reader();
                self.b.clock_writer();
                self.r.clock_writer();
            }
        }
    }

    /// Beats stored in the bridge across all channels.
    pub fn in_flight(&self) -> usize {
        self.aw.occupancy()
            + self.w.occupancy()
            + self.b.occupancy()
            + self.ar.occupancy()
            + self.r.occupancy()
    }
}
