//! AXI initiator (bus master) model.
//!
//! Operations are split into INCR bursts when submitted and all their beats are queued on
//! the AW/W/AR source queues at once; pacing and the handshakes decide when they leave.
//! A single transaction ID is used, so responses return in issue order and are matched to
//! operations with plain FIFOs.

use std::collections::{BTreeMap, VecDeque};

use tracing::trace;

use super::channel::{BeatSource, BoundedQueue};
use super::types::{AddrBeat, BBeat, RBeat, Resp, WBeat, address_end, plan_bursts, write_beats};

/// Handle returned when an operation is submitted.
pub type OpId = u64;

const TXN_ID: u32 = 0;

/// Result of a finished operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// All write bursts acknowledged; `resp` is the worst response received.
    Write {
        /// Folded write response.
        resp: Resp,
    },
    /// All read bursts returned.
    Read {
        /// Requested bytes, in address order.
        data: Vec<u8>,
        /// Folded read response.
        resp: Resp,
    },
}

#[derive(Debug, Clone)]
struct WriteOp {
    bursts_left: usize,
    resp: Resp,
}

#[derive(Debug, Clone)]
struct ReadSegment {
    lead: usize,
    take: usize,
    beats_left: usize,
    raw: Vec<u8>,
}

#[derive(Debug, Clone)]
struct ReadOp {
    op: OpId,
    segments: VecDeque<ReadSegment>,
    data: Vec<u8>,
    resp: Resp,
}

/// Bus initiator with AW/W/AR source queues and B/R sink queues.
#[derive(Debug, Clone)]
pub struct AxiMaster {
    width: usize,
    next_op: OpId,
    /// Write-address beats waiting for a handshake.
    pub aw: BoundedQueue<AddrBeat>,
    /// Write-data beats waiting for a handshake.
    pub w: BoundedQueue<WBeat>,
    /// Read-address beats waiting for a handshake.
    pub ar: BoundedQueue<AddrBeat>,
    /// Received write responses, drained by [`tick`](Self::tick).
    pub b: BoundedQueue<BBeat>,
    /// Received read beats, drained by [`tick`](Self::tick).
    pub r: BoundedQueue<RBeat>,
    write_bursts: VecDeque<OpId>,
    writes: BTreeMap<OpId, WriteOp>,
    reads: VecDeque<ReadOp>,
    completions: BTreeMap<OpId, Completion>,
}

impl AxiMaster {
    /// Creates an idle initiator for a `width`-byte data bus.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            next_op: 0,
            aw: BoundedQueue::unbounded(),
            w: BoundedQueue::unbounded(),
            ar: BoundedQueue::unbounded(),
            b: BoundedQueue::unbounded(),
            r: BoundedQueue::unbounded(),
            write_bursts: VecDeque::new(),
            writes: BTreeMap::new(),
            reads: VecDeque::new(),
            completions: BTreeMap::new(),
        }
    }

    fn allocate_op(&mut self) -> OpId {
        let op = self.next_op;
        self.next_op += 1;
        op
    }

    /// Queues a write of `data` starting at `addr`.
    ///
    /// A transfer that wraps past the end of the address space completes at once with
    /// [`Resp::DecErr`] and puts nothing on the bus.
    pub fn submit_write(&mut self, addr: u64, data: &[u8]) -> OpId {
        let op = self.allocate_op();
        if address_end(addr, data.len()).is_none() {
            trace!(op, addr, len = data.len(), "write wraps the address space");
            let _ = self.completions.insert(op, Completion::Write { resp: Resp::DecErr });
            return op;
        }
        let segments = plan_bursts(addr, data.len(), self.width);
        if segments.is_empty() {
            let _ = self.completions.insert(op, Completion::Write { resp: Resp::Okay });
            return op;
        }
        for segment in &segments {
            self.aw.push(segment.addr_beat(TXN_ID, self.width));
            for beat in write_beats(segment, data, self.width) {
                self.w.push(beat);
            }
            self.write_bursts.push_back(op);
        }
        let _ = self.writes.insert(
            op,
            WriteOp {
                bursts_left: segments.len(),
                resp: Resp::Okay,
            },
        );
        trace!(op, addr, len = data.len(), bursts = segments.len(), "write queued");
        op
    }

    /// Queues a read of `len` bytes starting at `addr`.
    ///
    /// Wrapping transfers complete at once with [`Resp::DecErr`] and no data.
    pub fn submit_read(&mut self, addr: u64, len: usize) -> OpId {
        let op = self.allocate_op();
        if address_end(addr, len).is_none() {
            trace!(op, addr, len, "read wraps the address space");
            let _ = self.completions.insert(
                op,
                Completion::Read {
                    data: Vec::new(),
                    resp: Resp::DecErr,
                },
            );
            return op;
        }
        let segments = plan_bursts(addr, len, self.width);
        if segments.is_empty() {
            let _ = self.completions.insert(
                op,
                Completion::Read {
                    data: Vec::new(),
                    resp: Resp::Okay,
                },
            );
            return op;
        }
        let mut pending = VecDeque::with_capacity(segments.len());
        for segment in &segments {
            self.ar.push(segment.addr_beat(TXN_ID, self.width));
            pending.push_back(ReadSegment {
                lead: segment.lead(self.width),
                take: segment.bytes.len(),
                beats_left: segment.beats,
                raw: Vec::with_capacity(segment.beats * self.width),
            });
        }
        self.reads.push_back(ReadOp {
            op,
            segments: pending,
            data: Vec::with_capacity(len),
            resp: Resp::Okay,
        });
        trace!(op, addr, len, bursts = segments.len(), "read queued");
        op
    }

    /// Consumes received responses and completes finished operations.
    pub fn tick(&mut self) {
        while let Some(resp) = self.b.pop() {
            self.on_write_response(resp);
        }
        while let Some(beat) = self.r.pop() {
            self.on_read_beat(beat);
        }
    }

    fn on_write_response(&mut self, beat: BBeat) {
        let Some(op) = self.write_bursts.pop_front() else {
            return;
        };
        let Some(write) = self.writes.get_mut(&op) else {
            return;
        };
        write.resp = write.resp.worst(beat.resp);
        write.bursts_left -= 1;
        if write.bursts_left == 0 {
            let resp = write.resp;
            let _ = self.writes.remove(&op);
            let _ = self.completions.insert(op, Completion::Write { resp });
        }
    }

    fn on_read_beat(&mut self, beat: RBeat) {
        let Some(read) = self.reads.front_mut() else {
            return;
        };
        read.resp = read.resp.worst(beat.resp);
        let Some(segment) = read.segments.front_mut() else {
            return;
        };
        segment.raw.extend_from_slice(&beat.data);
        segment.beats_left = segment.beats_left.saturating_sub(1);
        let burst_done = segment.beats_left == 0;
        if burst_done != beat.last {
            read.resp = read.resp.worst(Resp::SlvErr);
        }
        if !burst_done && !beat.last {
            return;
        }
        if let Some(done) = read.segments.pop_front() {
            let start = done.lead.min(done.raw.len());
            let end = (done.lead + done.take).min(done.raw.len());
            read.data.extend_from_slice(&done.raw[start..end]);
        }
        if read.segments.is_empty() {
            if let Some(finished) = self.reads.pop_front() {
                let _ = self.completions.insert(
                    finished.op,
                    Completion::Read {
                        data: finished.data,
                        resp: finished.resp,
                    },
                );
            }
        }
    }

    /// Removes and returns the completion for `op`, if it has finished.
    pub fn take_completion(&mut self, op: OpId) -> Option<Completion> {
        self.completions.remove(&op)
    }

    /// Operations submitted but not yet completed.
    pub fn outstanding(&self) -> usize {
        self.writes.len() + self.reads.len()
    }

    /// Returns `true` when no beats are queued and nothing is outstanding.
    pub fn is_idle(&self) -> bool {
        self.outstanding() == 0 && self.aw.is_empty() && self.w.is_empty() && self.ar.is_empty()
    }
}
