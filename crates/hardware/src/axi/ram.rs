//! AXI memory target model.
//!
//! The target accepts address and data beats into small bounded queues (so sink-side
//! back-pressure is real), retires at most one W beat and produces at most one R beat per
//! cycle, and answers:
//! 1. **OKAY** for in-range INCR bursts.
//! 2. **DECERR** for bursts reaching past the backing store (writes are dropped, reads
//!    return zeros).
//! 3. **SLVERR** for a WLAST that disagrees with the burst length, or an unsupported size.

use tracing::trace;

use super::channel::{BeatSink, BeatSource, BoundedQueue};
use super::types::{AddrBeat, BBeat, RBeat, Resp, WBeat};

const ADDR_QUEUE_DEPTH: usize = 4;
const DATA_QUEUE_DEPTH: usize = 8;
const RESP_QUEUE_DEPTH: usize = 4;

/// Read-path fault: every returned copy of the byte at `address` is XORed with `xor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadFault {
    /// Byte address affected.
    pub address: u64,
    /// Bits flipped on the way out.
    pub xor: u8,
}

#[derive(Debug, Clone)]
struct ActiveBurst {
    beat: AddrBeat,
    index: usize,
    resp: Resp,
}

/// Memory-backed AXI target.
#[derive(Debug, Clone)]
pub struct AxiRam {
    mem: Vec<u8>,
    width: usize,
    /// Incoming write addresses.
    pub aw: BoundedQueue<AddrBeat>,
    /// Incoming write data.
    pub w: BoundedQueue<WBeat>,
    /// Incoming read addresses.
    pub ar: BoundedQueue<AddrBeat>,
    /// Outgoing write responses.
    pub b: BoundedQueue<BBeat>,
    /// Outgoing read data.
    pub r: BoundedQueue<RBeat>,
    write: Option<ActiveBurst>,
    read: Option<ActiveBurst>,
    fault: Option<ReadFault>,
}

impl AxiRam {
    /// Creates a zero-filled target of `size` bytes on a `width`-byte data bus.
    pub fn new(size: usize, width: usize) -> Self {
        Self {
            mem: vec![0; size],
            width,
            aw: BoundedQueue::new(ADDR_QUEUE_DEPTH),
            w: BoundedQueue::new(DATA_QUEUE_DEPTH),
            ar: BoundedQueue::new(ADDR_QUEUE_DEPTH),
            b: BoundedQueue::new(RESP_QUEUE_DEPTH),
            r: BoundedQueue::new(DATA_QUEUE_DEPTH),
            write: None,
            read: None,
            fault: None,
        }
    }

    /// Backing-store size in bytes.
    pub fn size(&self) -> usize {
        self.mem.len()
    }

    /// Installs (or clears) a read-path fault.
    pub fn set_read_fault(&mut self, fault: Option<ReadFault>) {
        self.fault = fault;
    }

    /// Backdoor read; `None` if the range is out of bounds.
    pub fn peek(&self, addr: u64, len: usize) -> Option<&[u8]> {
        let start = usize::try_from(addr).ok()?;
        self.mem.get(start..start.checked_add(len)?)
    }

    /// Backdoor write; returns `false` (and writes nothing) if out of bounds.
    pub fn poke(&mut self, addr: u64, data: &[u8]) -> bool {
        let Ok(start) = usize::try_from(addr) else {
            return false;
        };
        match self.mem.get_mut(start..start.saturating_add(data.len())) {
            Some(dst) => {
                dst.copy_from_slice(data);
                true
            }
            None => false,
        }
    }

    fn classify(&self, beat: &AddrBeat) -> Resp {
        if beat.beat_bytes() != self.width {
            Resp::SlvErr
        } else if beat.end() > self.mem.len() as u64 {
            Resp::DecErr
        } else {
            Resp::Okay
        }
    }

    /// Advances both engines by one cycle of the target clock.
    pub fn tick(&mut self) {
        self.tick_write();
        self.tick_read();
    }

    fn tick_write(&mut self) {
        if self.write.is_none() {
            if let Some(beat) = self.aw.pop() {
                let resp = self.classify(&beat);
                self.write = Some(ActiveBurst {
                    beat,
                    index: 0,
                    resp,
                });
            }
        }
        let Some(active) = self.write.as_mut() else {
            return;
        };
        let final_beat = active.index + 1 == active.beat.beats();
        if final_beat && !self.b.can_accept() {
            return;
        }
        let Some(data) = self.w.pop() else {
            return;
        };
        if data.last != final_beat {
            active.resp = active.resp.worst(Resp::SlvErr);
        }
        if active.resp.is_ok() {
            let base = active.beat.beat_base(active.index) as usize;
            for (lane, byte) in data.data.iter().enumerate().take(self.width) {
                if data.strb & (1 << lane) != 0 {
                    self.mem[base + lane] = *byte;
                }
            }
        }
        active.index += 1;
        if final_beat {
            let id = active.beat.id;
            let resp = active.resp;
            trace!(
                addr = active.beat.addr,
                beats = active.beat.beats(),
                %resp,
                "write burst retired"
            );
            self.write = None;
            self.b.accept(BBeat { id, resp });
        }
    }

    fn tick_read(&mut self) {
        if self.read.is_none() {
            if let Some(beat) = self.ar.pop() {
                let resp = self.classify(&beat);
                self.read = Some(ActiveBurst {
                    beat,
                    index: 0,
                    resp,
                });
            }
        }
        if !self.r.can_accept() {
            return;
        }
        let Some(active) = self.read.as_mut() else {
            return;
        };
        let base = active.beat.beat_base(active.index);
        let mut data = vec![0u8; self.width];
        if active.resp.is_ok() {
            let start = base as usize;
            data.copy_from_slice(&self.mem[start..start + self.width]);
            if let Some(fault) = self.fault {
                if (base..base + self.width as u64).contains(&fault.address) {
                    data[(fault.address - base) as usize] ^= fault.xor;
                }
            }
        }
        let last = active.index + 1 == active.beat.beats();
        let beat = RBeat {
            id: active.beat.id,
            data,
            resp: active.resp,
            last,
        };
        active.index += 1;
        if last {
            trace!(addr = active.beat.addr, beats = active.beat.beats(), "read burst retired");
            self.read = None;
        }
        self.r.accept(beat);
    }

    /// Returns `true` when no burst is active and all queues are empty.
    pub fn is_idle(&self) -> bool {
        self.write.is_none()
            && self.read.is_none()
            && self.aw.is_empty()
            && self.w.is_empty()
            && self.ar.is_empty()
            && self.b.is_empty()
            && self.r.is_empty()
    }
}
