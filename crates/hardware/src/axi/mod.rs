//! AXI4 bus models: beat payloads, handshake evaluation, the clock-domain-crossing bridge,
//! and the initiator and memory target endpoints.

/// Five-channel asynchronous FIFO bridge between the two clock domains.
pub mod cdc;
/// Beat queues, the valid/ready handshake, and per-channel statistics.
pub mod channel;
/// Bus initiator that turns byte-level operations into bursts.
pub mod master;
/// Memory-backed bus target.
pub mod ram;
/// Beat payloads, response codes, and burst planning.
pub mod types;

pub use cdc::{AsyncFifo, CdcBridge};
pub use channel::{BeatSink, BeatSource, BoundedQueue, ChannelStats, handshake};
pub use master::{AxiMaster, Completion, OpId};
pub use ram::{AxiRam, ReadFault};
pub use types::{
    AddrBeat, BBeat, BurstSegment, RBeat, Resp, WBeat, address_end, plan_bursts, write_beats,
};
