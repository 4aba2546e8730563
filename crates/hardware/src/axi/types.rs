//! AXI beat payloads and burst planning.
//!
//! Only INCR bursts are modeled. Address beats carry the AXI4 encoding (`len` = beats - 1,
//! `size` = log2 of bytes per beat); the first beat of a burst may be unaligned, later beats
//! are aligned to the beat size.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::common::constants::{BURST_BOUNDARY, MAX_BURST_BEATS};

/// Transaction response code (`BRESP` / `RRESP`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub enum Resp {
    /// Normal access success.
    #[default]
    Okay,
    /// Exclusive access success.
    ExOkay,
    /// Target error.
    SlvErr,
    /// Decode error: no target at the address.
    DecErr,
}

impl Resp {
    /// Returns `true` for `Okay` and `ExOkay`.
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Okay | Self::ExOkay)
    }

    /// The more severe of two responses (used to fold multi-burst results).
    pub fn worst(self, other: Self) -> Self {
        self.max(other)
    }
}

impl fmt::Display for Resp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Okay => "OKAY",
            Self::ExOkay => "EXOKAY",
            Self::SlvErr => "SLVERR",
            Self::DecErr => "DECERR",
        })
    }
}

/// Write-address or read-address beat (AW / AR).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddrBeat {
    /// Transaction ID.
    pub id: u32,
    /// Start address (may be unaligned).
    pub addr: u64,
    /// Beats in the burst minus one.
    pub len: u8,
    /// log2 of the bytes per beat.
    pub size: u8,
}

impl AddrBeat {
    /// Number of data beats in the burst.
    pub const fn beats(&self) -> usize {
        self.len as usize + 1
    }

    /// Bytes per beat.
    pub const fn beat_bytes(&self) -> usize {
        1 << self.size
    }

    /// Aligned base address of beat `index`, saturating at the top of the address space.
    pub const fn beat_base(&self, index: usize) -> u64 {
        let bytes = self.beat_bytes() as u64;
        (self.addr & !(bytes - 1)).saturating_add((index as u64).saturating_mul(bytes))
    }

    /// One past the last byte lane address touched by the burst (saturating).
    pub const fn end(&self) -> u64 {
        self.beat_base(self.beats())
    }
}

/// Write-data beat (W).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WBeat {
    /// One byte per lane.
    pub data: Vec<u8>,
    /// Byte-lane strobes, bit `i` enables `data[i]`.
    pub strb: u128,
    /// Last beat of the burst.
    pub last: bool,
}

/// Write-response beat (B).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BBeat {
    /// Transaction ID.
    pub id: u32,
    /// Response code.
    pub resp: Resp,
}

/// Read-data beat (R).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RBeat {
    /// Transaction ID.
    pub id: u32,
    /// One byte per lane.
    pub data: Vec<u8>,
    /// Response code for this beat.
    pub resp: Resp,
    /// Last beat of the burst.
    pub last: bool,
}

/// One burst of a larger transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurstSegment {
    /// First byte address of the segment.
    pub addr: u64,
    /// Beats needed to cover the segment at the bus width.
    pub beats: usize,
    /// Bytes of the original transfer covered, relative to its start.
    pub bytes: Range<usize>,
}

impl BurstSegment {
    /// Address beat for this segment.
    pub const fn addr_beat(&self, id: u32, width: usize) -> AddrBeat {
        AddrBeat {
            id,
            addr: self.addr,
            len: (self.beats - 1) as u8,
            size: width.trailing_zeros() as u8,
        }
    }

    /// Offset of the first transfer byte within the first (aligned) beat.
    pub const fn lead(&self, width: usize) -> usize {
        (self.addr & (width as u64 - 1)) as usize
    }
}

/// Splits a `len`-byte transfer at `addr` into INCR bursts for a `width`-byte bus.
///
/// Bursts are cut at [`MAX_BURST_BEATS`] beats and never cross a [`BURST_BOUNDARY`].
/// `width` must be a power of two. A zero-length transfer yields no bursts. A transfer that
/// would run past the end of the address space is cut at `u64::MAX`; see [`address_end`].
pub fn plan_bursts(addr: u64, len: usize, width: usize) -> Vec<BurstSegment> {
    let w = width as u64;
    let end = addr.saturating_add(len as u64);
    let mut segments = Vec::new();
    let mut cur = addr;
    while cur < end {
        let aligned = cur & !(w - 1);
        let boundary = (cur / BURST_BOUNDARY + 1).saturating_mul(BURST_BOUNDARY);
        let seg_end = end
            .min(boundary)
            .min(aligned.saturating_add(MAX_BURST_BEATS as u64 * w));
        let beats = (seg_end - aligned).div_ceil(w) as usize;
        segments.push(BurstSegment {
            addr: cur,
            beats,
            bytes: (cur - addr) as usize..(seg_end - addr) as usize,
        });
        cur = seg_end;
    }
    segments
}

/// One past the last byte of a `len`-byte transfer at `addr`, or `None` if the transfer does
/// not fit below the end of the 64-bit address space.
pub const fn address_end(addr: u64, len: usize) -> Option<u64> {
    addr.checked_add(len as u64)
}

/// Builds the W beats carrying `data[segment.bytes]` for one segment.
pub fn write_beats(segment: &BurstSegment, data: &[u8], width: usize) -> Vec<WBeat> {
    let payload = &data[segment.bytes.clone()];
    let mut pos = 0;
    let mut lane = segment.lead(width);
    (0..segment.beats)
        .map(|beat| {
            let mut bytes = vec![0u8; width];
            let mut strb = 0u128;
            while lane < width && pos < payload.len() {
                bytes[lane] = payload[pos];
                strb |= 1 << lane;
                lane += 1;
                pos += 1;
            }
            lane = 0;
            WBeat {
                data: bytes,
                strb,
                last: beat + 1 == segment.beats,
            }
        })
        .collect()
}
