//! Per-channel pacing injectors.
//!
//! Ten independent pacing slots exist per test combination: five AXI channels on each of
//! the initiator and target sides. Each slot owns its own pattern instance and cursor, so
//! channels drift out of phase with each other even when built from the same choice.
//!
//! A slot gates whichever end of the channel its side drives: `valid` on channels the side
//! sources, `ready` on channels it sinks. Its decision is consumed once per clock edge of the
//! side's domain, whether or not a beat is pending.

use std::fmt;

use serde::Serialize;

use super::pattern::{PacingPattern, derive_seed};
use crate::common::Result;
use crate::config::PacingChoice;

/// Bus side a pacing slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Side {
    /// The bus initiator (master), clocked by domain A.
    Initiator,
    /// The memory target (slave), clocked by domain B.
    Target,
}

impl Side {
    /// Both sides, initiator first.
    pub const ALL: [Self; 2] = [Self::Initiator, Self::Target];

    const fn ordinal(self) -> usize {
        match self {
            Self::Initiator => 0,
            Self::Target => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initiator => f.write_str("initiator"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// The five AXI handshake channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Channel {
    /// Write address.
    Aw,
    /// Write data.
    W,
    /// Write response.
    B,
    /// Read address.
    Ar,
    /// Read data.
    R,
}

impl Channel {
    /// All channels in AW, W, B, AR, R order.
    pub const ALL: [Self; 5] = [Self::Aw, Self::W, Self::B, Self::Ar, Self::R];

    /// Returns `true` for channels whose payload travels from initiator to target.
    pub const fn is_request(self) -> bool {
        matches!(self, Self::Aw | Self::W | Self::Ar)
    }

    /// Returns `true` when `side` drives `valid` on this channel (otherwise it drives `ready`).
    pub const fn sourced_by(self, side: Side) -> bool {
        match side {
            Side::Initiator => self.is_request(),
            Side::Target => !self.is_request(),
        }
    }

    const fn ordinal(self) -> usize {
        match self {
            Self::Aw => 0,
            Self::W => 1,
            Self::B => 2,
            Self::Ar => 3,
            Self::R => 4,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Aw => "AW",
            Self::W => "W",
            Self::B => "B",
            Self::Ar => "AR",
            Self::R => "R",
        })
    }
}

/// One of the ten pacing points: a channel seen from one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ChannelId {
    /// Side owning the pacing point.
    pub side: Side,
    /// Channel being paced.
    pub channel: Channel,
}

impl ChannelId {
    /// Total number of pacing points.
    pub const COUNT: usize = 10;

    /// Builds an identifier.
    pub const fn new(side: Side, channel: Channel) -> Self {
        Self { side, channel }
    }

    /// Dense index in `0..COUNT` (initiator channels first).
    pub const fn index(self) -> usize {
        self.side.ordinal() * Channel::ALL.len() + self.channel.ordinal()
    }

    /// Every pacing point in index order.
    pub fn all() -> impl Iterator<Item = Self> {
        Side::ALL
            .into_iter()
            .flat_map(|side| Channel::ALL.into_iter().map(move |ch| Self::new(side, ch)))
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.side, self.channel)
    }
}

/// Decision source for one pacing point.
#[derive(Debug, Clone, Default)]
pub enum PacingSource {
    /// No pattern attached: always advance.
    #[default]
    Unthrottled,
    /// Pattern-gated.
    Pattern(PacingPattern),
}

impl PacingSource {
    /// Next gate decision; `true` lets the endpoint assert its handshake signal.
    #[inline]
    pub fn advance(&mut self) -> bool {
        match self {
            Self::Unthrottled => true,
            Self::Pattern(p) => p.next_decision(),
        }
    }

    /// Returns `true` when a pattern is attached.
    pub const fn is_paced(&self) -> bool {
        matches!(self, Self::Pattern(_))
    }
}

/// Arena of the ten pacing slots, indexed by [`ChannelId`].
#[derive(Debug, Clone, Default)]
pub struct PacingInjectors {
    slots: [PacingSource; ChannelId::COUNT],
}

impl PacingInjectors {
    /// All ten slots unthrottled.
    pub fn unthrottled() -> Self {
        Self::default()
    }

    /// Builds all ten slots from one choice per side.
    ///
    /// Every slot receives its own pattern instance; shuffled slots draw their permutation
    /// from a seed derived from `seed` and the slot index.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a pattern is requested with an empty `base`.
    pub fn from_choices(
        initiator: PacingChoice,
        target: PacingChoice,
        base: &[bool],
        seed: u64,
    ) -> Result<Self> {
        let mut injectors = Self::default();
        for id in ChannelId::all() {
            let choice = match id.side {
                Side::Initiator => initiator,
                Side::Target => target,
            };
            let slot_seed = derive_seed(seed, id.index() as u64);
            injectors.attach(id, choice.build(base, slot_seed)?);
        }
        Ok(injectors)
    }

    /// Associates a pattern (or none) with one pacing point, replacing any previous source.
    pub fn attach(&mut self, id: ChannelId, pattern: Option<PacingPattern>) {
        self.slots[id.index()] = pattern.map_or(PacingSource::Unthrottled, PacingSource::Pattern);
    }

    /// Consumes and returns the next gate decision for `id`.
    #[inline]
    pub fn advance(&mut self, id: ChannelId) -> bool {
        self.slots[id.index()].advance()
    }

    /// Returns `true` when `id` has a pattern attached.
    pub fn is_paced(&self, id: ChannelId) -> bool {
        self.slots[id.index()].is_paced()
    }

    /// Borrow the source for `id`.
    pub fn source(&self, id: ChannelId) -> &PacingSource {
        &self.slots[id.index()]
    }
}
