//! Harness error definitions.
//!
//! This module defines every failure a test combination can end in. It provides:
//! 1. **Verification failures:** Data mismatches and non-OKAY bus responses.
//! 2. **Sequencing failures:** Reset ordering violations and reset timeouts (stalled clocks).
//! 3. **Liveness failures:** Bounded handshake waits that expired, with the blocked channel,
//!    and awaited clock edges that never came.
//! 4. **Configuration failures:** Rejected before any simulated time advances.
//!
//! Failures are local to one combination; the matrix runner records them and moves on.

use serde::Serialize;
use thiserror::Error;

use super::time::SimTime;
use crate::axi::types::Resp;
use crate::config::PacingChoice;
use crate::pacing::ChannelId;
use crate::sim::Domain;

/// Result alias used across the harness.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Every way a combination (or the matrix set-up) can fail.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind")]
pub enum HarnessError {
    /// An observed value differs from the expected value.
    ///
    /// `index` is the byte offset within a burst, or the word number for single-word checks.
    #[error(
        "data mismatch at address {address:#x} (index {index}): expected {expected:#x}, got {actual:#x}"
    )]
    DataMismatch {
        /// Bus address of the offending byte or word.
        address: u64,
        /// Offset within the transfer (burst) or word number.
        index: usize,
        /// Value that was written.
        expected: u64,
        /// Value that was read back.
        actual: u64,
    },

    /// Domain B left reset at or before domain A.
    #[error("reset ordering violation: domain B released at {b_released}, domain A at {}", show_time(.a_released))]
    ResetOrderingViolation {
        /// Release time of domain A, if it was released at all.
        a_released: Option<SimTime>,
        /// Release time of domain B.
        b_released: SimTime,
    },

    /// A domain never left reset within the configured bound (usually a stopped clock).
    #[error("reset of domain {domain} did not complete within {waited}")]
    ResetTimeout {
        /// Domain still held in reset.
        domain: Domain,
        /// Simulated time spent waiting.
        waited: SimTime,
    },

    /// A domain's clock produced no edge within the bounded wait for one.
    #[error("clock of domain {domain} produced no edge within {waited}")]
    ClockStalled {
        /// Domain whose edge was awaited.
        domain: Domain,
        /// Simulated time spent waiting.
        waited: SimTime,
    },

    /// A transfer did not complete within the bounded handshake wait.
    #[error(
        "handshake timeout during {operation} at {address:#x}: {} blocked (initiator pacing {initiator}, target pacing {target}) after {waited}",
        show_channel(.channel)
    )]
    HandshakeTimeout {
        /// Operation being awaited (`"write"`, `"read"`).
        operation: &'static str,
        /// Start address of the operation.
        address: u64,
        /// Channel that was blocked for the longest stretch, if any.
        channel: Option<ChannelId>,
        /// Pacing choice active on the initiator side.
        initiator: PacingChoice,
        /// Pacing choice active on the target side.
        target: PacingChoice,
        /// Simulated time spent waiting.
        waited: SimTime,
    },

    /// The target answered with an error response.
    #[error("{operation} at {address:#x} returned {resp}")]
    BusResponse {
        /// Operation that failed.
        operation: &'static str,
        /// Start address of the operation.
        address: u64,
        /// Response code received.
        resp: Resp,
    },

    /// Invalid option lists, pattern or bench parameters.
    #[error("configuration error: {reason}")]
    Configuration {
        /// Human-readable description.
        reason: String,
    },

    /// A configuration file could not be read.
    #[error("failed to read {path}: {reason}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error text.
        reason: String,
    },

    /// A configuration document could not be parsed.
    #[error("failed to parse configuration: {reason}")]
    Parse {
        /// Underlying parser error text.
        reason: String,
    },

    /// A report could not be serialized.
    #[error("failed to encode report: {reason}")]
    Encode {
        /// Underlying serializer error text.
        reason: String,
    },
}

impl HarnessError {
    /// Convenience constructor for configuration errors.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Returns `true` for liveness failures (reset, clock or handshake timeouts).
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ResetTimeout { .. } | Self::ClockStalled { .. } | Self::HandshakeTimeout { .. }
        )
    }

    /// Short stable name of the error kind, used in summaries.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DataMismatch { .. } => "DataMismatch",
            Self::ResetOrderingViolation { .. } => "ResetOrderingViolation",
            Self::ResetTimeout { .. } => "ResetTimeout",
            Self::ClockStalled { .. } => "ClockStalled",
            Self::HandshakeTimeout { .. } => "HandshakeTimeout",
            Self::BusResponse { .. } => "BusResponse",
            Self::Configuration { .. } => "Configuration",
            Self::Io { .. } => "Io",
            Self::Parse { .. } => "Parse",
            Self::Encode { .. } => "Encode",
        }
    }
}

fn show_time(time: &Option<SimTime>) -> String {
    time.map_or_else(|| "never".to_owned(), |t| t.to_string())
}

fn show_channel(channel: &Option<ChannelId>) -> String {
    channel.map_or_else(|| "no channel".to_owned(), |c| c.to_string())
}
