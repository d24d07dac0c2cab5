//! Protocol module - core types shared by every packet
//!
//! Defines the travel direction of a packet, the error type raised by
//! malformed input, and re-exports the primitive codec and the wire enum
//! mappings used by the concrete packet definitions.

mod codec;
mod enums;

pub use codec::*;
pub use enums::*;

use std::fmt;

use thiserror::Error;

/// Maximum number of event identifiers a register packet may carry.
pub const MAX_IDENTIFIERS: usize = 5;

/// The direction a packet travels in.
///
/// Packet names are unique per direction, so a lookup always starts here.
/// The set is fixed; there is no runtime extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Clientbound,
    Serverbound,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Clientbound => write!(f, "clientbound"),
            Direction::Serverbound => write!(f, "serverbound"),
        }
    }
}

/// Protocol errors
///
/// Every variant is a deterministic, local validation failure raised at the
/// call that detected it. Nothing here is retried internally; the caller
/// decides whether to re-request at a lower version or drop the message.
///
/// Server-reported failures (rate limiting, disabled feature, ...) are *not*
/// errors - they decode to a failure envelope, see
/// [`ClientboundResponse`](crate::registry::ClientboundResponse).
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("unknown {domain} wire code: {code}")]
    UnknownWireCode { domain: &'static str, code: u32 },

    #[error("no {direction} packet registered for version {version}")]
    UnknownPacketVersion { direction: Direction, version: u32 },

    #[error("unknown {direction} packet name: {name}")]
    UnknownPacketName { direction: Direction, name: String },

    #[error("register packet cannot contain more than {MAX_IDENTIFIERS} identifiers (got {0})")]
    TooManyIdentifiers(usize),

    #[error("payload is not a {expected} packet")]
    PacketMismatch { expected: &'static str },

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
