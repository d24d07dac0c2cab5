//! Modwire - Versioned plugin-message wire protocol
//!
//! A codec for the bidirectional, versioned binary messaging protocol carried
//! inside an opaque plugin-message channel between a server and a client mod.
//! Each packet has a stable name, travels in one direction, and is versioned
//! independently so payload layouts can evolve without breaking other packets.
//!
//! The crate is sans-io: every operation is a pure transformation between a
//! byte buffer and a typed packet value. Delivery, ordering, and retries are
//! the transport's problem.
//!
//! Wire format:
//! - Serverbound: `[version varint][fields...]`
//! - Clientbound: `[success byte][version varint][fields...]` on success,
//!   `[0x00][error code varint]` on failure

pub mod packets;
pub mod protocol;
pub mod registry;

pub use packets::{ClientboundPacket, ServerboundPacket, VersionedPacket};
pub use protocol::{CodecError, Direction, PacketError, ProtocolError, ProtocolResult};
pub use registry::{
    write_clientbound_error, write_clientbound_error_code, ClientboundResponse, PacketRegistry,
};
