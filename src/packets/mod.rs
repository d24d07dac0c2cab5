//! Packet definitions
//!
//! One module per direction. Every payload implements [`VersionedPacket`]:
//! its first wire field is a version varint, and its codec writes a fixed
//! current version no matter what version an earlier decode returned.
//! Optional fields are presence-flagged on the wire and plain `Option`s in
//! memory; an absent field is never a present-but-empty value.

pub mod clientbound;
pub mod serverbound;

use serde::{Deserialize, Serialize};

/// The shape every versioned payload satisfies.
pub trait VersionedPacket {
    /// The version this packet's codec writes.
    const CURRENT_VERSION: u32;

    /// The version carried by this instance, as decoded or constructed.
    fn version(&self) -> u32;
}

/// All clientbound packets routable through the dispatch registry.
///
/// The `hello` packet is deliberately not here: it carries no version and no
/// success envelope, see [`clientbound::HelloPacket`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientboundPacket {
    Location(clientbound::LocationPacket),
    Ping(clientbound::PingPacket),
    PlayerInfo(clientbound::PlayerInfoPacket),
    PartyInfo(clientbound::PartyInfoPacket),
}

impl ClientboundPacket {
    /// The plugin-message name this payload travels under.
    pub fn name(&self) -> &'static str {
        match self {
            ClientboundPacket::Location(_) => "location",
            ClientboundPacket::Ping(_) => "ping",
            ClientboundPacket::PlayerInfo(_) => "player_info",
            ClientboundPacket::PartyInfo(_) => "party_info",
        }
    }

    pub fn version(&self) -> u32 {
        match self {
            ClientboundPacket::Location(p) => p.version(),
            ClientboundPacket::Ping(p) => p.version(),
            ClientboundPacket::PlayerInfo(p) => p.version(),
            ClientboundPacket::PartyInfo(p) => p.version(),
        }
    }
}

/// All serverbound packets routable through the dispatch registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerboundPacket {
    Register(serverbound::RegisterPacket),
    Ping(serverbound::PingRequest),
    PlayerInfo(serverbound::PlayerInfoRequest),
    PartyInfo(serverbound::PartyInfoRequest),
}

impl ServerboundPacket {
    /// The plugin-message name this payload travels under.
    pub fn name(&self) -> &'static str {
        match self {
            ServerboundPacket::Register(_) => "register",
            ServerboundPacket::Ping(_) => "ping",
            ServerboundPacket::PlayerInfo(_) => "player_info",
            ServerboundPacket::PartyInfo(_) => "party_info",
        }
    }

    pub fn version(&self) -> u32 {
        match self {
            ServerboundPacket::Register(p) => p.version(),
            ServerboundPacket::Ping(p) => p.version(),
            ServerboundPacket::PlayerInfo(p) => p.version(),
            ServerboundPacket::PartyInfo(p) => p.version(),
        }
    }
}
