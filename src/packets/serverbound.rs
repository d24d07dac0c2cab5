//! Serverbound packet payloads
//!
//! Serverbound packets are requests, so they carry no success envelope and
//! most of them carry no fields at all beyond the version varint. The one
//! exception is [`RegisterPacket`], the subscription handshake.

use std::collections::{HashMap, HashSet};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::protocol::{
    PacketReader, PacketWriter, ProtocolError, ProtocolResult, MAX_IDENTIFIERS,
};

use super::VersionedPacket;

/// Resolves a set of wanted event names to the versions to subscribe at.
///
/// The dispatch registry implements this by reporting the highest clientbound
/// version it has a codec for; tests and embedders can supply their own.
pub trait EventVersionResolver {
    fn event_versions(&self, wanted: &HashSet<String>) -> HashMap<String, u32>;
}

/// Subscribes the sender to server events, advertising per event name the
/// maximum version it can parse.
///
/// Bounded to [`MAX_IDENTIFIERS`] entries; construction and decode both
/// reject oversized maps outright rather than truncating them, so no
/// subscription is ever silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterPacket {
    pub version: u32,
    pub subscribed_events: HashMap<String, u32>,
}

impl VersionedPacket for RegisterPacket {
    const CURRENT_VERSION: u32 = 1;

    fn version(&self) -> u32 {
        self.version
    }
}

impl RegisterPacket {
    /// Build a register packet from the wanted event names.
    ///
    /// The packet's own version is fixed and independent of the versions of
    /// the events it references.
    pub fn create(
        resolver: &impl EventVersionResolver,
        wanted: &HashSet<String>,
    ) -> ProtocolResult<Self> {
        let subscribed_events = resolver.event_versions(wanted);

        if subscribed_events.len() > MAX_IDENTIFIERS {
            return Err(ProtocolError::TooManyIdentifiers(subscribed_events.len()));
        }

        Ok(Self {
            version: Self::CURRENT_VERSION,
            subscribed_events,
        })
    }

    pub fn read(reader: &mut PacketReader) -> ProtocolResult<Self> {
        let version = reader.id;
        let count = reader.read_varint()? as usize;

        if count > MAX_IDENTIFIERS {
            return Err(ProtocolError::TooManyIdentifiers(count));
        }

        let mut subscribed_events = HashMap::with_capacity(count);
        for _ in 0..count {
            let event = reader.read_string()?;
            let event_version = reader.read_varint()?;
            subscribed_events.insert(event, event_version);
        }

        Ok(Self {
            version,
            subscribed_events,
        })
    }

    pub fn write(&self) -> Bytes {
        let mut writer = PacketWriter::new(Self::CURRENT_VERSION);
        writer.write_varint(self.subscribed_events.len() as u32);
        for (event, version) in &self.subscribed_events {
            writer.write_string(event).write_varint(*version);
        }
        writer.into_bytes()
    }
}

/// Asks the server for a ping response. Carries no fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingRequest {
    pub version: u32,
}

impl VersionedPacket for PingRequest {
    const CURRENT_VERSION: u32 = 1;

    fn version(&self) -> u32 {
        self.version
    }
}

impl PingRequest {
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
        }
    }

    pub fn read(reader: &mut PacketReader) -> ProtocolResult<Self> {
        Ok(Self { version: reader.id })
    }

    pub fn write(&self) -> Bytes {
        PacketWriter::new(Self::CURRENT_VERSION).into_bytes()
    }
}

impl Default for PingRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// Asks the server for the player's rank information. Carries no fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfoRequest {
    pub version: u32,
}

impl VersionedPacket for PlayerInfoRequest {
    const CURRENT_VERSION: u32 = 1;

    fn version(&self) -> u32 {
        self.version
    }
}

impl PlayerInfoRequest {
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
        }
    }

    pub fn read(reader: &mut PacketReader) -> ProtocolResult<Self> {
        Ok(Self { version: reader.id })
    }

    pub fn write(&self) -> Bytes {
        PacketWriter::new(Self::CURRENT_VERSION).into_bytes()
    }
}

impl Default for PlayerInfoRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// Asks the server for the player's party composition. Carries no fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyInfoRequest {
    pub version: u32,
}

impl VersionedPacket for PartyInfoRequest {
    const CURRENT_VERSION: u32 = 2;

    fn version(&self) -> u32 {
        self.version
    }
}

impl PartyInfoRequest {
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
        }
    }

    pub fn read(reader: &mut PacketReader) -> ProtocolResult<Self> {
        Ok(Self { version: reader.id })
    }

    pub fn write(&self) -> Bytes {
        PacketWriter::new(Self::CURRENT_VERSION).into_bytes()
    }
}

impl Default for PartyInfoRequest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedResolver(HashMap<String, u32>);

    impl EventVersionResolver for FixedResolver {
        fn event_versions(&self, wanted: &HashSet<String>) -> HashMap<String, u32> {
            self.0
                .iter()
                .filter(|(name, _)| wanted.contains(*name))
                .map(|(name, version)| (name.clone(), *version))
                .collect()
        }
    }

    fn resolver_with(names: &[&str]) -> (FixedResolver, HashSet<String>) {
        let map: HashMap<String, u32> =
            names.iter().map(|n| (n.to_string(), 1)).collect();
        let wanted = names.iter().map(|n| n.to_string()).collect();
        (FixedResolver(map), wanted)
    }

    #[test]
    fn test_register_create_at_limit_keeps_all_entries() {
        let (resolver, wanted) = resolver_with(&["a", "b", "c", "d", "e"]);
        let packet = RegisterPacket::create(&resolver, &wanted).unwrap();
        assert_eq!(packet.version, RegisterPacket::CURRENT_VERSION);
        assert_eq!(packet.subscribed_events.len(), 5);
    }

    #[test]
    fn test_register_create_over_limit_fails() {
        let (resolver, wanted) = resolver_with(&["a", "b", "c", "d", "e", "f"]);
        let err = RegisterPacket::create(&resolver, &wanted).unwrap_err();
        assert!(matches!(err, ProtocolError::TooManyIdentifiers(6)));
    }

    #[test]
    fn test_register_roundtrip() {
        let mut subscribed_events = HashMap::new();
        subscribed_events.insert("location".to_string(), 1);
        subscribed_events.insert("party_info".to_string(), 2);

        let packet = RegisterPacket {
            version: 1,
            subscribed_events: subscribed_events.clone(),
        };
        let bytes = packet.write();

        let mut reader = PacketReader::new(&bytes).unwrap();
        let decoded = RegisterPacket::read(&mut reader).unwrap();
        assert_eq!(decoded.subscribed_events, subscribed_events);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_register_read_over_limit_fails() {
        let mut writer = PacketWriter::new(1);
        writer.write_varint(6);
        for i in 0..6 {
            writer.write_string(&format!("event_{i}")).write_varint(1);
        }
        let bytes = writer.into_bytes();

        let mut reader = PacketReader::new(&bytes).unwrap();
        let err = RegisterPacket::read(&mut reader).unwrap_err();
        assert!(matches!(err, ProtocolError::TooManyIdentifiers(6)));
    }

    #[test]
    fn test_empty_requests_are_just_a_version() {
        assert_eq!(&PingRequest::new().write()[..], &[0x01]);
        assert_eq!(&PlayerInfoRequest::new().write()[..], &[0x01]);
        assert_eq!(&PartyInfoRequest::new().write()[..], &[0x02]);
    }
}
