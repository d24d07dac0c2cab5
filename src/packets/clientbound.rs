//! Clientbound packet payloads
//!
//! Each payload owns its codec: `read` consumes fields from a reader whose
//! leading version varint is already in `reader.id`, and `write` produces a
//! fresh buffer starting with the codec's own current version. The success
//! byte is not handled here - the registry entry points prepend and strip it.

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::protocol::{
    Environment, MonthlyPackageRank, PackageRank, PacketReader, PacketWriter, PartyRole,
    PlayerRank, ProtocolResult,
};

use super::VersionedPacket;

/// Response to a serverbound ping request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingPacket {
    pub version: u32,
    pub response: String,
}

impl VersionedPacket for PingPacket {
    const CURRENT_VERSION: u32 = 1;

    fn version(&self) -> u32 {
        self.version
    }
}

impl PingPacket {
    pub fn read(reader: &mut PacketReader) -> ProtocolResult<Self> {
        Ok(Self {
            version: reader.id,
            response: reader.read_string()?,
        })
    }

    pub fn write(&self) -> Bytes {
        let mut writer = PacketWriter::new(Self::CURRENT_VERSION);
        writer.write_string(&self.response);
        writer.into_bytes()
    }
}

/// The sender's current location on the network.
///
/// Sent in response to a location request and as an event on server switch.
/// Everything past the server name depends on where the player is; a lobby
/// has no mode or map, limbo has neither type nor lobby name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationPacket {
    pub version: u32,
    pub server_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lobby_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,
}

impl VersionedPacket for LocationPacket {
    const CURRENT_VERSION: u32 = 1;

    fn version(&self) -> u32 {
        self.version
    }
}

impl LocationPacket {
    pub fn read(reader: &mut PacketReader) -> ProtocolResult<Self> {
        Ok(Self {
            version: reader.id,
            server_name: reader.read_string()?,
            server_type: reader.read_optional(PacketReader::read_string)?,
            lobby_name: reader.read_optional(PacketReader::read_string)?,
            mode: reader.read_optional(PacketReader::read_string)?,
            map: reader.read_optional(PacketReader::read_string)?,
        })
    }

    pub fn write(&self) -> Bytes {
        let mut writer = PacketWriter::new(Self::CURRENT_VERSION);
        writer
            .write_string(&self.server_name)
            .write_optional(self.server_type.as_ref(), |w, v| {
                w.write_string(v);
            })
            .write_optional(self.lobby_name.as_ref(), |w, v| {
                w.write_string(v);
            })
            .write_optional(self.mode.as_ref(), |w, v| {
                w.write_string(v);
            })
            .write_optional(self.map.as_ref(), |w, v| {
                w.write_string(v);
            });
        writer.into_bytes()
    }
}

/// Rank information for the requesting player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfoPacket {
    pub version: u32,
    pub player_rank: PlayerRank,
    pub package_rank: PackageRank,
    pub monthly_package_rank: MonthlyPackageRank,
    /// Full chat prefix, only present when it overrides the rank display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl VersionedPacket for PlayerInfoPacket {
    const CURRENT_VERSION: u32 = 1;

    fn version(&self) -> u32 {
        self.version
    }
}

impl PlayerInfoPacket {
    pub fn read(reader: &mut PacketReader) -> ProtocolResult<Self> {
        Ok(Self {
            version: reader.id,
            player_rank: PlayerRank::from_wire_code(reader.read_varint()?)?,
            package_rank: PackageRank::from_wire_code(reader.read_varint()?)?,
            monthly_package_rank: MonthlyPackageRank::from_wire_code(reader.read_varint()?)?,
            prefix: reader.read_optional(PacketReader::read_string)?,
        })
    }

    pub fn write(&self) -> Bytes {
        let mut writer = PacketWriter::new(Self::CURRENT_VERSION);
        writer
            .write_varint(self.player_rank.wire_code())
            .write_varint(self.package_rank.wire_code())
            .write_varint(self.monthly_package_rank.wire_code())
            .write_optional(self.prefix.as_ref(), |w, v| {
                w.write_string(v);
            });
        writer.into_bytes()
    }
}

/// Composition of the requesting player's current party.
///
/// `members` is absent when not in a party; the member list is only on the
/// wire when `in_party` is true. Iteration order of the map is not part of
/// the contract - peers compare membership, not sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyInfoPacket {
    pub version: u32,
    pub in_party: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<HashMap<Uuid, PartyRole>>,
}

impl VersionedPacket for PartyInfoPacket {
    const CURRENT_VERSION: u32 = 2;

    fn version(&self) -> u32 {
        self.version
    }
}

impl PartyInfoPacket {
    pub fn read(reader: &mut PacketReader) -> ProtocolResult<Self> {
        let version = reader.id;
        let in_party = reader.read_bool()?;

        let members = if in_party {
            let count = reader.read_varint()? as usize;
            // the count is untrusted input; let the map grow as members
            // actually parse instead of allocating what the wire claims
            let mut members = HashMap::new();
            for _ in 0..count {
                let uuid = reader.read_uuid()?;
                let role = PartyRole::from_wire_code(reader.read_varint()?)?;
                members.insert(uuid, role);
            }
            Some(members)
        } else {
            None
        };

        Ok(Self {
            version,
            in_party,
            members,
        })
    }

    pub fn write(&self) -> Bytes {
        let mut writer = PacketWriter::new(Self::CURRENT_VERSION);
        writer.write_bool(self.in_party);

        if self.in_party {
            match &self.members {
                Some(members) => {
                    writer.write_varint(members.len() as u32);
                    for (uuid, role) in members {
                        writer.write_uuid(uuid).write_varint(role.wire_code());
                    }
                }
                None => {
                    writer.write_varint(0);
                }
            }
        }

        writer.into_bytes()
    }
}

/// Sent once by the server when the plugin-message channel opens.
///
/// Not versioned and never wrapped in a success envelope: the leading varint
/// is the environment wire code itself, so this packet stays outside the
/// dispatch registry and is read and written directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloPacket {
    pub environment: Environment,
}

impl HelloPacket {
    pub fn read(buffer: &[u8]) -> ProtocolResult<Self> {
        let reader = PacketReader::new(buffer)?;
        Ok(Self {
            environment: Environment::from_wire_code(reader.id)?,
        })
    }

    pub fn write(&self) -> Bytes {
        PacketWriter::new(self.environment.wire_code()).into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ProtocolError;

    fn read_back<T>(
        bytes: &Bytes,
        read: impl FnOnce(&mut PacketReader) -> ProtocolResult<T>,
    ) -> T {
        let mut reader = PacketReader::new(bytes).unwrap();
        read(&mut reader).unwrap()
    }

    #[test]
    fn test_ping_roundtrip() {
        let packet = PingPacket {
            version: 1,
            response: "pong".to_string(),
        };
        let decoded = read_back(&packet.write(), PingPacket::read);
        assert_eq!(decoded, packet);
    }

    #[test]
    fn test_location_roundtrip_all_fields_absent() {
        let packet = LocationPacket {
            version: 1,
            server_name: "limbo".to_string(),
            server_type: None,
            lobby_name: None,
            mode: None,
            map: None,
        };
        let decoded = read_back(&packet.write(), LocationPacket::read);
        assert_eq!(decoded, packet);
        assert!(decoded.server_type.is_none());
    }

    #[test]
    fn test_location_roundtrip_all_fields_present() {
        let packet = LocationPacket {
            version: 1,
            server_name: "mini103M".to_string(),
            server_type: Some("BED_WARS".to_string()),
            lobby_name: Some("bedwarslobby7".to_string()),
            mode: Some("FOURS".to_string()),
            map: Some("Lighthouse".to_string()),
        };
        let decoded = read_back(&packet.write(), LocationPacket::read);
        assert_eq!(decoded, packet);
    }

    #[test]
    fn test_location_roundtrip_mixed_optionals() {
        let packet = LocationPacket {
            version: 1,
            server_name: "lobby42".to_string(),
            server_type: Some("MAIN".to_string()),
            lobby_name: Some("main_lobby_1".to_string()),
            mode: None,
            map: None,
        };
        let decoded = read_back(&packet.write(), LocationPacket::read);
        assert_eq!(decoded, packet);
    }

    #[test]
    fn test_player_info_roundtrip() {
        let packet = PlayerInfoPacket {
            version: 1,
            player_rank: PlayerRank::Normal,
            package_rank: PackageRank::MvpPlus,
            monthly_package_rank: MonthlyPackageRank::Superstar,
            prefix: Some("[OWNER]".to_string()),
        };
        let decoded = read_back(&packet.write(), PlayerInfoPacket::read);
        assert_eq!(decoded, packet);
    }

    #[test]
    fn test_player_info_unknown_rank_code_fails() {
        let mut writer = PacketWriter::new(1);
        writer.write_varint(7).write_varint(1).write_varint(1);
        writer.write_optional(None::<&String>, |w, v| {
            w.write_string(v);
        });
        let bytes = writer.into_bytes();

        let mut reader = PacketReader::new(&bytes).unwrap();
        let err = PlayerInfoPacket::read(&mut reader).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownWireCode { .. }));
    }

    #[test]
    fn test_party_info_not_in_party_has_absent_members() {
        let packet = PartyInfoPacket {
            version: 2,
            in_party: false,
            members: None,
        };
        let bytes = packet.write();
        // version varint + in_party byte, no member count
        assert_eq!(bytes.len(), 2);

        let decoded = read_back(&bytes, PartyInfoPacket::read);
        assert_eq!(decoded.members, None);
    }

    #[test]
    fn test_party_info_roundtrip_preserves_membership() {
        let mut members = HashMap::new();
        members.insert(Uuid::new_v4(), PartyRole::Leader);
        members.insert(Uuid::new_v4(), PartyRole::Member);

        let packet = PartyInfoPacket {
            version: 2,
            in_party: true,
            members: Some(members.clone()),
        };
        let decoded = read_back(&packet.write(), PartyInfoPacket::read);
        assert!(decoded.in_party);
        assert_eq!(decoded.members, Some(members));
    }

    #[test]
    fn test_party_info_huge_member_count_fails() {
        // version 2, in_party, then a count claiming u32::MAX members
        let bytes = [0x02, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x0F];
        let mut reader = PacketReader::new(&bytes).unwrap();
        let err = PartyInfoPacket::read(&mut reader).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::Codec(crate::protocol::CodecError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_hello_roundtrip() {
        let packet = HelloPacket {
            environment: Environment::Beta,
        };
        let bytes = packet.write();
        assert_eq!(&bytes[..], &[0x01]);
        assert_eq!(HelloPacket::read(&bytes).unwrap(), packet);
    }

    #[test]
    fn test_hello_unknown_environment_fails() {
        let err = HelloPacket::read(&[0x09]).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::UnknownWireCode {
                domain: "environment",
                code: 9
            }
        ));
    }
}
