//! Dispatch registry and envelope entry points
//!
//! A two-level lookup (version, then name) per direction routes a raw buffer
//! to the codec for that exact packet type. The caller never states a
//! version when decoding - the buffer's leading varint picks the codec.
//!
//! Clientbound buffers additionally carry a one-byte success envelope:
//! `[0x01][version varint][fields...]` on success,
//! `[0x00][error code varint]` on failure. Serverbound buffers are bare
//! `[version varint][fields...]` - requests have no failure concept.
//!
//! The registry is built once at startup and never mutated; share it freely
//! across threads.

use std::collections::{HashMap, HashSet};

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::packets::serverbound::EventVersionResolver;
use crate::packets::{clientbound, serverbound, ClientboundPacket, ServerboundPacket};
use crate::protocol::{
    CodecError, Direction, PacketError, PacketReader, PacketWriter, ProtocolError,
    ProtocolResult,
};

const SUCCESS_BYTE: u8 = 1;
const FAILURE_BYTE: u8 = 0;

/// The decode/encode pair registered for one (direction, version, name).
pub struct DispatchEntry<P> {
    /// Reads the payload fields; the version is already in `reader.id`.
    pub read: fn(&mut PacketReader) -> ProtocolResult<P>,
    /// Writes a full body buffer starting with the codec's current version.
    pub write: fn(&P) -> ProtocolResult<Bytes>,
}

/// Version -> name -> codec table for one direction.
struct DirectionTable<P> {
    direction: Direction,
    versions: HashMap<u32, HashMap<&'static str, DispatchEntry<P>>>,
}

impl<P> DirectionTable<P> {
    /// Distinguishes a never-registered name from a version miss: a name
    /// absent at every version is `UnknownPacketName`, anything else is
    /// `UnknownPacketVersion`.
    fn resolve(&self, version: u32, name: &str) -> ProtocolResult<&DispatchEntry<P>> {
        if let Some(entry) = self.versions.get(&version).and_then(|m| m.get(name)) {
            return Ok(entry);
        }
        if self.versions.values().any(|m| m.contains_key(name)) {
            Err(ProtocolError::UnknownPacketVersion {
                direction: self.direction,
                version,
            })
        } else {
            Err(ProtocolError::UnknownPacketName {
                direction: self.direction,
                name: name.to_string(),
            })
        }
    }
}

/// Outcome of decoding a clientbound buffer.
///
/// A failure here is a legitimate server response carried in the envelope,
/// not a decode error; malformed input surfaces as [`ProtocolError`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientboundResponse {
    Success(ClientboundPacket),
    Failure(PacketError),
}

impl ClientboundResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, ClientboundResponse::Success(_))
    }
}

/// The process-wide packet dispatch table.
///
/// Build it once with [`PacketRegistry::new`] and pass it by reference into
/// every decode/encode call. All lookups are read-only.
pub struct PacketRegistry {
    clientbound: DirectionTable<ClientboundPacket>,
    serverbound: DirectionTable<ServerboundPacket>,
}

impl PacketRegistry {
    pub fn new() -> Self {
        let mut clientbound_versions: HashMap<u32, HashMap<_, _>> = HashMap::new();
        clientbound_versions.insert(
            1,
            HashMap::from([
                (
                    "location",
                    DispatchEntry {
                        read: |r| {
                            clientbound::LocationPacket::read(r).map(ClientboundPacket::Location)
                        },
                        write: |p| match p {
                            ClientboundPacket::Location(p) => Ok(p.write()),
                            _ => Err(ProtocolError::PacketMismatch {
                                expected: "location",
                            }),
                        },
                    },
                ),
                (
                    "ping",
                    DispatchEntry {
                        read: |r| {
                            clientbound::PingPacket::read(r).map(ClientboundPacket::Ping)
                        },
                        write: |p| match p {
                            ClientboundPacket::Ping(p) => Ok(p.write()),
                            _ => Err(ProtocolError::PacketMismatch { expected: "ping" }),
                        },
                    },
                ),
                (
                    "player_info",
                    DispatchEntry {
                        read: |r| {
                            clientbound::PlayerInfoPacket::read(r)
                                .map(ClientboundPacket::PlayerInfo)
                        },
                        write: |p| match p {
                            ClientboundPacket::PlayerInfo(p) => Ok(p.write()),
                            _ => Err(ProtocolError::PacketMismatch {
                                expected: "player_info",
                            }),
                        },
                    },
                ),
            ]),
        );
        clientbound_versions.insert(
            2,
            HashMap::from([(
                "party_info",
                DispatchEntry {
                    read: |r| {
                        clientbound::PartyInfoPacket::read(r).map(ClientboundPacket::PartyInfo)
                    },
                    write: |p| match p {
                        ClientboundPacket::PartyInfo(p) => Ok(p.write()),
                        _ => Err(ProtocolError::PacketMismatch {
                            expected: "party_info",
                        }),
                    },
                },
            )]),
        );

        let mut serverbound_versions: HashMap<u32, HashMap<_, _>> = HashMap::new();
        serverbound_versions.insert(
            1,
            HashMap::from([
                (
                    "register",
                    DispatchEntry {
                        read: |r| {
                            serverbound::RegisterPacket::read(r).map(ServerboundPacket::Register)
                        },
                        write: |p| match p {
                            ServerboundPacket::Register(p) => Ok(p.write()),
                            _ => Err(ProtocolError::PacketMismatch {
                                expected: "register",
                            }),
                        },
                    },
                ),
                (
                    "ping",
                    DispatchEntry {
                        read: |r| {
                            serverbound::PingRequest::read(r).map(ServerboundPacket::Ping)
                        },
                        write: |p| match p {
                            ServerboundPacket::Ping(p) => Ok(p.write()),
                            _ => Err(ProtocolError::PacketMismatch { expected: "ping" }),
                        },
                    },
                ),
                (
                    "player_info",
                    DispatchEntry {
                        read: |r| {
                            serverbound::PlayerInfoRequest::read(r)
                                .map(ServerboundPacket::PlayerInfo)
                        },
                        write: |p| match p {
                            ServerboundPacket::PlayerInfo(p) => Ok(p.write()),
                            _ => Err(ProtocolError::PacketMismatch {
                                expected: "player_info",
                            }),
                        },
                    },
                ),
            ]),
        );
        serverbound_versions.insert(
            2,
            HashMap::from([(
                "party_info",
                DispatchEntry {
                    read: |r| {
                        serverbound::PartyInfoRequest::read(r).map(ServerboundPacket::PartyInfo)
                    },
                    write: |p| match p {
                        ServerboundPacket::PartyInfo(p) => Ok(p.write()),
                        _ => Err(ProtocolError::PacketMismatch {
                            expected: "party_info",
                        }),
                    },
                },
            )]),
        );

        Self {
            clientbound: DirectionTable {
                direction: Direction::Clientbound,
                versions: clientbound_versions,
            },
            serverbound: DirectionTable {
                direction: Direction::Serverbound,
                versions: serverbound_versions,
            },
        }
    }

    /// Decode a clientbound buffer (success byte included) for `name`.
    ///
    /// A leading 0 byte takes the failure path and never resolves a payload
    /// codec; a leading 1 resolves the codec by the version varint that
    /// follows and never touches the error mapping.
    pub fn read_clientbound(
        &self,
        name: &str,
        buffer: &[u8],
    ) -> ProtocolResult<ClientboundResponse> {
        let Some((&success, body)) = buffer.split_first() else {
            return Err(CodecError::UnexpectedEof {
                needed: 1,
                remaining: 0,
            }
            .into());
        };
        let mut reader = PacketReader::new(body)?;

        if success != SUCCESS_BYTE {
            let error = PacketError::from_wire_code(reader.id)?;
            tracing::debug!("server reported {:?} for {}", error, name);
            return Ok(ClientboundResponse::Failure(error));
        }

        let entry = self.clientbound.resolve(reader.id, name)?;
        let packet = (entry.read)(&mut reader)?;
        tracing::trace!("decoded clientbound {} v{}", name, reader.id);
        Ok(ClientboundResponse::Success(packet))
    }

    /// Encode a clientbound payload under `name`, prepending a success byte.
    pub fn write_clientbound(
        &self,
        name: &str,
        packet: &ClientboundPacket,
    ) -> ProtocolResult<Bytes> {
        let entry = self.clientbound.resolve(packet.version(), name)?;
        let body = (entry.write)(packet)?;

        let mut buf = BytesMut::with_capacity(body.len() + 1);
        buf.put_u8(SUCCESS_BYTE);
        buf.put_slice(&body);
        Ok(buf.freeze())
    }

    /// Decode a serverbound buffer (no envelope) for `name`.
    pub fn read_serverbound(&self, name: &str, buffer: &[u8]) -> ProtocolResult<ServerboundPacket> {
        let mut reader = PacketReader::new(buffer)?;
        let entry = self.serverbound.resolve(reader.id, name)?;
        let packet = (entry.read)(&mut reader)?;
        tracing::trace!("decoded serverbound {} v{}", name, reader.id);
        Ok(packet)
    }

    /// Encode a serverbound payload under `name`.
    pub fn write_serverbound(
        &self,
        name: &str,
        packet: &ServerboundPacket,
    ) -> ProtocolResult<Bytes> {
        let entry = self.serverbound.resolve(packet.version(), name)?;
        (entry.write)(packet)
    }
}

impl Default for PacketRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EventVersionResolver for PacketRegistry {
    /// Reports, per wanted name, the highest clientbound version this
    /// registry has a codec for. Names with no codec at any version are
    /// left out of the result.
    fn event_versions(&self, wanted: &HashSet<String>) -> HashMap<String, u32> {
        wanted
            .iter()
            .filter_map(|name| {
                self.clientbound
                    .versions
                    .iter()
                    .filter(|(_, by_name)| by_name.contains_key(name.as_str()))
                    .map(|(version, _)| *version)
                    .max()
                    .map(|version| (name.clone(), version))
            })
            .collect()
    }
}

/// Encode a clientbound failure buffer from a typed error.
pub fn write_clientbound_error(error: PacketError) -> Bytes {
    write_clientbound_error_code(error.wire_code())
}

/// Encode a clientbound failure buffer from a raw wire code.
///
/// The code is written as-is; peers decoding it will reject codes outside
/// the declared range.
pub fn write_clientbound_error_code(code: u32) -> Bytes {
    let body = PacketWriter::new(code).into_bytes();
    let mut buf = BytesMut::with_capacity(body.len() + 1);
    buf.put_u8(FAILURE_BYTE);
    buf.put_slice(&body);
    buf.freeze()
}
