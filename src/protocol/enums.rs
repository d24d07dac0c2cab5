//! Enum wire mappings
//!
//! Each closed-set domain maps between a named variant and a small sequential
//! integer wire code. The numeric values are a fixed wire contract shared
//! with existing peers: error and rank codes are 1-based, environment and
//! party role codes are 0-based. Decoding an out-of-range code fails with
//! [`ProtocolError::UnknownWireCode`]; it is never coerced to a default.

use serde::{Deserialize, Serialize};

use super::{ProtocolError, ProtocolResult};

/// Protocol-level failures a server reports instead of a packet payload.
///
/// These arrive inside a failed clientbound envelope and are legitimate
/// responses, not decode errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum PacketError {
    Disabled = 1,
    InternalServerError = 2,
    RateLimited = 3,
    InvalidPacketVersion = 4,
    NoLongerSupported = 5,
}

impl PacketError {
    pub fn wire_code(self) -> u32 {
        self as u32
    }

    pub fn from_wire_code(code: u32) -> ProtocolResult<Self> {
        match code {
            1 => Ok(PacketError::Disabled),
            2 => Ok(PacketError::InternalServerError),
            3 => Ok(PacketError::RateLimited),
            4 => Ok(PacketError::InvalidPacketVersion),
            5 => Ok(PacketError::NoLongerSupported),
            code => Err(ProtocolError::UnknownWireCode {
                domain: "packet error",
                code,
            }),
        }
    }
}

/// The server environment currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum Environment {
    Production = 0,
    Beta = 1,
    Test = 2,
}

impl Environment {
    pub fn wire_code(self) -> u32 {
        self as u32
    }

    pub fn from_wire_code(code: u32) -> ProtocolResult<Self> {
        match code {
            0 => Ok(Environment::Production),
            1 => Ok(Environment::Beta),
            2 => Ok(Environment::Test),
            code => Err(ProtocolError::UnknownWireCode {
                domain: "environment",
                code,
            }),
        }
    }
}

/// The permanent purchased rank of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum PackageRank {
    None = 1,
    Vip = 2,
    VipPlus = 3,
    Mvp = 4,
    MvpPlus = 5,
}

impl PackageRank {
    pub fn wire_code(self) -> u32 {
        self as u32
    }

    pub fn from_wire_code(code: u32) -> ProtocolResult<Self> {
        match code {
            1 => Ok(PackageRank::None),
            2 => Ok(PackageRank::Vip),
            3 => Ok(PackageRank::VipPlus),
            4 => Ok(PackageRank::Mvp),
            5 => Ok(PackageRank::MvpPlus),
            code => Err(ProtocolError::UnknownWireCode {
                domain: "package rank",
                code,
            }),
        }
    }
}

/// The monthly subscription rank of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum MonthlyPackageRank {
    None = 1,
    Superstar = 2,
}

impl MonthlyPackageRank {
    pub fn wire_code(self) -> u32 {
        self as u32
    }

    pub fn from_wire_code(code: u32) -> ProtocolResult<Self> {
        match code {
            1 => Ok(MonthlyPackageRank::None),
            2 => Ok(MonthlyPackageRank::Superstar),
            code => Err(ProtocolError::UnknownWireCode {
                domain: "monthly package rank",
                code,
            }),
        }
    }
}

/// The special staff/creator rank of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum PlayerRank {
    Normal = 1,
    Youtuber = 2,
    GameMaster = 3,
    Admin = 4,
}

impl PlayerRank {
    pub fn wire_code(self) -> u32 {
        self as u32
    }

    pub fn from_wire_code(code: u32) -> ProtocolResult<Self> {
        match code {
            1 => Ok(PlayerRank::Normal),
            2 => Ok(PlayerRank::Youtuber),
            3 => Ok(PlayerRank::GameMaster),
            4 => Ok(PlayerRank::Admin),
            code => Err(ProtocolError::UnknownWireCode {
                domain: "player rank",
                code,
            }),
        }
    }
}

/// A member's role within a party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum PartyRole {
    Leader = 0,
    Mod = 1,
    Member = 2,
}

impl PartyRole {
    pub fn wire_code(self) -> u32 {
        self as u32
    }

    pub fn from_wire_code(code: u32) -> ProtocolResult<Self> {
        match code {
            0 => Ok(PartyRole::Leader),
            1 => Ok(PartyRole::Mod),
            2 => Ok(PartyRole::Member),
            code => Err(ProtocolError::UnknownWireCode {
                domain: "party role",
                code,
            }),
        }
    }
}
