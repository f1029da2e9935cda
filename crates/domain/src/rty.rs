//! RTY (RFY) — configuration and command frames for motorised blinds.
//!
//! RFY devices are write-only: the transceiver emits a command frame and
//! receives no state report back. A device is addressed by a 20-bit id and a
//! unit code whose legal range depends on the subtype.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{UnsupportedCommandError, ValidationError};

/// Family tag used for RTY registry ids.
pub const RTY_FAMILY: &str = "rty";

/// Largest addressable RTY device id.
pub const MAX_DEVICE_ID: u32 = 0x0F_FFFF;

/// Packet type byte of an RFY command frame.
const PACKET_TYPE: u8 = 0x1A;

/// RFY subtype, controlling the legal unit code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum RtySubtype {
    Rfy = 0x00,
    RfyExt = 0x01,
    Asa = 0x03,
}

impl RtySubtype {
    /// Inclusive unit code range accepted by this subtype.
    #[must_use]
    pub fn unit_codes(self) -> (u8, u8) {
        match self {
            Self::Rfy => (0, 4),
            Self::RfyExt => (0, 15),
            Self::Asa => (1, 5),
        }
    }
}

impl TryFrom<u8> for RtySubtype {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::Rfy),
            0x01 => Ok(Self::RfyExt),
            0x03 => Ok(Self::Asa),
            other => Err(ValidationError::UnknownSubtype(other)),
        }
    }
}

impl From<RtySubtype> for u8 {
    fn from(value: RtySubtype) -> Self {
        value as u8
    }
}

/// Commands an RTY device understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RtyCommand {
    Stop = 0x00,
    Up = 0x01,
    Down = 0x03,
    Program = 0x07,
}

impl RtyCommand {
    /// Every command, in the order they are exposed as states.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Stop, Self::Program];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stop => "stop",
            Self::Program => "program",
        }
    }
}

impl fmt::Display for RtyCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RtyCommand {
    type Err = UnsupportedCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.as_str() == s)
            .ok_or_else(|| UnsupportedCommandError {
                device: RTY_FAMILY.to_string(),
                command: s.to_string(),
            })
    }
}

/// Operator-supplied configuration of one RTY device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtyConfig {
    /// Hex device id, with or without a `0x` prefix.
    pub device_id: String,
    pub unit_code: u8,
    pub subtype: u8,
    #[serde(default)]
    pub name: Option<String>,
}

impl RtyConfig {
    /// Validate the configuration and resolve the wire address.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the id is not hex, exceeds
    /// [`MAX_DEVICE_ID`], the subtype is unknown, or the unit code lies
    /// outside the subtype's range.
    pub fn address(&self) -> Result<RtyAddress, ValidationError> {
        let subtype = RtySubtype::try_from(self.subtype)?;
        let id = parse_device_id(&self.device_id)?;
        let (min, max) = subtype.unit_codes();
        if !(min..=max).contains(&self.unit_code) {
            return Err(ValidationError::UnitCodeOutOfRange {
                unit_code: self.unit_code,
                min,
                max,
            });
        }
        Ok(RtyAddress {
            subtype,
            id,
            unit_code: self.unit_code,
        })
    }

    /// `id/unit` key under which the device is tracked.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}/{}", self.device_id, self.unit_code)
    }
}

fn parse_device_id(raw: &str) -> Result<u32, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyIdentifier);
    }
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let invalid = || ValidationError::InvalidDeviceId {
        value: raw.to_string(),
        max: MAX_DEVICE_ID,
    };
    let id = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
    if id > MAX_DEVICE_ID {
        return Err(invalid());
    }
    Ok(id)
}

/// A validated RTY address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtyAddress {
    pub subtype: RtySubtype,
    pub id: u32,
    pub unit_code: u8,
}

impl RtyAddress {
    #[must_use]
    pub fn frame(self, command: RtyCommand) -> CommandFrame {
        let [_, id1, id2, id3] = self.id.to_be_bytes();
        CommandFrame {
            subtype: self.subtype,
            id: [id1, id2, id3],
            unit_code: self.unit_code,
            command,
        }
    }
}

/// One RFY command as written to the transceiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame {
    pub subtype: RtySubtype,
    pub id: [u8; 3],
    pub unit_code: u8,
    pub command: RtyCommand,
}

impl CommandFrame {
    /// Length-prefixed wire bytes for sequence number `seq`.
    #[must_use]
    pub fn encode(&self, seq: u8) -> [u8; 13] {
        let [id1, id2, id3] = self.id;
        [
            0x0C,
            PACKET_TYPE,
            self.subtype.into(),
            seq,
            id1,
            id2,
            id3,
            self.unit_code,
            self.command as u8,
            0,
            0,
            0,
            0,
        ]
    }
}
