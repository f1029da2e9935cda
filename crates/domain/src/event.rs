//! Raw events — a single protocol message as delivered by the transceiver.
//!
//! Raw events are ephemeral: the transport produces one, the bridge
//! classifies and decodes it exactly once, then it is dropped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One received RF protocol message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEvent {
    /// Protocol family tag (e.g. `lighting2`, `temp1`).
    pub family: String,
    /// Received signal strength (0–15 on RFXtrx hardware).
    pub signal_strength: u8,
    /// House code for house-code based families (Lighting1, Lighting3).
    pub house_code: Option<String>,
    /// Device identifier for id-based families.
    pub device_id: Option<String>,
    pub command_number: u8,
    pub unit_code: u8,
    pub subtype: Option<u8>,
    /// Dim level, scaled per family (0–15 for Lighting2, 0–31 for Lighting5).
    pub level: Option<u8>,
    /// Optional numeric measurements keyed by transport field name.
    pub measurements: BTreeMap<String, f64>,
    pub raw_payload: Vec<u8>,
}

impl RawEvent {
    /// Identifier of the physical device that sent the message.
    ///
    /// Prefers the device id and falls back to the house code.
    #[must_use]
    pub fn physical_id(&self) -> Option<&str> {
        self.device_id
            .as_deref()
            .or(self.house_code.as_deref())
            .filter(|id| !id.trim().is_empty())
    }

    /// Look up a measurement by its transport field name.
    #[must_use]
    pub fn measurement(&self, name: &str) -> Option<f64> {
        self.measurements.get(name).copied()
    }
}
