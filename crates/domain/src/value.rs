//! Decoded values — the canonical output of a family decoder.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical value decoded from a raw event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DecodedValue {
    Boolean(bool),
    Percentage(Percentage),
    NamedMode(String),
    Sensor(SensorReadings),
    Energy(EnergyReadings),
    /// Only the signal strength could be extracted.
    Signal(u8),
    /// Nothing to surface as state; see the reason for diagnostics.
    Ignored(IgnoreReason),
}

impl DecodedValue {
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }
}

/// A level in the closed range 0–100.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(f64);

impl Percentage {
    /// Clamp `value` into 0–100. NaN becomes 0.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 100.0))
    }

    /// Scale `level` out of `steps` onto 0–100.
    #[must_use]
    pub fn from_level(level: u8, steps: u8) -> Self {
        if steps == 0 {
            return Self(0.0);
        }
        Self::new(f64::from(level) * 100.0 / f64::from(steps))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Why a decoder produced no state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Reserved for a companion signal (e.g. a doorbell sharing a lighting
    /// channel); dropped silently.
    Reserved,
    /// Command/subtype combination outside the family's known table.
    Unrecognized { command: u8, subtype: Option<u8> },
    /// A level command arrived without a level.
    MissingLevel { command: u8 },
    /// The family carries application-specific payloads only.
    RawPassthrough,
    /// The family is observed for logging only.
    LogOnly,
    /// A measurement family event without any known field.
    NoReadings,
}

impl IgnoreReason {
    /// Whether the ignore should be reported as a diagnostic.
    #[must_use]
    pub fn is_diagnostic(&self) -> bool {
        !matches!(self, Self::Reserved)
    }
}

/// Weather and environment readings. Every field is independent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorReadings {
    /// °C
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// %
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    /// hPa
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barometer: Option<f64>,
    /// degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<f64>,
    /// m/s
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_speed: Option<f64>,
    /// m/s
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gust_speed: Option<f64>,
    /// °C
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chill_factor: Option<f64>,
    /// mm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rainfall: Option<f64>,
    /// mm/h
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rainfall_rate: Option<f64>,
    /// mm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rainfall_increment: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uv_index: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<f64>,
    /// kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl SensorReadings {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Electricity meter readings. Every field is independent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyReadings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<f64>,
    /// V
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage: Option<f64>,
    /// A
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,
    /// W
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
    /// Wh
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_factor: Option<f64>,
    /// Hz
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
}

impl EnergyReadings {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
