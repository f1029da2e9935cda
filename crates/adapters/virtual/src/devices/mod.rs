//! Simulated RF devices — a lighting remote, a thermometer and an energy meter.
//!
//! Each device has a fixed physical id so the registry ids it maps to remain
//! stable across restarts. Readings are a pure function of the tick number.

mod meter;
mod remote;
mod thermometer;

pub use meter::SimulatedMeter;
pub use remote::SimulatedRemote;
pub use thermometer::SimulatedThermometer;

use rfxhub_domain::event::RawEvent;

/// Wrapper enum for the concrete simulated device types.
#[derive(Debug, Clone)]
pub enum SimulatedDevice {
    Remote(SimulatedRemote),
    Thermometer(SimulatedThermometer),
    Meter(SimulatedMeter),
}

impl SimulatedDevice {
    /// The event this device sends on `tick`.
    #[must_use]
    pub fn event(&self, tick: u64) -> RawEvent {
        match self {
            Self::Remote(d) => d.event(tick),
            Self::Thermometer(d) => d.event(tick),
            Self::Meter(d) => d.event(tick),
        }
    }

    /// The default set of simulated devices.
    #[must_use]
    pub fn standard() -> Vec<Self> {
        vec![
            Self::Remote(SimulatedRemote::default()),
            Self::Thermometer(SimulatedThermometer::default()),
            Self::Meter(SimulatedMeter::default()),
        ]
    }
}
