//! Sensor and energy decoders.
//!
//! Every reading is independent: a temperature-only sensor and a full weather
//! station share the same decoder and simply fill different fields.

use rfxhub_domain::event::RawEvent;
use rfxhub_domain::value::{DecodedValue, EnergyReadings, IgnoreReason, SensorReadings};

/// Weather, temperature, humidity, rain, wind, UV and weighing sensors.
#[must_use]
pub fn sensor(event: &RawEvent) -> DecodedValue {
    let readings = SensorReadings {
        temperature: event.measurement("temperature"),
        humidity: event.measurement("humidity"),
        barometer: event.measurement("barometer"),
        direction: event.measurement("direction"),
        average_speed: event.measurement("averageSpeed"),
        gust_speed: event.measurement("gustSpeed"),
        chill_factor: event.measurement("chillfactor"),
        rainfall: event.measurement("rainfall"),
        rainfall_rate: event.measurement("rainfallRate"),
        rainfall_increment: event.measurement("rainfallIncrement"),
        uv_index: event.measurement("uv"),
        forecast: event.measurement("forecast"),
        weight: event.measurement("weight"),
    };
    if readings.is_empty() {
        DecodedValue::Ignored(IgnoreReason::NoReadings)
    } else {
        DecodedValue::Sensor(readings)
    }
}

/// OWL / REVOLT electricity monitors.
#[must_use]
pub fn energy(event: &RawEvent) -> DecodedValue {
    let readings = EnergyReadings {
        battery_level: event.measurement("batteryLevel"),
        voltage: event.measurement("voltage"),
        current: event.measurement("current"),
        power: event.measurement("power"),
        energy: event.measurement("energy"),
        power_factor: event.measurement("powerFactor"),
        frequency: event.measurement("frequency"),
    };
    if readings.is_empty() {
        DecodedValue::Ignored(IgnoreReason::NoReadings)
    } else {
        DecodedValue::Energy(readings)
    }
}
