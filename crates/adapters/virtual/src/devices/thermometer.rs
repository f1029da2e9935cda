//! Simulated Oregon Scientific thermometer/hygrometer (`th1`).

use std::collections::BTreeMap;

use rfxhub_domain::event::RawEvent;

#[derive(Debug, Clone)]
pub struct SimulatedThermometer {
    pub device_id: String,
    /// Centre of the temperature swing, in °C.
    pub base_temperature: f64,
}

impl Default for SimulatedThermometer {
    fn default() -> Self {
        Self {
            device_id: "0x6701".to_string(),
            base_temperature: 21.5,
        }
    }
}

impl SimulatedThermometer {
    #[must_use]
    pub fn event(&self, tick: u64) -> RawEvent {
        // one degree swing over ten ticks
        let offset = u32::try_from(tick % 10).unwrap_or(0);
        let temperature = self.base_temperature + f64::from(offset) / 10.0 - 0.5;
        RawEvent {
            family: "th1".to_string(),
            signal_strength: 5,
            device_id: Some(self.device_id.clone()),
            measurements: BTreeMap::from([
                ("temperature".to_string(), temperature),
                ("humidity".to_string(), 45.0 + f64::from(offset)),
            ]),
            ..RawEvent::default()
        }
    }
}
