//! Simulated OWL energy meter (`elec2`).

use std::collections::BTreeMap;

use rfxhub_domain::event::RawEvent;

#[derive(Debug, Clone)]
pub struct SimulatedMeter {
    pub device_id: String,
}

impl Default for SimulatedMeter {
    fn default() -> Self {
        Self {
            device_id: "0x2A00".to_string(),
        }
    }
}

impl SimulatedMeter {
    #[must_use]
    pub fn event(&self, tick: u64) -> RawEvent {
        let step = u32::try_from(tick % 1_000).unwrap_or(0);
        RawEvent {
            family: "elec2".to_string(),
            signal_strength: 6,
            device_id: Some(self.device_id.clone()),
            measurements: BTreeMap::from([
                ("power".to_string(), 350.0 + f64::from(step % 7) * 10.0),
                ("energy".to_string(), 12_000.0 + f64::from(step) * 2.5),
            ]),
            ..RawEvent::default()
        }
    }
}
