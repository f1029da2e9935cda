//! Simulated X10 remote — alternates `on` and `off`.

use rfxhub_domain::event::RawEvent;

#[derive(Debug, Clone)]
pub struct SimulatedRemote {
    pub house_code: String,
    pub unit_code: u8,
}

impl Default for SimulatedRemote {
    fn default() -> Self {
        Self {
            house_code: "A".to_string(),
            unit_code: 1,
        }
    }
}

impl SimulatedRemote {
    #[must_use]
    pub fn event(&self, tick: u64) -> RawEvent {
        RawEvent {
            family: "lighting1".to_string(),
            signal_strength: 7,
            house_code: Some(self.house_code.clone()),
            unit_code: self.unit_code,
            command_number: u8::from(tick % 2 == 0),
            subtype: Some(0),
            ..RawEvent::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_alternate_on_and_off() {
        let remote = SimulatedRemote::default();
        assert_eq!(remote.event(0).command_number, 1);
        assert_eq!(remote.event(1).command_number, 0);
        assert_eq!(remote.event(0).physical_id(), Some("A"));
    }
}
