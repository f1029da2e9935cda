//! Lighting decoders.
//!
//! Each family is a table of command sets mapped to a [`Rule`]. Lighting5 adds
//! an outer table keyed by subtype. Commands missing from a table decode to
//! [`IgnoreReason::Unrecognized`].

use rfxhub_domain::event::RawEvent;
use rfxhub_domain::value::{DecodedValue, IgnoreReason, Percentage};

/// How a command number turns into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Off,
    On,
    Mode(&'static str),
    /// `Mood<n>` where n is the command number minus two.
    Mood,
    /// Dim level scaled out of `steps`.
    Level { steps: u8 },
    /// The command belongs to a companion device and is dropped silently.
    Reserved,
}

struct CommandTable(&'static [(&'static [u8], Rule)]);

impl CommandTable {
    fn rule(&self, command: u8) -> Option<Rule> {
        self.0
            .iter()
            .find(|(commands, _)| commands.contains(&command))
            .map(|(_, rule)| *rule)
    }

    fn decode(&self, event: &RawEvent) -> DecodedValue {
        match self.rule(event.command_number) {
            Some(rule) => apply(rule, event),
            None => unrecognized(event),
        }
    }
}

const LIGHTING1: CommandTable = CommandTable(&[
    (&[0, 5], Rule::Off),
    (&[1, 6], Rule::On),
    (&[2], Rule::Mode("Dim")),
    (&[3], Rule::Mode("Bright")),
    // chime
    (&[7], Rule::Reserved),
]);

const LIGHTING2: CommandTable = CommandTable(&[
    (&[0, 3], Rule::Off),
    (&[1, 4], Rule::On),
    (&[2, 5], Rule::Level { steps: 15 }),
]);

const LIGHTING5_LIGHTWAVE_RF: CommandTable = CommandTable(&[
    (&[0, 2], Rule::Off),
    (&[1], Rule::On),
    (&[3, 4, 5, 6, 7], Rule::Mood),
    (&[16], Rule::Level { steps: 31 }),
]);

const LIGHTING5_RELAY: CommandTable =
    CommandTable(&[(&[0, 2], Rule::Off), (&[1, 3], Rule::On)]);

const LIGHTING5_TRC02: CommandTable = CommandTable(&[
    (&[0], Rule::Off),
    (&[1], Rule::On),
    (&[2], Rule::Mode("Bright")),
    (&[3], Rule::Mode("Dim")),
]);

/// Lighting5 subtype → command table. LightwaveRF, BBSB/Conrad, TRC02.
const LIGHTING5: &[(&[u8], CommandTable)] = &[
    (&[0], LIGHTING5_LIGHTWAVE_RF),
    (&[2, 4], LIGHTING5_RELAY),
    (&[6], LIGHTING5_TRC02),
];

const LIGHTING6: CommandTable = CommandTable(&[(&[1, 3], Rule::Off), (&[0, 2], Rule::On)]);

fn apply(rule: Rule, event: &RawEvent) -> DecodedValue {
    let command = event.command_number;
    match rule {
        Rule::Off => DecodedValue::Boolean(false),
        Rule::On => DecodedValue::Boolean(true),
        Rule::Mode(name) => DecodedValue::NamedMode(name.to_string()),
        Rule::Mood => DecodedValue::NamedMode(format!("Mood{}", command.saturating_sub(2))),
        Rule::Level { steps } => match event.level {
            Some(level) => DecodedValue::Percentage(Percentage::from_level(level, steps)),
            None => DecodedValue::Ignored(IgnoreReason::MissingLevel { command }),
        },
        Rule::Reserved => DecodedValue::Ignored(IgnoreReason::Reserved),
    }
}

fn unrecognized(event: &RawEvent) -> DecodedValue {
    DecodedValue::Ignored(IgnoreReason::Unrecognized {
        command: event.command_number,
        subtype: event.subtype,
    })
}

/// X10, ARC, Energenie and similar remotes.
#[must_use]
pub fn lighting1(event: &RawEvent) -> DecodedValue {
    LIGHTING1.decode(event)
}

/// AC / HomeEasy remotes.
#[must_use]
pub fn lighting2(event: &RawEvent) -> DecodedValue {
    LIGHTING2.decode(event)
}

/// LightwaveRF, Siemens and compatible remotes.
#[must_use]
pub fn lighting5(event: &RawEvent) -> DecodedValue {
    let table = event.subtype.and_then(|subtype| {
        LIGHTING5
            .iter()
            .find(|(subtypes, _)| subtypes.contains(&subtype))
            .map(|(_, table)| table)
    });
    match table {
        Some(table) => table.decode(event),
        None => unrecognized(event),
    }
}

/// Blyss remotes.
#[must_use]
pub fn lighting6(event: &RawEvent) -> DecodedValue {
    LIGHTING6.decode(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(family: &str, command: u8) -> RawEvent {
        RawEvent {
            family: family.to_string(),
            command_number: command,
            ..RawEvent::default()
        }
    }

    fn lighting5_event(subtype: u8, command: u8) -> RawEvent {
        RawEvent {
            subtype: Some(subtype),
            ..event("lighting5", command)
        }
    }

    fn percent(value: &DecodedValue) -> f64 {
        match value {
            DecodedValue::Percentage(p) => p.value(),
            other => panic!("expected percentage, got {other:?}"),
        }
    }

    #[test]
    fn should_decode_lighting1_on_as_true() {
        assert_eq!(lighting1(&event("lighting1", 1)), DecodedValue::Boolean(true));
    }

    #[test]
    fn should_decode_lighting1_table() {
        assert_eq!(lighting1(&event("lighting1", 0)), DecodedValue::Boolean(false));
        assert_eq!(lighting1(&event("lighting1", 5)), DecodedValue::Boolean(false));
        assert_eq!(lighting1(&event("lighting1", 6)), DecodedValue::Boolean(true));
        assert_eq!(
            lighting1(&event("lighting1", 2)),
            DecodedValue::NamedMode("Dim".to_string())
        );
        assert_eq!(
            lighting1(&event("lighting1", 3)),
            DecodedValue::NamedMode("Bright".to_string())
        );
    }

    #[test]
    fn should_silently_ignore_lighting1_chime_command() {
        let value = lighting1(&event("lighting1", 7));
        assert_eq!(value, DecodedValue::Ignored(IgnoreReason::Reserved));
    }

    #[test]
    fn should_report_unknown_lighting1_command() {
        let value = lighting1(&event("lighting1", 9));
        assert_eq!(
            value,
            DecodedValue::Ignored(IgnoreReason::Unrecognized {
                command: 9,
                subtype: None
            })
        );
    }

    #[test]
    fn should_scale_lighting2_level_out_of_fifteen() {
        let raw = RawEvent {
            level: Some(9),
            ..event("lighting2", 2)
        };
        assert!((percent(&lighting2(&raw)) - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_report_missing_level_for_lighting2_dim() {
        assert_eq!(
            lighting2(&event("lighting2", 5)),
            DecodedValue::Ignored(IgnoreReason::MissingLevel { command: 5 })
        );
    }

    #[test]
    fn should_decode_lightwave_mood() {
        assert_eq!(
            lighting5(&lighting5_event(0, 5)),
            DecodedValue::NamedMode("Mood3".to_string())
        );
        assert_eq!(
            lighting5(&lighting5_event(0, 3)),
            DecodedValue::NamedMode("Mood1".to_string())
        );
    }

    #[test]
    fn should_scale_lightwave_level_out_of_thirty_one() {
        let raw = RawEvent {
            level: Some(31),
            ..lighting5_event(0, 16)
        };
        assert!((percent(&lighting5(&raw)) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_report_unsupported_lightwave_commands() {
        for command in [17, 18, 19, 42] {
            assert!(matches!(
                lighting5(&lighting5_event(0, command)),
                DecodedValue::Ignored(IgnoreReason::Unrecognized { .. })
            ));
        }
    }

    #[test]
    fn should_decode_lighting5_relay_and_trc02_subtypes() {
        assert_eq!(lighting5(&lighting5_event(2, 3)), DecodedValue::Boolean(true));
        assert_eq!(lighting5(&lighting5_event(4, 2)), DecodedValue::Boolean(false));
        assert_eq!(
            lighting5(&lighting5_event(6, 2)),
            DecodedValue::NamedMode("Bright".to_string())
        );
        assert_eq!(
            lighting5(&lighting5_event(6, 3)),
            DecodedValue::NamedMode("Dim".to_string())
        );
    }

    #[test]
    fn should_report_unknown_or_missing_lighting5_subtype() {
        assert_eq!(
            lighting5(&lighting5_event(9, 1)),
            DecodedValue::Ignored(IgnoreReason::Unrecognized {
                command: 1,
                subtype: Some(9)
            })
        );
        assert!(lighting5(&event("lighting5", 1)).is_ignored());
    }

    #[test]
    fn should_decode_lighting6_inverted_table() {
        assert_eq!(lighting6(&event("lighting6", 0)), DecodedValue::Boolean(true));
        assert_eq!(lighting6(&event("lighting6", 1)), DecodedValue::Boolean(false));
        assert!(lighting6(&event("lighting6", 4)).is_ignored());
    }

    fn on_off(value: bool) -> DecodedValue {
        DecodedValue::Boolean(value)
    }

    fn mode(name: &str) -> DecodedValue {
        DecodedValue::NamedMode(name.to_string())
    }

    fn unknown(command: u8, subtype: Option<u8>) -> DecodedValue {
        DecodedValue::Ignored(IgnoreReason::Unrecognized { command, subtype })
    }

    #[test]
    fn should_decode_every_lighting2_command() {
        let rows = [
            (0, on_off(false)),
            (3, on_off(false)),
            (1, on_off(true)),
            (4, on_off(true)),
            (2, DecodedValue::Ignored(IgnoreReason::MissingLevel { command: 2 })),
            (5, DecodedValue::Ignored(IgnoreReason::MissingLevel { command: 5 })),
            (6, unknown(6, None)),
        ];
        for (command, expected) in rows {
            assert_eq!(lighting2(&event("lighting2", command)), expected, "cmd {command}");
        }
    }

    #[test]
    fn should_decode_every_lightwave_command() {
        let rows = [
            (0, on_off(false)),
            (2, on_off(false)),
            (1, on_off(true)),
            (3, mode("Mood1")),
            (4, mode("Mood2")),
            (5, mode("Mood3")),
            (6, mode("Mood4")),
            (7, mode("Mood5")),
            (16, DecodedValue::Ignored(IgnoreReason::MissingLevel { command: 16 })),
            (8, unknown(8, Some(0))),
        ];
        for (command, expected) in rows {
            assert_eq!(lighting5(&lighting5_event(0, command)), expected, "cmd {command}");
        }
    }

    #[test]
    fn should_decode_every_lighting5_relay_command() {
        for subtype in [2, 4] {
            let rows = [
                (0, on_off(false)),
                (2, on_off(false)),
                (1, on_off(true)),
                (3, on_off(true)),
                (4, unknown(4, Some(subtype))),
            ];
            for (command, expected) in rows {
                assert_eq!(
                    lighting5(&lighting5_event(subtype, command)),
                    expected,
                    "subtype {subtype} cmd {command}"
                );
            }
        }
    }

    #[test]
    fn should_decode_every_trc02_command() {
        let rows = [
            (0, on_off(false)),
            (1, on_off(true)),
            (2, mode("Bright")),
            (3, mode("Dim")),
            (4, unknown(4, Some(6))),
        ];
        for (command, expected) in rows {
            assert_eq!(lighting5(&lighting5_event(6, command)), expected, "cmd {command}");
        }
    }

    #[test]
    fn should_decode_every_lighting6_command() {
        let rows = [
            (1, on_off(false)),
            (3, on_off(false)),
            (0, on_off(true)),
            (2, on_off(true)),
            (4, unknown(4, None)),
        ];
        for (command, expected) in rows {
            assert_eq!(lighting6(&event("lighting6", command)), expected, "cmd {command}");
        }
    }

    #[test]
    fn should_be_deterministic() {
        let raw = RawEvent {
            level: Some(12),
            ..lighting5_event(0, 16)
        };
        let first = lighting5(&raw);
        for _ in 0..10 {
            assert_eq!(lighting5(&raw), first);
        }
    }
}
