//! Event classifier — maps a protocol family tag to its decoder.
//!
//! The table is built once by [`Classifier::standard`] and is read-only
//! afterwards. Unknown tags never fail: they resolve to the generic log-only
//! decoder.

use std::collections::HashMap;

use rfxhub_domain::event::RawEvent;
use rfxhub_domain::value::DecodedValue;

use crate::decoders;

/// Decoder function signature shared by every family.
pub type DecodeFn = fn(&RawEvent) -> DecodedValue;

/// Broad decoder category of a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecoderKind {
    Lighting1,
    Lighting2,
    Lighting4,
    Lighting5,
    Lighting6,
    Sensor,
    Energy,
    Blinds,
    /// Observed for logging only (security, meters, chimes).
    LogOnly,
    /// Fallback for tags outside the table.
    Generic,
}

impl DecoderKind {
    /// Senders that report on their own schedule, so traffic from devices
    /// that are not ours (a neighbour's weather station) is routine.
    #[must_use]
    pub fn is_passive(self) -> bool {
        matches!(
            self,
            Self::Sensor | Self::Energy | Self::LogOnly | Self::Generic
        )
    }
}

/// Resolved decoder for one family.
#[derive(Debug, Clone, Copy)]
pub struct DecoderHandle {
    pub kind: DecoderKind,
    decode: DecodeFn,
}

impl DecoderHandle {
    const fn new(kind: DecoderKind, decode: DecodeFn) -> Self {
        Self { kind, decode }
    }

    const GENERIC: Self = Self::new(DecoderKind::Generic, decoders::log_only);

    #[must_use]
    pub fn decode(&self, event: &RawEvent) -> DecodedValue {
        (self.decode)(event)
    }
}

/// Family tag → decoder table.
#[derive(Debug, Clone)]
pub struct Classifier {
    table: HashMap<String, DecoderHandle>,
}

impl Classifier {
    /// The table of every family the bridge understands.
    #[must_use]
    pub fn standard() -> Self {
        let mut table = HashMap::new();
        let mut add = |tag: String, kind: DecoderKind, decode: DecodeFn| {
            table.insert(tag, DecoderHandle::new(kind, decode));
        };

        add("lighting1".into(), DecoderKind::Lighting1, decoders::lighting::lighting1);
        add("lighting2".into(), DecoderKind::Lighting2, decoders::lighting::lighting2);
        add("lighting4".into(), DecoderKind::Lighting4, decoders::raw_passthrough);
        add("lighting5".into(), DecoderKind::Lighting5, decoders::lighting::lighting5);
        add("lighting6".into(), DecoderKind::Lighting6, decoders::lighting::lighting6);

        let sensor_families = [
            ("temp", 1..=11),
            ("th", 1..=10),
            ("th", 12..=14),
            ("thb", 1..=2),
            ("rain", 1..=7),
            ("wind", 1..=7),
            ("uv", 1..=3),
            ("weight", 1..=2),
        ];
        for (prefix, range) in sensor_families {
            for n in range {
                add(format!("{prefix}{n}"), DecoderKind::Sensor, decoders::measurement::sensor);
            }
        }
        for tag in ["bbq1", "temprain1", "humidity1"] {
            add(tag.into(), DecoderKind::Sensor, decoders::measurement::sensor);
        }
        for n in 1..=5 {
            add(format!("elec{n}"), DecoderKind::Energy, decoders::measurement::energy);
        }

        add("blinds1".into(), DecoderKind::Blinds, decoders::blinds);

        for tag in ["security1", "rfxmeter", "rfxsensor", "lighting3", "chime1"] {
            add(tag.into(), DecoderKind::LogOnly, decoders::log_only);
        }

        Self { table }
    }

    /// Look up the decoder for `family`. Unknown tags get the generic decoder.
    #[must_use]
    pub fn classify(&self, family: &str) -> DecoderHandle {
        self.table
            .get(family)
            .copied()
            .unwrap_or(DecoderHandle::GENERIC)
    }

    /// Every family tag in the table, sorted.
    #[must_use]
    pub fn supported_families(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.table.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_treat_measurement_and_log_only_kinds_as_passive() {
        let classifier = Classifier::standard();
        for tag in ["th1", "elec2", "security1", "unknown9"] {
            assert!(classifier.classify(tag).kind.is_passive(), "{tag}");
        }
        for tag in ["lighting1", "lighting2", "lighting5", "blinds1"] {
            assert!(!classifier.classify(tag).kind.is_passive(), "{tag}");
        }
    }

    #[test]
    fn should_classify_lighting_families() {
        let classifier = Classifier::standard();
        assert_eq!(classifier.classify("lighting1").kind, DecoderKind::Lighting1);
        assert_eq!(classifier.classify("lighting2").kind, DecoderKind::Lighting2);
        assert_eq!(classifier.classify("lighting4").kind, DecoderKind::Lighting4);
        assert_eq!(classifier.classify("lighting5").kind, DecoderKind::Lighting5);
        assert_eq!(classifier.classify("lighting6").kind, DecoderKind::Lighting6);
        assert_eq!(classifier.classify("lighting3").kind, DecoderKind::LogOnly);
    }

    #[test]
    fn should_cover_every_sensor_family() {
        let classifier = Classifier::standard();
        let mut tags: Vec<String> = vec!["bbq1".into(), "temprain1".into(), "humidity1".into()];
        tags.extend((1..=11).map(|n| format!("temp{n}")));
        tags.extend((1..=10).chain(12..=14).map(|n| format!("th{n}")));
        tags.extend((1..=2).map(|n| format!("thb{n}")));
        tags.extend((1..=7).map(|n| format!("rain{n}")));
        tags.extend((1..=7).map(|n| format!("wind{n}")));
        tags.extend((1..=3).map(|n| format!("uv{n}")));
        tags.extend((1..=2).map(|n| format!("weight{n}")));

        for tag in &tags {
            assert_eq!(classifier.classify(tag).kind, DecoderKind::Sensor, "{tag}");
        }
        assert_eq!(classifier.classify("th11").kind, DecoderKind::Generic);
    }

    #[test]
    fn should_cover_energy_blinds_and_log_only_families() {
        let classifier = Classifier::standard();
        for n in 1..=5 {
            assert_eq!(classifier.classify(&format!("elec{n}")).kind, DecoderKind::Energy);
        }
        assert_eq!(classifier.classify("blinds1").kind, DecoderKind::Blinds);
        for tag in ["security1", "rfxmeter", "rfxsensor", "chime1"] {
            assert_eq!(classifier.classify(tag).kind, DecoderKind::LogOnly, "{tag}");
        }
    }

    #[test]
    fn should_fall_back_to_generic_decoder_for_unknown_tag() {
        let handle = Classifier::standard().classify("hunter1");
        assert_eq!(handle.kind, DecoderKind::Generic);
        assert!(handle.decode(&RawEvent::default()).is_ignored());
    }

    #[test]
    fn should_list_supported_families_sorted() {
        let classifier = Classifier::standard();
        let families = classifier.supported_families();
        assert_eq!(families.len(), 5 + 48 + 5 + 1 + 5);
        assert!(families.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(families.contains(&"lighting5"));
    }
}
