//! Registry entry — the in-memory record of one logical device or state.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::RegistryId;
use crate::object::{EntryKind, ObjectDescriptor};
use crate::time::{Timestamp, outside_window};
use crate::value::DecodedValue;

/// Name and device-specific configuration mirrored from the host object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub name: String,
    pub native: Map<String, Value>,
}

/// One registry record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub id: RegistryId,
    pub kind: EntryKind,
    /// Legal command names for this entry.
    pub commands: BTreeSet<String>,
    /// The device is expected to report periodically.
    pub auto_repair: bool,
    pub last_seen_at: Option<Timestamp>,
    pub metadata: EntryMetadata,
    /// Last accepted decoded value, or the last command acknowledged by the
    /// transport for write-only devices.
    pub last_value: Option<DecodedValue>,
}

impl RegistryEntry {
    /// Minimal channel admitted from an event while inclusion is active.
    #[must_use]
    pub fn admitted(id: RegistryId) -> Self {
        Self {
            metadata: EntryMetadata {
                name: id.to_string(),
                native: Map::new(),
            },
            id,
            kind: EntryKind::Channel,
            commands: BTreeSet::new(),
            auto_repair: false,
            last_seen_at: None,
            last_value: None,
        }
    }

    /// Build an entry from a host object.
    ///
    /// Auto-repair channels start their heartbeat window at `now`.
    #[must_use]
    pub fn from_object(object: &ObjectDescriptor, now: Timestamp) -> Self {
        let mut entry = Self::admitted(object.id.clone());
        entry.kind = object.kind;
        entry.refresh_from_object(object, now);
        entry
    }

    /// Refresh the metadata mirrored from `object`, keeping observed state.
    pub fn refresh_from_object(&mut self, object: &ObjectDescriptor, now: Timestamp) {
        let auto_repair = object.kind == EntryKind::Channel && object.auto_repair();
        if auto_repair && !self.auto_repair {
            self.last_seen_at.get_or_insert(now);
        }
        self.kind = object.kind;
        self.commands = object.commands().into_iter().collect();
        self.auto_repair = auto_repair;
        self.metadata = EntryMetadata {
            name: object.common.name.clone(),
            native: object.native.clone(),
        };
    }

    /// Record an accepted event.
    pub fn observe(&mut self, value: DecodedValue, now: Timestamp) {
        self.last_seen_at = Some(now);
        self.last_value = Some(value);
    }

    #[must_use]
    pub fn supports(&self, command: &str) -> bool {
        self.commands.contains(command)
    }

    /// An auto-repair entry that has not reported within `window`.
    #[must_use]
    pub fn is_stale(&self, now: Timestamp, window: Duration) -> bool {
        self.auto_repair && outside_window(self.last_seen_at, now, window)
    }
}
