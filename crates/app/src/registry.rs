//! Device registry — the in-memory map of known channels and states.
//!
//! Entries come from three places: the host store at startup, reconcile
//! passes, and dynamic admission while inclusion is active. The lock is never
//! held across an `.await`.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rfxhub_domain::id::RegistryId;
use rfxhub_domain::object::ObjectDescriptor;
use rfxhub_domain::registry::RegistryEntry;
use rfxhub_domain::time::Timestamp;
use rfxhub_domain::value::DecodedValue;

/// Outcome of routing an event to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// An existing entry was refreshed.
    Updated,
    /// A new minimal entry was created because inclusion is active.
    Admitted,
    /// No entry exists and admission was not allowed.
    UnknownDevice,
}

#[derive(Default)]
struct Entries {
    by_id: HashMap<RegistryId, RegistryEntry>,
    auto_repair: BTreeSet<RegistryId>,
}

impl Entries {
    fn insert(&mut self, entry: RegistryEntry) {
        if entry.auto_repair {
            self.auto_repair.insert(entry.id.clone());
        } else {
            self.auto_repair.remove(&entry.id);
        }
        self.by_id.insert(entry.id.clone(), entry);
    }
}

/// Thread-safe registry of [`RegistryEntry`] records.
#[derive(Default)]
pub struct Registry {
    inner: Mutex<Entries>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mirror every object of the host store. Returns the number loaded.
    pub fn load<'a>(
        &self,
        objects: impl IntoIterator<Item = &'a ObjectDescriptor>,
        now: Timestamp,
    ) -> usize {
        let mut entries = self.entries();
        let mut count = 0;
        for object in objects {
            entries.insert(RegistryEntry::from_object(object, now));
            count += 1;
        }
        count
    }

    /// Create or refresh the entry mirrored from `object`.
    pub fn apply_object(&self, object: &ObjectDescriptor, now: Timestamp) {
        let mut entries = self.entries();
        let entry = match entries.by_id.remove(&object.id) {
            Some(mut entry) => {
                entry.refresh_from_object(object, now);
                entry
            }
            None => RegistryEntry::from_object(object, now),
        };
        entries.insert(entry);
    }

    pub fn remove(&self, id: &RegistryId) -> Option<RegistryEntry> {
        let mut entries = self.entries();
        entries.auto_repair.remove(id);
        entries.by_id.remove(id)
    }

    #[must_use]
    pub fn get(&self, id: &RegistryId) -> Option<RegistryEntry> {
        self.entries().by_id.get(id).cloned()
    }

    #[must_use]
    pub fn contains(&self, id: &RegistryId) -> bool {
        self.entries().by_id.contains_key(id)
    }

    /// Every entry, ordered by id.
    #[must_use]
    pub fn list(&self) -> Vec<RegistryEntry> {
        let mut all: Vec<_> = self.entries().by_id.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Route an accepted event value to the entry `id`.
    ///
    /// Unknown ids are admitted as a bare channel only when `admit` is set.
    pub fn observe(
        &self,
        id: &RegistryId,
        value: &DecodedValue,
        now: Timestamp,
        admit: bool,
    ) -> Observation {
        let mut entries = self.entries();
        if let Some(entry) = entries.by_id.get_mut(id) {
            entry.observe(value.clone(), now);
            return Observation::Updated;
        }
        if !admit {
            return Observation::UnknownDevice;
        }
        let mut entry = RegistryEntry::admitted(id.clone());
        entry.observe(value.clone(), now);
        entries.insert(entry);
        Observation::Admitted
    }

    /// Store the last value of `id` without touching its heartbeat.
    ///
    /// Returns `false` when `id` is unknown.
    pub fn record_value(&self, id: &RegistryId, value: DecodedValue) -> bool {
        match self.entries().by_id.get_mut(id) {
            Some(entry) => {
                entry.last_value = Some(value);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn commands_for(&self, id: &RegistryId) -> Option<BTreeSet<String>> {
        self.entries().by_id.get(id).map(|entry| entry.commands.clone())
    }

    /// Auto-repair entries that have not reported within `window`.
    #[must_use]
    pub fn stale_entries(&self, now: Timestamp, window: Duration) -> Vec<RegistryEntry> {
        let entries = self.entries();
        entries
            .auto_repair
            .iter()
            .filter_map(|id| entries.by_id.get(id))
            .filter(|entry| entry.is_stale(now, window))
            .cloned()
            .collect()
    }
}
