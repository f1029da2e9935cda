//! # rfxhub-adapter-memory-store
//!
//! [`ObjectStore`] implementation over an ordered in-memory map.
//!
//! Objects are kept in a [`BTreeMap`] keyed by id, so `list(prefix)` returns
//! them in id order without sorting. Nothing is persisted across restarts; a
//! JSON seed document can pre-populate the store at start-up.
//!
//! ## Dependency rule
//! Depends on `rfxhub-app` (for the port trait) and `rfxhub-domain` only.

pub mod error;

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use rfxhub_app::ports::ObjectStore;
use rfxhub_domain::error::RfxError;
use rfxhub_domain::id::RegistryId;
use rfxhub_domain::object::ObjectDescriptor;

pub use error::StoreError;

/// In-memory host object store.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<BTreeMap<RegistryId, ObjectDescriptor>>,
    capacity: Option<usize>,
}

impl InMemoryObjectStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse new objects once `capacity` are stored.
    #[must_use]
    pub fn with_capacity_limit(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Build a store from a JSON array of host objects.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Seed`] if the document is not an array of
    /// objects.
    pub fn from_json(document: &str) -> Result<Self, StoreError> {
        let objects: Vec<ObjectDescriptor> = serde_json::from_str(document)?;
        let store = Self::new();
        {
            let mut map = store.write();
            for object in objects {
                map.insert(object.id.clone(), object);
            }
        }
        tracing::debug!(count = store.len(), "object store seeded");
        Ok(store)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<RegistryId, ObjectDescriptor>> {
        self.objects.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<RegistryId, ObjectDescriptor>> {
        self.objects.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ObjectStore for InMemoryObjectStore {
    async fn get(&self, id: &RegistryId) -> Result<Option<ObjectDescriptor>, RfxError> {
        Ok(self.read().get(id).cloned())
    }

    async fn set(&self, object: ObjectDescriptor) -> Result<ObjectDescriptor, RfxError> {
        let mut map = self.write();
        if let Some(limit) = self.capacity
            && !map.contains_key(&object.id)
            && map.len() >= limit
        {
            return Err(StoreError::CapacityExceeded { limit }.into());
        }
        map.insert(object.id.clone(), object.clone());
        Ok(object)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectDescriptor>, RfxError> {
        Ok(self
            .read()
            .values()
            .filter(|object| object.id.is_within(prefix))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &RegistryId) -> Result<(), RfxError> {
        self.write().remove(id);
        Ok(())
    }
}
