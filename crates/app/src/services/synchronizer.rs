//! Registry synchronizer — reconciles desired objects with the host store.
//!
//! Objects are processed strictly one after the other: each create or update
//! completes before the next lookup starts. A failing object is logged and
//! recorded in the [`SyncReport`], then the pass continues with the next one.

use std::sync::Arc;

use rfxhub_domain::error::RfxError;
use rfxhub_domain::id::RegistryId;
use rfxhub_domain::object::ObjectDescriptor;
use rfxhub_domain::time::now;

use crate::ports::ObjectStore;
use crate::registry::Registry;

/// Outcome of one reconcile pass.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub created: Vec<RegistryId>,
    pub updated: Vec<RegistryId>,
    pub failed: Vec<(RegistryId, RfxError)>,
}

impl SyncReport {
    /// Every object was stored.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    #[must_use]
    pub fn attempted(&self) -> usize {
        self.created.len() + self.updated.len() + self.failed.len()
    }
}

enum Synced {
    Created,
    Updated,
}

/// Creates missing objects and refreshes the bridge-owned fields of the rest.
pub struct RegistrySynchronizer<S> {
    store: S,
    registry: Arc<Registry>,
}

impl<S: ObjectStore> RegistrySynchronizer<S> {
    pub fn new(store: S, registry: Arc<Registry>) -> Self {
        Self { store, registry }
    }

    /// Bring the store in line with `desired`, in order.
    ///
    /// Never fails as a whole: per-object failures end up in
    /// [`SyncReport::failed`].
    #[tracing::instrument(skip_all, fields(count = desired.len()))]
    pub async fn reconcile(&self, desired: Vec<ObjectDescriptor>) -> SyncReport {
        let mut report = SyncReport::default();
        for object in desired {
            let id = object.id.clone();
            match self.sync_one(object).await {
                Ok(Synced::Created) => report.created.push(id),
                Ok(Synced::Updated) => report.updated.push(id),
                Err(err) => {
                    // keep going, the remaining objects are independent
                    tracing::error!(%id, error = %err, "failed to synchronise object");
                    report.failed.push((id, err));
                }
            }
        }
        tracing::debug!(
            created = report.created.len(),
            updated = report.updated.len(),
            failed = report.failed.len(),
            "reconcile finished"
        );
        report
    }

    async fn sync_one(&self, desired: ObjectDescriptor) -> Result<Synced, RfxError> {
        let (synced, object) = match self.store.get(&desired.id).await? {
            None => (Synced::Created, desired),
            Some(mut existing) => {
                existing.merge_owned_fields(&desired);
                (Synced::Updated, existing)
            }
        };
        let stored = self.store.set(object).await?;
        self.registry.apply_object(&stored, now());
        Ok(synced)
    }
}
