//! Object store port — the host's persistent channel/state objects.

use std::future::Future;

use rfxhub_domain::error::RfxError;
use rfxhub_domain::id::RegistryId;
use rfxhub_domain::object::ObjectDescriptor;

/// Host-side storage of [`ObjectDescriptor`]s.
pub trait ObjectStore: Send + Sync {
    fn get(
        &self,
        id: &RegistryId,
    ) -> impl Future<Output = Result<Option<ObjectDescriptor>, RfxError>> + Send;

    /// Create or replace an object, returning what was stored.
    fn set(
        &self,
        object: ObjectDescriptor,
    ) -> impl Future<Output = Result<ObjectDescriptor, RfxError>> + Send;

    /// All objects whose id lives below `prefix`, ordered by id.
    fn list(
        &self,
        prefix: &str,
    ) -> impl Future<Output = Result<Vec<ObjectDescriptor>, RfxError>> + Send;

    /// Remove an object. Deleting a missing object is not an error.
    fn delete(&self, id: &RegistryId) -> impl Future<Output = Result<(), RfxError>> + Send;
}

impl<T: ObjectStore> ObjectStore for std::sync::Arc<T> {
    fn get(
        &self,
        id: &RegistryId,
    ) -> impl Future<Output = Result<Option<ObjectDescriptor>, RfxError>> + Send {
        (**self).get(id)
    }

    fn set(
        &self,
        object: ObjectDescriptor,
    ) -> impl Future<Output = Result<ObjectDescriptor, RfxError>> + Send {
        (**self).set(object)
    }

    fn list(
        &self,
        prefix: &str,
    ) -> impl Future<Output = Result<Vec<ObjectDescriptor>, RfxError>> + Send {
        (**self).list(prefix)
    }

    fn delete(&self, id: &RegistryId) -> impl Future<Output = Result<(), RfxError>> + Send {
        (**self).delete(id)
    }
}
