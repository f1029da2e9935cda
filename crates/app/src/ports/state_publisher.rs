//! State publisher port — the outbound state surface.

use std::future::Future;

use serde::Serialize;

use rfxhub_domain::error::RfxError;
use rfxhub_domain::id::RegistryId;
use rfxhub_domain::time::{Timestamp, now};
use rfxhub_domain::value::DecodedValue;

/// A value written to a host state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateUpdate {
    pub id: RegistryId,
    pub value: DecodedValue,
    /// The value reflects the device (or bridge) rather than a request.
    pub ack: bool,
    pub timestamp: Timestamp,
}

impl StateUpdate {
    /// Acknowledged update stamped with the current time.
    #[must_use]
    pub fn ack(id: RegistryId, value: DecodedValue) -> Self {
        Self {
            id,
            value,
            ack: true,
            timestamp: now(),
        }
    }
}

/// Publishes state updates to the host and reads back the last one.
pub trait StatePublisher: Send + Sync {
    fn publish(&self, update: StateUpdate) -> impl Future<Output = Result<(), RfxError>> + Send;

    /// Last update published for `id`, if any.
    fn last(
        &self,
        id: &RegistryId,
    ) -> impl Future<Output = Result<Option<StateUpdate>, RfxError>> + Send;
}

impl<T: StatePublisher> StatePublisher for std::sync::Arc<T> {
    fn publish(&self, update: StateUpdate) -> impl Future<Output = Result<(), RfxError>> + Send {
        (**self).publish(update)
    }

    fn last(
        &self,
        id: &RegistryId,
    ) -> impl Future<Output = Result<Option<StateUpdate>, RfxError>> + Send {
        (**self).last(id)
    }
}
