//! In-process state bus backed by a tokio broadcast channel.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast;

use rfxhub_domain::error::RfxError;
use rfxhub_domain::id::RegistryId;

use crate::ports::{StatePublisher, StateUpdate};

/// In-process [`StatePublisher`] using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the update is simply dropped). The last update per id is retained.
pub struct InProcessStateBus {
    sender: broadcast::Sender<StateUpdate>,
    last: Mutex<HashMap<RegistryId, StateUpdate>>,
}

impl InProcessStateBus {
    /// Create a new state bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            last: Mutex::new(HashMap::new()),
        }
    }

    /// Subscribe to updates published *after* this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StateUpdate> {
        self.sender.subscribe()
    }
}

impl StatePublisher for InProcessStateBus {
    fn publish(&self, update: StateUpdate) -> impl Future<Output = Result<(), RfxError>> + Send {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(update.id.clone(), update.clone());
        // send only fails without receivers
        let _ = self.sender.send(update);
        async { Ok(()) }
    }

    fn last(
        &self,
        id: &RegistryId,
    ) -> impl Future<Output = Result<Option<StateUpdate>, RfxError>> + Send {
        let last = self
            .last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned();
        async { Ok(last) }
    }
}
