//! Bridge — owns the core components for one transceiver.
//!
//! The bridge wires the classifier, registry, inclusion controller, command
//! dispatcher and synchronizer to the three ports. A single event loop task
//! consumes transport events and inclusion transitions, so two events are
//! never processed at the same time.

use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use rfxhub_domain::error::RfxError;
use rfxhub_domain::event::RawEvent;
use rfxhub_domain::id::RegistryId;
use rfxhub_domain::inclusion::InclusionState;
use rfxhub_domain::object::ObjectDescriptor;
use rfxhub_domain::registry::RegistryEntry;
use rfxhub_domain::rty::RtyConfig;
use rfxhub_domain::time::now;
use rfxhub_domain::value::{DecodedValue, IgnoreReason};

use crate::classifier::Classifier;
use crate::inclusion::InclusionController;
use crate::ports::{Endpoint, ObjectStore, StatePublisher, StateUpdate, Transport, TransportEvent};
use crate::registry::{Observation, Registry};
use crate::rty::{RtyDevice, RtyDevices};
use crate::services::control::{ControlService, ProgramRequest};
use crate::services::dispatcher::CommandDispatcher;
use crate::services::synchronizer::{RegistrySynchronizer, SyncReport};

/// Connectivity state id, below the namespace.
pub const CONNECTION_STATE: &str = "info.connection";
/// Inclusion flag state id, below the namespace.
pub const INCLUSION_STATE: &str = "inclusionOn";

/// Runtime settings of a [`Bridge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Prefix of every registry id (e.g. `rfxcom.0`).
    pub namespace: String,
    /// Serial endpoint of the transceiver. Without one the bridge stays idle.
    pub endpoint: Option<String>,
    /// How long an inclusion window stays open. `None` never expires.
    pub inclusion_timeout: Option<Duration>,
    /// Heartbeat window of auto-repair devices.
    pub repair_window: Duration,
    pub rty_devices: Vec<RtyConfig>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            namespace: "rfxcom.0".to_string(),
            endpoint: None,
            inclusion_timeout: None,
            repair_window: Duration::from_secs(600),
            rty_devices: Vec::new(),
        }
    }
}

pub struct Bridge<T, S, P> {
    config: BridgeConfig,
    transport: Arc<T>,
    store: Arc<S>,
    publisher: Arc<P>,
    classifier: Classifier,
    registry: Arc<Registry>,
    inclusion: InclusionController,
    devices: Arc<RtyDevices<T>>,
    dispatcher: CommandDispatcher<T, Arc<P>>,
    synchronizer: RegistrySynchronizer<Arc<S>>,
    control: ControlService<T>,
    /// Last published connectivity, `None` before the first publication.
    connected: Mutex<Option<bool>>,
    event_loop: Mutex<Option<JoinHandle<()>>>,
}

impl<T, S, P> Bridge<T, S, P>
where
    T: Transport + 'static,
    S: ObjectStore + 'static,
    P: StatePublisher + 'static,
{
    pub fn new(config: BridgeConfig, transport: Arc<T>, store: Arc<S>, publisher: Arc<P>) -> Self {
        let registry = Arc::new(Registry::new());
        let devices = Arc::new(RtyDevices::new());
        Self {
            inclusion: InclusionController::new(config.inclusion_timeout),
            dispatcher: CommandDispatcher::new(
                Arc::clone(&registry),
                Arc::clone(&devices),
                Arc::clone(&publisher),
            ),
            synchronizer: RegistrySynchronizer::new(Arc::clone(&store), Arc::clone(&registry)),
            control: ControlService::new(
                config.namespace.clone(),
                Arc::clone(&transport),
                Arc::clone(&devices),
            ),
            classifier: Classifier::standard(),
            connected: Mutex::new(None),
            event_loop: Mutex::new(None),
            config,
            transport,
            store,
            publisher,
            registry,
            devices,
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.config.namespace
    }

    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Bring the bridge up and reconcile the configured write-only devices.
    ///
    /// Failures along the way are logged and leave the bridge running in a
    /// degraded state: a store that cannot be listed yields an empty
    /// registry, a transceiver that cannot be opened keeps connectivity at
    /// `false`.
    #[tracing::instrument(skip_all, fields(namespace = %self.config.namespace))]
    pub async fn start(self: &Arc<Self>) -> SyncReport {
        self.set_connection(false).await;

        match self.store.list(&self.config.namespace).await {
            Ok(objects) => {
                let count = self.registry.load(&objects, now());
                tracing::info!(count, "registry loaded");
            }
            Err(err) => tracing::error!(error = %err, "cannot load objects"),
        }
        self.restore_inclusion().await;

        let Some(endpoint) = self.config.endpoint.clone() else {
            tracing::warn!("no transceiver endpoint configured");
            return SyncReport::default();
        };

        let desired = self.build_devices();
        self.spawn_event_loop();

        match self.transport.initialise(&endpoint).await {
            Ok(()) => tracing::info!(%endpoint, "transceiver initialised"),
            Err(err) => {
                self.set_connection(false).await;
                tracing::error!(%endpoint, error = %err, "unable to open the transceiver");
            }
        }

        self.synchronizer.reconcile(desired).await
    }

    /// Re-open an inclusion window left open by a previous run.
    async fn restore_inclusion(&self) {
        let id = RegistryId::for_namespace_state(&self.config.namespace, INCLUSION_STATE);
        match self.publisher.last(&id).await {
            Ok(Some(StateUpdate {
                value: DecodedValue::Boolean(active),
                ..
            })) => {
                tracing::debug!(active, "inclusion state restored");
                self.inclusion.set(&serde_json::Value::Bool(active));
            }
            Ok(_) => {}
            Err(err) => tracing::warn!(error = %err, "cannot read inclusion state"),
        }
    }

    fn build_devices(&self) -> Vec<ObjectDescriptor> {
        let mut desired = Vec::new();
        for config in &self.config.rty_devices {
            let name = config.name.clone().unwrap_or_else(|| config.key());
            match RtyDevice::new(Arc::clone(&self.transport), config.clone()) {
                Ok(device) => {
                    desired.extend(device.get_objects(&self.config.namespace, &name));
                    self.devices.insert(&self.config.namespace, device);
                }
                Err(err) => {
                    tracing::error!(device = %config.key(), error = %err, "invalid device configuration");
                }
            }
        }
        desired
    }

    fn spawn_event_loop(self: &Arc<Self>) {
        let mut events = self.transport.subscribe();
        let mut inclusion = self.inclusion.subscribe();
        let bridge: Weak<Self> = Arc::downgrade(self);

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    received = events.recv() => match received {
                        Ok(event) => {
                            let Some(bridge) = bridge.upgrade() else { break };
                            bridge.handle_transport_event(event).await;
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "transport events dropped");
                        }
                        Err(RecvError::Closed) => break,
                    },
                    changed = inclusion.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let state = *inclusion.borrow_and_update();
                        let Some(bridge) = bridge.upgrade() else { break };
                        bridge.publish_inclusion(state).await;
                    }
                }
            }
            tracing::debug!("event loop stopped");
        });

        let previous = self
            .event_loop
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// React to one transport event.
    pub async fn handle_transport_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::Ready => self.set_connection(true).await,
            TransportEvent::Disconnected { reason } => {
                tracing::debug!(%reason, "transceiver disconnected");
                self.set_connection(false).await;
            }
            TransportEvent::ConnectFailed => {
                tracing::error!(endpoint = ?self.config.endpoint, "unable to open the transceiver");
                self.set_connection(false).await;
            }
            TransportEvent::Response {
                description,
                sequence,
                code,
            } => tracing::debug!(%description, sequence, code, "transceiver response"),
            TransportEvent::Received(event) => {
                self.handle_event(&event).await;
            }
        }
    }

    /// Classify, decode and route one received message.
    ///
    /// Returns `None` when the event produced no state.
    pub async fn handle_event(&self, event: &RawEvent) -> Option<Observation> {
        let family = event.family.to_ascii_lowercase();
        let handle = self.classifier.classify(&family);
        tracing::debug!(%family, kind = ?handle.kind, "event received");

        let value = handle.decode(event);
        if let DecodedValue::Ignored(reason) = &value {
            report_ignored(&family, event, reason);
            return None;
        }

        let Some(physical_id) = event.physical_id() else {
            tracing::warn!(%family, "event without device identifier");
            return None;
        };
        let id = RegistryId::for_device(
            &self.config.namespace,
            &family,
            physical_id,
            event.unit_code,
        );

        let observation = self
            .registry
            .observe(&id, &value, now(), self.inclusion.is_active());
        match observation {
            Observation::UnknownDevice => {
                if handle.kind.is_passive() {
                    tracing::debug!(%id, "unknown device");
                } else {
                    tracing::warn!(%id, "unknown device");
                }
                return Some(observation);
            }
            Observation::Admitted => tracing::info!(%id, "device admitted"),
            Observation::Updated => {}
        }

        self.publish(StateUpdate::ack(id, value)).await;
        Some(observation)
    }

    async fn publish(&self, update: StateUpdate) {
        let id = update.id.clone();
        if let Err(err) = self.publisher.publish(update).await {
            tracing::warn!(%id, error = %err, "cannot publish state");
        }
    }

    /// Publish connectivity, only when it changed.
    async fn set_connection(&self, connected: bool) {
        {
            let mut last = self.connected.lock().unwrap_or_else(PoisonError::into_inner);
            if *last == Some(connected) {
                return;
            }
            *last = Some(connected);
        }
        tracing::info!(connected, "connection state changed");
        let id = RegistryId::for_namespace_state(&self.config.namespace, CONNECTION_STATE);
        self.publish(StateUpdate::ack(id, DecodedValue::Boolean(connected)))
            .await;
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .unwrap_or(false)
    }

    async fn publish_inclusion(&self, state: InclusionState) {
        let id = RegistryId::for_namespace_state(&self.config.namespace, INCLUSION_STATE);
        self.publish(StateUpdate::ack(id, DecodedValue::Boolean(state.active)))
            .await;
    }

    /// Apply the host's inclusion flag (`true`, `1`, `"true"`, `"1"` activate).
    pub fn set_inclusion(&self, flag: &serde_json::Value) -> InclusionState {
        self.inclusion.set(flag);
        self.inclusion.state()
    }

    #[must_use]
    pub fn inclusion(&self) -> InclusionState {
        self.inclusion.state()
    }

    /// A host state was written.
    ///
    /// Acknowledged writes are the bridge's own echoes and are ignored.
    ///
    /// # Errors
    ///
    /// Propagates the dispatcher failure after logging it.
    pub async fn handle_state_change(&self, id: &RegistryId, ack: bool) -> Result<(), RfxError> {
        if ack {
            return Ok(());
        }
        match self.dispatcher.dispatch(id).await {
            Ok(()) => Ok(()),
            Err(err) => {
                match &err {
                    RfxError::UnknownDevice(_) | RfxError::UnsupportedCommand(_) => {
                        tracing::warn!(%id, error = %err, "command rejected");
                    }
                    _ => tracing::error!(%id, error = %err, "cannot control device"),
                }
                Err(err)
            }
        }
    }

    /// The host changed (`Some`) or deleted (`None`) the object `id`.
    pub fn handle_object_change(&self, id: &RegistryId, object: Option<&ObjectDescriptor>) {
        match object {
            Some(object) => self.registry.apply_object(object, now()),
            None => {
                if self.registry.remove(id).is_some() {
                    tracing::info!(%id, "entry removed");
                }
            }
        }
    }

    /// Store `object` on behalf of the host and mirror it.
    ///
    /// # Errors
    ///
    /// Returns the store failure; the registry is left untouched.
    pub async fn put_object(&self, object: ObjectDescriptor) -> Result<ObjectDescriptor, RfxError> {
        let stored = self.store.set(object).await?;
        self.handle_object_change(&stored.id, Some(&stored));
        Ok(stored)
    }

    /// Delete `id` on behalf of the host and drop its entry.
    ///
    /// # Errors
    ///
    /// Returns the store failure; the registry is left untouched.
    pub async fn delete_object(&self, id: &RegistryId) -> Result<(), RfxError> {
        self.store.delete(id).await?;
        self.handle_object_change(id, None);
        Ok(())
    }

    /// Auto-repair entries silent for longer than the repair window.
    #[must_use]
    pub fn stale_entries(&self) -> Vec<RegistryEntry> {
        self.registry.stale_entries(now(), self.config.repair_window)
    }

    pub async fn list_endpoints(&self) -> Vec<Endpoint> {
        self.control.list_endpoints().await
    }

    /// # Errors
    ///
    /// See [`ControlService::program`].
    pub async fn program(&self, request: ProgramRequest) -> Result<(), RfxError> {
        self.control.program(request).await.inspect_err(|err| {
            tracing::error!(error = %err, "cannot program device");
        })
    }

    /// Tear down: connectivity off, inclusion timer, event loop, transport.
    pub async fn shutdown(&self) {
        self.set_connection(false).await;
        self.inclusion.shutdown();
        let handle = self
            .event_loop
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
        self.transport.close().await;
        self.devices.clear();
        tracing::info!("bridge stopped");
    }
}

fn report_ignored(family: &str, event: &RawEvent, reason: &IgnoreReason) {
    match reason {
        IgnoreReason::Reserved => {}
        IgnoreReason::LogOnly | IgnoreReason::NoReadings => {
            tracing::debug!(family, ?event, ?reason, "event not surfaced");
        }
        IgnoreReason::Unrecognized { command, subtype } => {
            tracing::warn!(family, command, ?subtype, "unrecognised command");
        }
        IgnoreReason::MissingLevel { command } => {
            tracing::warn!(family, command, "level command without level");
        }
        IgnoreReason::RawPassthrough => {
            tracing::warn!(family, payload = ?event.raw_payload, "unrecognised raw command");
        }
    }
}
