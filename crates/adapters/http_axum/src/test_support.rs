//! Hand-written port stubs shared by the handler tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use rfxhub_app::bridge::{Bridge, BridgeConfig};
use rfxhub_app::ports::{Endpoint, ObjectStore, Transport, TransportEvent};
use rfxhub_app::state_bus::InProcessStateBus;
use rfxhub_domain::error::RfxError;
use rfxhub_domain::id::RegistryId;
use rfxhub_domain::object::ObjectDescriptor;
use rfxhub_domain::rty::{CommandFrame, RtyConfig};

use crate::state::AppState;

pub(crate) struct StubTransport {
    pub frames: Mutex<Vec<CommandFrame>>,
    sender: broadcast::Sender<TransportEvent>,
}

impl StubTransport {
    fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self {
            frames: Mutex::new(Vec::new()),
            sender,
        }
    }
}

impl Transport for StubTransport {
    async fn initialise(&self, _endpoint: &str) -> Result<(), RfxError> {
        let _ = self.sender.send(TransportEvent::Ready);
        Ok(())
    }

    async fn write(&self, frame: &CommandFrame) -> Result<(), RfxError> {
        self.frames.lock().unwrap().push(*frame);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<TransportEvent> {
        self.sender.subscribe()
    }

    async fn list_endpoints(&self) -> Result<Vec<Endpoint>, RfxError> {
        Ok(vec![Endpoint::new("/dev/ttyUSB0")])
    }

    async fn close(&self) {}
}

#[derive(Default)]
pub(crate) struct StubStore {
    objects: Mutex<BTreeMap<RegistryId, ObjectDescriptor>>,
}

impl ObjectStore for StubStore {
    async fn get(&self, id: &RegistryId) -> Result<Option<ObjectDescriptor>, RfxError> {
        Ok(self.objects.lock().unwrap().get(id).cloned())
    }

    async fn set(&self, object: ObjectDescriptor) -> Result<ObjectDescriptor, RfxError> {
        self.objects
            .lock()
            .unwrap()
            .insert(object.id.clone(), object.clone());
        Ok(object)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectDescriptor>, RfxError> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .values()
            .filter(|object| object.id.is_within(prefix))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &RegistryId) -> Result<(), RfxError> {
        self.objects.lock().unwrap().remove(id);
        Ok(())
    }
}

pub(crate) type TestState = AppState<StubTransport, StubStore>;

/// Idle bridge: no endpoint, nothing started.
pub(crate) fn test_state() -> (TestState, Arc<StubTransport>) {
    state_with(BridgeConfig::default())
}

/// Bridge with one blind at `rfxcom.0.rty.0x0A1B2C_1`, started.
pub(crate) async fn started_state() -> (TestState, Arc<StubTransport>) {
    let (state, transport) = state_with(BridgeConfig {
        endpoint: Some("/dev/ttyUSB0".to_string()),
        rty_devices: vec![RtyConfig {
            device_id: "0x0A1B2C".to_string(),
            unit_code: 1,
            subtype: 0,
            name: Some("Kitchen".to_string()),
        }],
        ..BridgeConfig::default()
    });
    state.bridge.start().await;
    (state, transport)
}

fn state_with(config: BridgeConfig) -> (TestState, Arc<StubTransport>) {
    let transport = Arc::new(StubTransport::new());
    let state_bus = Arc::new(InProcessStateBus::new(64));
    let bridge = Arc::new(Bridge::new(
        config,
        Arc::clone(&transport),
        Arc::new(StubStore::default()),
        Arc::clone(&state_bus),
    ));
    (AppState::new(bridge, state_bus), transport)
}
