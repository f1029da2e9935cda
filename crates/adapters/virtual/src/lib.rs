//! # rfxhub-adapter-virtual
//!
//! Virtual RF transceiver implementing the [`Transport`] port.
//!
//! It accepts command frames into a write log, acknowledges them with a
//! `Response` event, and (optionally) feeds events from simulated devices:
//!
//! | Device | Family | Behaviour |
//! |--------|--------|-----------|
//! | Simulated remote | `lighting1` | Alternates on / off |
//! | Simulated thermometer | `th1` | Temperature and humidity swing |
//! | Simulated meter | `elec2` | Power and growing energy total |
//!
//! Failure injection (`fail_initialise`, `fail_writes`) makes the error
//! paths of the bridge testable without hardware.
//!
//! ## Dependency rule
//!
//! Depends on `rfxhub-app` (port traits) and `rfxhub-domain` only.

pub mod config;
pub mod devices;
pub mod error;

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use rfxhub_app::ports::{Endpoint, Transport, TransportEvent};
use rfxhub_domain::error::RfxError;
use rfxhub_domain::event::RawEvent;
use rfxhub_domain::rty::CommandFrame;

pub use config::VirtualConfig;
use devices::SimulatedDevice;
pub use error::VirtualError;

const MANUFACTURER: &str = "rfxhub virtual";

/// A frame accepted by the transceiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrittenFrame {
    pub frame: CommandFrame,
    pub bytes: [u8; 13],
}

#[derive(Default)]
struct State {
    endpoint: Option<String>,
    sequence: u8,
    written: Vec<WrittenFrame>,
    feed: Option<JoinHandle<()>>,
}

/// Loopback transceiver with simulated devices.
pub struct VirtualTransceiver {
    config: VirtualConfig,
    devices: Vec<SimulatedDevice>,
    sender: broadcast::Sender<TransportEvent>,
    state: Mutex<State>,
}

impl VirtualTransceiver {
    #[must_use]
    pub fn new(config: VirtualConfig, capacity: usize) -> Self {
        Self::with_devices(config, SimulatedDevice::standard(), capacity)
    }

    #[must_use]
    pub fn with_devices(
        config: VirtualConfig,
        devices: Vec<SimulatedDevice>,
        capacity: usize,
    ) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            config,
            devices,
            sender,
            state: Mutex::new(State::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: TransportEvent) {
        // no subscriber, nothing to deliver
        let _ = self.sender.send(event);
    }

    /// Deliver `event` as if it had been received over the air.
    pub fn inject(&self, event: RawEvent) {
        self.emit(TransportEvent::Received(event));
    }

    /// Simulate the serial link dropping.
    pub fn disconnect(&self, reason: impl Into<String>) {
        let was_open = self.stop().is_some();
        if was_open {
            self.emit(TransportEvent::Disconnected {
                reason: reason.into(),
            });
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state().endpoint.is_some()
    }

    /// Every frame accepted so far, oldest first.
    #[must_use]
    pub fn written(&self) -> Vec<WrittenFrame> {
        self.state().written.clone()
    }

    fn stop(&self) -> Option<String> {
        let mut state = self.state();
        if let Some(feed) = state.feed.take() {
            feed.abort();
        }
        state.endpoint.take()
    }

    fn spawn_feed(&self) -> Option<JoinHandle<()>> {
        if !self.config.simulate || self.devices.is_empty() {
            return None;
        }
        let period = Duration::from_millis(self.config.interval_ms.max(1));
        let devices = self.devices.clone();
        let sender = self.sender.clone();
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // the first tick completes immediately
            ticker.tick().await;
            let mut tick: u64 = 0;
            loop {
                ticker.tick().await;
                for device in &devices {
                    let _ = sender.send(TransportEvent::Received(device.event(tick)));
                }
                tick = tick.wrapping_add(1);
            }
        }))
    }
}

impl Transport for VirtualTransceiver {
    async fn initialise(&self, endpoint: &str) -> Result<(), RfxError> {
        let known = self.config.endpoints.iter().any(|e| e == endpoint);
        if self.config.fail_initialise || !known {
            self.emit(TransportEvent::ConnectFailed);
            return Err(VirtualError::UnknownEndpoint(endpoint.to_string()).into());
        }

        self.stop();
        let feed = self.spawn_feed();
        {
            let mut state = self.state();
            state.endpoint = Some(endpoint.to_string());
            state.feed = feed;
        }
        tracing::info!(endpoint, simulate = self.config.simulate, "virtual transceiver open");
        self.emit(TransportEvent::Ready);
        Ok(())
    }

    async fn write(&self, frame: &CommandFrame) -> Result<(), RfxError> {
        let sequence = {
            let mut state = self.state();
            if state.endpoint.is_none() {
                return Err(VirtualError::NotOpen.into());
            }
            let sequence = state.sequence;
            state.sequence = state.sequence.wrapping_add(1);
            if self.config.fail_writes {
                return Err(VirtualError::WriteRejected { sequence }.into());
            }
            state.written.push(WrittenFrame {
                frame: *frame,
                bytes: frame.encode(sequence),
            });
            sequence
        };
        tracing::debug!(sequence, command = ?frame.command, "frame written");
        self.emit(TransportEvent::Response {
            description: "ACK - transmit OK".to_string(),
            sequence,
            code: 0,
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<TransportEvent> {
        self.sender.subscribe()
    }

    async fn list_endpoints(&self) -> Result<Vec<Endpoint>, RfxError> {
        Ok(self
            .config
            .endpoints
            .iter()
            .map(|path| Endpoint {
                path: path.clone(),
                manufacturer: Some(MANUFACTURER.to_string()),
            })
            .collect())
    }

    async fn close(&self) {
        if let Some(endpoint) = self.stop() {
            tracing::info!(%endpoint, "virtual transceiver closed");
            self.emit(TransportEvent::Disconnected {
                reason: "closed".to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfxhub_domain::rty::{RtyCommand, RtyConfig};

    const ENDPOINT: &str = "/dev/ttyVIRTUAL0";

    fn quiet() -> VirtualConfig {
        VirtualConfig {
            simulate: false,
            ..VirtualConfig::default()
        }
    }

    fn frame(command: RtyCommand) -> CommandFrame {
        RtyConfig {
            device_id: "0x0A1B2C".to_string(),
            unit_code: 1,
            subtype: 0,
            name: None,
        }
        .address()
        .unwrap()
        .frame(command)
    }

    #[tokio::test]
    async fn should_emit_ready_on_initialise() {
        let transceiver = VirtualTransceiver::new(quiet(), 16);
        let mut rx = transceiver.subscribe();

        transceiver.initialise(ENDPOINT).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), TransportEvent::Ready);
        assert!(transceiver.is_open());
    }

    #[tokio::test]
    async fn should_fail_to_open_unknown_endpoint() {
        let transceiver = VirtualTransceiver::new(quiet(), 16);
        let mut rx = transceiver.subscribe();

        let err = transceiver.initialise("/dev/ttyUSB9").await.unwrap_err();

        assert!(matches!(err, RfxError::Transport(_)));
        assert_eq!(rx.recv().await.unwrap(), TransportEvent::ConnectFailed);
        assert!(!transceiver.is_open());
    }

    #[tokio::test]
    async fn should_refuse_writes_before_initialise() {
        let transceiver = VirtualTransceiver::new(quiet(), 16);
        let err = transceiver.write(&frame(RtyCommand::Up)).await.unwrap_err();
        assert!(matches!(err, RfxError::Transport(_)));
        assert!(transceiver.written().is_empty());
    }

    #[tokio::test]
    async fn should_log_frames_with_increasing_sequence() {
        let transceiver = VirtualTransceiver::new(quiet(), 16);
        transceiver.initialise(ENDPOINT).await.unwrap();
        let mut rx = transceiver.subscribe();

        transceiver.write(&frame(RtyCommand::Up)).await.unwrap();
        transceiver.write(&frame(RtyCommand::Stop)).await.unwrap();

        let written = transceiver.written();
        assert_eq!(written.len(), 2);
        assert_eq!(written[0].bytes[3], 0);
        assert_eq!(written[1].bytes[3], 1);
        assert_eq!(written[1].bytes[8], 0x00);
        assert!(matches!(
            rx.recv().await.unwrap(),
            TransportEvent::Response { sequence: 0, code: 0, .. }
        ));
    }

    #[tokio::test]
    async fn should_reject_writes_when_failure_injected() {
        let transceiver = VirtualTransceiver::new(
            VirtualConfig {
                fail_writes: true,
                ..quiet()
            },
            16,
        );
        transceiver.initialise(ENDPOINT).await.unwrap();

        assert!(transceiver.write(&frame(RtyCommand::Down)).await.is_err());
        assert!(transceiver.written().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn should_feed_simulated_events_after_initialise() {
        let transceiver = VirtualTransceiver::new(
            VirtualConfig {
                interval_ms: 100,
                ..VirtualConfig::default()
            },
            16,
        );
        let mut rx = transceiver.subscribe();
        transceiver.initialise(ENDPOINT).await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), TransportEvent::Ready);

        let mut families = Vec::new();
        for _ in 0..3 {
            match rx.recv().await.unwrap() {
                TransportEvent::Received(event) => families.push(event.family),
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert_eq!(families, vec!["lighting1", "th1", "elec2"]);
        transceiver.close().await;
    }

    #[tokio::test]
    async fn should_emit_disconnected_once_on_close() {
        let transceiver = VirtualTransceiver::new(quiet(), 16);
        transceiver.initialise(ENDPOINT).await.unwrap();
        let mut rx = transceiver.subscribe();

        transceiver.close().await;
        transceiver.close().await;

        assert!(matches!(
            rx.recv().await.unwrap(),
            TransportEvent::Disconnected { .. }
        ));
        assert!(rx.try_recv().is_err());
        assert!(!transceiver.is_open());
    }

    #[tokio::test]
    async fn should_list_configured_endpoints() {
        let transceiver = VirtualTransceiver::new(quiet(), 16);
        let endpoints = transceiver.list_endpoints().await.unwrap();
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].path, ENDPOINT);
        assert_eq!(endpoints[0].manufacturer.as_deref(), Some(MANUFACTURER));
    }

    #[tokio::test]
    async fn should_deliver_injected_events() {
        let transceiver = VirtualTransceiver::new(quiet(), 16);
        let mut rx = transceiver.subscribe();

        transceiver.inject(RawEvent {
            family: "lighting2".to_string(),
            ..RawEvent::default()
        });

        assert!(matches!(
            rx.recv().await.unwrap(),
            TransportEvent::Received(ref event) if event.family == "lighting2"
        ));
    }
}
