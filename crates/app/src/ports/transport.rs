//! Transport port — the RF transceiver.
//!
//! A transport delivers received protocol messages and lifecycle changes as a
//! broadcast stream and accepts encoded command frames. Serial framing and
//! device discovery are the adapter's business.

use std::future::Future;

use serde::Serialize;
use tokio::sync::broadcast;

use rfxhub_domain::error::RfxError;
use rfxhub_domain::event::RawEvent;
use rfxhub_domain::rty::CommandFrame;

/// Something observed on the transceiver.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// The transceiver finished its start-up handshake.
    Ready,
    Disconnected { reason: String },
    ConnectFailed,
    /// Acknowledgement frame for a previously written command.
    Response {
        description: String,
        sequence: u8,
        code: u8,
    },
    Received(RawEvent),
}

/// A serial port (or equivalent) the transceiver could be attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
}

impl Endpoint {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            manufacturer: None,
        }
    }
}

/// RF transceiver consumed by the bridge.
pub trait Transport: Send + Sync {
    /// Open `endpoint` and run the start-up handshake.
    ///
    /// Success is also reported as [`TransportEvent::Ready`] on the stream.
    fn initialise(&self, endpoint: &str) -> impl Future<Output = Result<(), RfxError>> + Send;

    /// Write one command frame; completes once the transceiver accepted it.
    fn write(&self, frame: &CommandFrame) -> impl Future<Output = Result<(), RfxError>> + Send;

    /// Subscribe to transport events emitted *after* this call.
    fn subscribe(&self) -> broadcast::Receiver<TransportEvent>;

    /// Enumerate the endpoints a transceiver could be attached to.
    fn list_endpoints(&self) -> impl Future<Output = Result<Vec<Endpoint>, RfxError>> + Send;

    /// Release the transceiver. Closing twice is a no-op.
    fn close(&self) -> impl Future<Output = ()> + Send;
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    fn initialise(&self, endpoint: &str) -> impl Future<Output = Result<(), RfxError>> + Send {
        (**self).initialise(endpoint)
    }

    fn write(&self, frame: &CommandFrame) -> impl Future<Output = Result<(), RfxError>> + Send {
        (**self).write(frame)
    }

    fn subscribe(&self) -> broadcast::Receiver<TransportEvent> {
        (**self).subscribe()
    }

    fn list_endpoints(&self) -> impl Future<Output = Result<Vec<Endpoint>, RfxError>> + Send {
        (**self).list_endpoints()
    }

    fn close(&self) -> impl Future<Output = ()> + Send {
        (**self).close()
    }
}
