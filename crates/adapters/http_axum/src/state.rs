//! Shared application state for axum handlers.

use std::sync::Arc;

use rfxhub_app::bridge::Bridge;
use rfxhub_app::state_bus::InProcessStateBus;

/// The bridge as seen by the HTTP layer: updates go through the state bus.
pub type HttpBridge<T, S> = Bridge<T, S, InProcessStateBus>;

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the transport and store types do not
/// need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<T, S> {
    pub bridge: Arc<HttpBridge<T, S>>,
    /// Source of the SSE update stream.
    pub state_bus: Arc<InProcessStateBus>,
}

impl<T, S> Clone for AppState<T, S> {
    fn clone(&self) -> Self {
        Self {
            bridge: Arc::clone(&self.bridge),
            state_bus: Arc::clone(&self.state_bus),
        }
    }
}

impl<T, S> AppState<T, S> {
    pub fn new(bridge: Arc<HttpBridge<T, S>>, state_bus: Arc<InProcessStateBus>) -> Self {
        Self { bridge, state_bus }
    }
}
