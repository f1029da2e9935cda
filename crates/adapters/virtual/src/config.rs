//! Virtual transceiver configuration.

use serde::Deserialize;

/// Configuration for the virtual transceiver.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VirtualConfig {
    /// Endpoints reported by enumeration and accepted by `initialise`.
    pub endpoints: Vec<String>,
    /// Emit events from the simulated devices once initialised.
    pub simulate: bool,
    /// Interval between two simulated events per device, in milliseconds.
    pub interval_ms: u64,
    /// Refuse to open any endpoint.
    pub fail_initialise: bool,
    /// Refuse every command frame.
    pub fail_writes: bool,
}

impl Default for VirtualConfig {
    fn default() -> Self {
        Self {
            endpoints: vec!["/dev/ttyVIRTUAL0".to_string()],
            simulate: true,
            interval_ms: 5_000,
            fail_initialise: false,
            fail_writes: false,
        }
    }
}
