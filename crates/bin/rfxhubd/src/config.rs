//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `rfxhub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use rfxhub_adapter_virtual::VirtualConfig;
use rfxhub_app::bridge::BridgeConfig;
use rfxhub_domain::rty::RtyConfig;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    pub bridge: BridgeSection,
    /// Object store settings.
    pub store: StoreConfig,
    /// Virtual transceiver settings.
    #[serde(rename = "virtual")]
    pub transceiver: VirtualConfig,
    /// Write-only (RTY) devices to expose.
    pub rty_devices: Vec<RtyConfig>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Bridge settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BridgeSection {
    /// Prefix of every registry id.
    pub namespace: String,
    /// Transceiver endpoint; empty leaves the bridge idle.
    pub endpoint: Option<String>,
    /// Inclusion window length in milliseconds, `0` for no expiry.
    pub inclusion_timeout_ms: u64,
    /// Heartbeat window of auto-repair devices, in seconds.
    pub repair_window_secs: u64,
    /// Capacity of the transport and state broadcast channels.
    pub event_buffer: usize,
}

/// Object store configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file of host objects loaded at start-up.
    pub seed: Option<String>,
    /// Maximum number of stored objects.
    pub capacity: Option<usize>,
}

impl Config {
    /// Load configuration from `rfxhub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("rfxhub.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("RFXHUB_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("RFXHUB_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("RFXHUB_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("RFXHUB_ENDPOINT") {
            self.bridge.endpoint = Some(val);
        }
        if let Some(val) = var("RFXHUB_NAMESPACE") {
            self.bridge.namespace = val;
        }
        if let Some(ms) = var("RFXHUB_INCLUSION_TIMEOUT_MS").and_then(|val| val.parse().ok()) {
            self.bridge.inclusion_timeout_ms = ms;
        }
        if let Some(val) = var("RFXHUB_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.bridge.namespace.trim().is_empty() {
            return Err(ConfigError::Validation(
                "namespace must not be empty".to_string(),
            ));
        }
        if self.bridge.event_buffer == 0 {
            return Err(ConfigError::Validation(
                "event buffer must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Runtime settings handed to the bridge.
    #[must_use]
    pub fn bridge_config(&self) -> BridgeConfig {
        BridgeConfig {
            namespace: self.bridge.namespace.trim().to_string(),
            endpoint: self
                .bridge
                .endpoint
                .as_deref()
                .map(str::trim)
                .filter(|endpoint| !endpoint.is_empty())
                .map(str::to_string),
            inclusion_timeout: (self.bridge.inclusion_timeout_ms > 0)
                .then(|| Duration::from_millis(self.bridge.inclusion_timeout_ms)),
            repair_window: Duration::from_secs(self.bridge.repair_window_secs),
            rty_devices: self.rty_devices.clone(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "rfxhubd=info,rfxhub=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for BridgeSection {
    fn default() -> Self {
        Self {
            namespace: "rfxcom.0".to_string(),
            endpoint: Some("/dev/ttyVIRTUAL0".to_string()),
            inclusion_timeout_ms: 0,
            repair_window_secs: 600,
            event_buffer: 256,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
