//! Write-only RTY device model.
//!
//! An [`RtyDevice`] validates its configuration at construction, turns command
//! names into frames and describes the host objects it should own. It keeps
//! no state of its own: acknowledging a successful command is the dispatcher's
//! job.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::json;

use rfxhub_domain::error::{RfxError, UnsupportedCommandError};
use rfxhub_domain::id::RegistryId;
use rfxhub_domain::object::ObjectDescriptor;
use rfxhub_domain::rty::{RTY_FAMILY, RtyAddress, RtyCommand, RtyConfig};

use crate::ports::Transport;

/// One configured RTY device bound to a transport.
pub struct RtyDevice<T> {
    transport: Arc<T>,
    config: RtyConfig,
    address: RtyAddress,
}

impl<T> std::fmt::Debug for RtyDevice<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RtyDevice")
            .field("config", &self.config)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> RtyDevice<T> {
    /// Validate `config` and bind it to `transport`.
    ///
    /// # Errors
    ///
    /// Returns [`RfxError::Validation`] for an unknown subtype, a malformed or
    /// out of range device id, or a unit code outside the subtype's range.
    pub fn new(transport: Arc<T>, config: RtyConfig) -> Result<Self, RfxError> {
        let address = config.address()?;
        Ok(Self {
            transport,
            config,
            address,
        })
    }

    /// `<deviceId>/<unitCode>`.
    #[must_use]
    pub fn key(&self) -> String {
        self.config.key()
    }

    #[must_use]
    pub fn config(&self) -> &RtyConfig {
        &self.config
    }

    /// The command vocabulary, in state order.
    #[must_use]
    pub fn commands(&self) -> Vec<&'static str> {
        RtyCommand::ALL.into_iter().map(RtyCommand::as_str).collect()
    }

    /// Channel id of this device under `namespace`.
    #[must_use]
    pub fn channel_id(&self, namespace: &str) -> RegistryId {
        RegistryId::for_device(
            namespace,
            RTY_FAMILY,
            &self.config.device_id,
            self.config.unit_code,
        )
    }

    /// Send the pairing frame. Safe to repeat.
    ///
    /// # Errors
    ///
    /// Propagates the transport failure.
    #[tracing::instrument(skip(self), fields(device = %self.key()))]
    pub async fn program(&self) -> Result<(), RfxError> {
        self.transport
            .write(&self.address.frame(RtyCommand::Program))
            .await
    }

    /// Send the command called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RfxError::UnsupportedCommand`] without touching the transport
    /// when `name` is outside the vocabulary, otherwise propagates the
    /// transport failure.
    #[tracing::instrument(skip(self), fields(device = %self.key()))]
    pub async fn send_command(&self, name: &str) -> Result<(), RfxError> {
        let command: RtyCommand = name.parse().map_err(|_| UnsupportedCommandError {
            device: self.key(),
            command: name.to_string(),
        })?;
        self.transport.write(&self.address.frame(command)).await
    }

    /// Objects this device should own: one channel and one button per command.
    #[must_use]
    pub fn get_objects(&self, namespace: &str, display_name: &str) -> Vec<ObjectDescriptor> {
        let channel_id = self.channel_id(namespace);
        let commands = self.commands();
        let channel = ObjectDescriptor::channel(channel_id.clone(), display_name)
            .with_role("blind")
            .with_native("deviceId", json!(self.config.device_id))
            .with_native("unitCode", json!(self.config.unit_code))
            .with_native("subtype", json!(self.config.subtype))
            .with_native("commands", json!(commands));

        std::iter::once(channel)
            .chain(commands.into_iter().map(|command| {
                ObjectDescriptor::state(channel_id.child(command), format!("{display_name} {command}"))
                    .with_role("button")
                    .with_common("type", json!("boolean"))
                    .with_common("read", json!(false))
                    .with_common("write", json!(true))
            }))
            .collect()
    }
}

/// Write-only device models keyed by channel id.
pub struct RtyDevices<T> {
    by_channel: Mutex<HashMap<RegistryId, Arc<RtyDevice<T>>>>,
}

impl<T> Default for RtyDevices<T> {
    fn default() -> Self {
        Self {
            by_channel: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Transport> RtyDevices<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn devices(&self) -> MutexGuard<'_, HashMap<RegistryId, Arc<RtyDevice<T>>>> {
        self.by_channel.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Track `device` under its channel id in `namespace`, replacing any
    /// previous model for the same channel.
    pub fn insert(&self, namespace: &str, device: RtyDevice<T>) -> RegistryId {
        let id = device.channel_id(namespace);
        self.devices().insert(id.clone(), Arc::new(device));
        id
    }

    #[must_use]
    pub fn get(&self, channel: &RegistryId) -> Option<Arc<RtyDevice<T>>> {
        self.devices().get(channel).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.devices().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.devices().clear();
    }
}
