//! Command dispatcher — routes host state requests to write-only devices.
//!
//! The order is fixed: resolve the channel, check the command against the
//! entry's vocabulary, send, and only then acknowledge. A transport failure
//! leaves the registry untouched.

use std::sync::Arc;

use rfxhub_domain::error::{RfxError, UnknownDeviceError, UnsupportedCommandError};
use rfxhub_domain::id::RegistryId;
use rfxhub_domain::value::DecodedValue;

use crate::ports::{StatePublisher, StateUpdate, Transport};
use crate::registry::Registry;
use crate::rty::RtyDevices;

pub struct CommandDispatcher<T, P> {
    registry: Arc<Registry>,
    devices: Arc<RtyDevices<T>>,
    publisher: P,
}

impl<T: Transport, P: StatePublisher> CommandDispatcher<T, P> {
    pub fn new(registry: Arc<Registry>, devices: Arc<RtyDevices<T>>, publisher: P) -> Self {
        Self {
            registry,
            devices,
            publisher,
        }
    }

    /// Execute the command addressed by `state_id` (`<channel>.<command>`).
    ///
    /// On success the channel's last value becomes the command name and the
    /// button state is reset with an acknowledged `false`.
    ///
    /// # Errors
    ///
    /// - [`RfxError::Validation`] if `state_id` has no command segment.
    /// - [`RfxError::UnknownDevice`] if the channel is not registered or has
    ///   no device model.
    /// - [`RfxError::UnsupportedCommand`] if the command is not in the
    ///   entry's command set.
    /// - [`RfxError::Transport`] if the transceiver refused the frame.
    #[tracing::instrument(skip_all, fields(%state_id))]
    pub async fn dispatch(&self, state_id: &RegistryId) -> Result<(), RfxError> {
        let (channel, command) = state_id.split_state()?;

        let commands = self
            .registry
            .commands_for(&channel)
            .ok_or_else(|| unknown(&channel))?;
        if !commands.contains(command) {
            return Err(UnsupportedCommandError {
                device: channel.to_string(),
                command: command.to_string(),
            }
            .into());
        }
        let device = self.devices.get(&channel).ok_or_else(|| unknown(&channel))?;

        device.send_command(command).await?;

        self.registry
            .record_value(&channel, DecodedValue::NamedMode(command.to_string()));
        self.publisher
            .publish(StateUpdate::ack(state_id.clone(), DecodedValue::Boolean(false)))
            .await?;
        tracing::info!(%channel, command, "command sent");
        Ok(())
    }
}

fn unknown(channel: &RegistryId) -> RfxError {
    UnknownDeviceError {
        id: channel.to_string(),
    }
    .into()
}
