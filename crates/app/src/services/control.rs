//! Control surface — host requests that are not state writes.

use std::sync::Arc;

use serde::Deserialize;

use rfxhub_domain::error::{RfxError, UnknownDeviceError};
use rfxhub_domain::id::RegistryId;
use rfxhub_domain::rty::{RTY_FAMILY, RtyConfig};

use crate::ports::{Endpoint, Transport};
use crate::rty::{RtyDevice, RtyDevices};

/// Placeholder endpoint returned when enumeration fails.
pub const ENDPOINT_NOT_AVAILABLE: &str = "Not available";

/// Request to pair a device with the transceiver.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRequest {
    pub device_id: String,
    pub unit_code: u8,
    #[serde(default)]
    pub subtype: u8,
    /// Family tag; defaults to `rty`.
    #[serde(default, rename = "type")]
    pub family: Option<String>,
}

impl ProgramRequest {
    fn family(&self) -> String {
        self.family
            .as_deref()
            .map(str::trim)
            .filter(|family| !family.is_empty())
            .unwrap_or(RTY_FAMILY)
            .to_ascii_lowercase()
    }
}

pub struct ControlService<T> {
    namespace: String,
    transport: Arc<T>,
    devices: Arc<RtyDevices<T>>,
}

impl<T: Transport> ControlService<T> {
    pub fn new(namespace: impl Into<String>, transport: Arc<T>, devices: Arc<RtyDevices<T>>) -> Self {
        Self {
            namespace: namespace.into(),
            transport,
            devices,
        }
    }

    /// Endpoints the transceiver could be attached to.
    ///
    /// Enumeration failures are logged and answered with a single
    /// [`ENDPOINT_NOT_AVAILABLE`] placeholder.
    pub async fn list_endpoints(&self) -> Vec<Endpoint> {
        match self.transport.list_endpoints().await {
            Ok(endpoints) => endpoints,
            Err(err) => {
                tracing::warn!(error = %err, "cannot enumerate endpoints");
                vec![Endpoint::new(ENDPOINT_NOT_AVAILABLE)]
            }
        }
    }

    /// Send the pairing frame for the device described by `request`.
    ///
    /// A configured device is programmed as is. An unconfigured RTY device is
    /// built on the fly from the request and programmed once.
    ///
    /// # Errors
    ///
    /// - [`RfxError::UnknownDevice`] for an unconfigured device of another family.
    /// - [`RfxError::Validation`] if the on-the-fly configuration is invalid.
    /// - [`RfxError::Transport`] if the transceiver refused the frame.
    #[tracing::instrument(skip(self))]
    pub async fn program(&self, request: ProgramRequest) -> Result<(), RfxError> {
        let family = request.family();
        let id = RegistryId::for_device(
            &self.namespace,
            &family,
            &request.device_id,
            request.unit_code,
        );

        if let Some(device) = self.devices.get(&id) {
            return device.program().await;
        }
        if family != RTY_FAMILY {
            return Err(UnknownDeviceError { id: id.to_string() }.into());
        }

        let transient = RtyDevice::new(
            Arc::clone(&self.transport),
            RtyConfig {
                device_id: request.device_id,
                unit_code: request.unit_code,
                subtype: request.subtype,
                name: None,
            },
        )?;
        tracing::info!(device = %transient.key(), "programming unconfigured device");
        transient.program().await
    }
}
