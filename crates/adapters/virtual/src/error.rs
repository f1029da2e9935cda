//! Virtual transceiver error types.

use rfxhub_domain::error::RfxError;

/// Errors specific to the virtual transceiver.
#[derive(Debug, thiserror::Error)]
pub enum VirtualError {
    /// The endpoint is not one the transceiver offers.
    #[error("unable to open endpoint {0:?}")]
    UnknownEndpoint(String),

    /// A frame was written before `initialise` succeeded.
    #[error("transceiver is not open")]
    NotOpen,

    /// Failure injection refused the frame.
    #[error("transmit failed for sequence {sequence}")]
    WriteRejected { sequence: u8 },
}

impl VirtualError {
    /// Convert into a [`RfxError::Transport`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> RfxError {
        RfxError::Transport(Box::new(self))
    }
}

impl From<VirtualError> for RfxError {
    fn from(err: VirtualError) -> Self {
        err.into_domain()
    }
}
