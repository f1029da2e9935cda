//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`RfxError`]
//! at port boundaries. Unrecognised protocol variants are deliberately *not*
//! errors: decoders report them as
//! [`IgnoreReason`](crate::value::IgnoreReason) diagnostics.

/// Top-level error for every fallible operation in the bridge.
#[derive(Debug, thiserror::Error)]
pub enum RfxError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("unknown device")]
    UnknownDevice(#[from] UnknownDeviceError),

    #[error("unsupported command")]
    UnsupportedCommand(#[from] UnsupportedCommandError),

    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A configuration or input value violates a domain invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("identifier must not be empty")]
    EmptyIdentifier,

    #[error("invalid device id {value:?}, expected a hexadecimal value up to {max:#x}")]
    InvalidDeviceId { value: String, max: u32 },

    #[error("unknown write-only device subtype {0}")]
    UnknownSubtype(u8),

    #[error("unit code {unit_code} out of range {min}..={max}")]
    UnitCodeOutOfRange { unit_code: u8, min: u8, max: u8 },

    #[error("{0:?} is not a state identifier")]
    NotAStateId(String),

    #[error("object id {body:?} does not match {path:?}")]
    IdMismatch { path: String, body: String },
}

/// An event or command referenced a registry id with no entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown device {id:?}")]
pub struct UnknownDeviceError {
    pub id: String,
}

/// The requested command is not part of the device's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported command {command:?} for {device:?}")]
pub struct UnsupportedCommandError {
    pub device: String,
    pub command: String,
}
