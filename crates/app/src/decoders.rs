//! Family decoders — pure functions from a [`RawEvent`] to a [`DecodedValue`].
//!
//! No decoder ever fails: anything that cannot be turned into state comes
//! back as [`DecodedValue::Ignored`] with the reason attached, and the caller
//! decides how loudly to report it.

pub mod lighting;
pub mod measurement;

use rfxhub_domain::event::RawEvent;
use rfxhub_domain::value::{DecodedValue, IgnoreReason};

use crate::classifier::DecoderHandle;

/// Decode `event` with the decoder `handle` resolved to.
#[must_use]
pub fn decode(handle: DecoderHandle, event: &RawEvent) -> DecodedValue {
    handle.decode(event)
}

/// Blinds remotes only surface their signal strength.
#[must_use]
pub fn blinds(event: &RawEvent) -> DecodedValue {
    DecodedValue::Signal(event.signal_strength)
}

/// Lighting4 (PT2262) carries application-specific codes only.
#[must_use]
pub fn raw_passthrough(_event: &RawEvent) -> DecodedValue {
    DecodedValue::Ignored(IgnoreReason::RawPassthrough)
}

#[must_use]
pub fn log_only(_event: &RawEvent) -> DecodedValue {
    DecodedValue::Ignored(IgnoreReason::LogOnly)
}
