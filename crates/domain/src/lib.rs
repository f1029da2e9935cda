//! # rfxhub-domain
//!
//! Pure domain model for the rfxhub RF transceiver bridge.
//!
//! ## Responsibilities
//! - Foundational types: registry identifiers, error conventions, timestamps
//! - Define **raw events** as delivered by an RF transceiver
//! - Define **decoded values** (boolean, percentage, named mode, sensor and
//!   energy readings) and the reasons an event may be ignored
//! - Define **registry entries** and the host-side **object descriptors**
//!   they are reconciled against
//! - Define the **write-only device** vocabulary and its command frame encoding
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod event;
pub mod inclusion;
pub mod object;
pub mod registry;
pub mod rty;
pub mod value;
