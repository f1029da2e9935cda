//! # rfxhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Expose the bridge's **control surface** as a JSON API: registry
//!   inspection, inclusion mode, endpoint listing, device programming and
//!   state-change requests
//! - Accept host object writes and deletions (`/api/objects/{id}`) so the
//!   registry follows the operator's edits
//! - Stream every published state update over **Server-Sent Events**
//!
//! ## Dependency rule
//! Depends on `rfxhub-app` (bridge, ports, state bus) and `rfxhub-domain`
//! (types used in request/response mapping). Never leaks axum types into the
//! domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
