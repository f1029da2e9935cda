//! # rfxhub-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `Transport` — the RF transceiver (events in, command frames out)
//!   - `ObjectStore` — the host's persistent channel/state objects
//!   - `StatePublisher` — the outbound state surface
//! - Classify and decode raw protocol events (`classifier`, `decoders`)
//! - Keep the **device registry** and the **inclusion mode** window
//! - Model write-only RTY devices and dispatch commands to them
//! - Reconcile desired objects with the host store (`services::synchronizer`)
//! - Tie everything to one transceiver in the [`bridge::Bridge`] orchestrator
//! - Provide **in-process infrastructure** (state bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `rfxhub-domain` only (plus `tokio` for channels, timers and the
//! event loop task). Never imports adapter crates. Adapters depend on *this*
//! crate, not the reverse.

pub mod bridge;
pub mod classifier;
pub mod decoders;
pub mod inclusion;
pub mod ports;
pub mod registry;
pub mod rty;
pub mod services;
pub mod state_bus;
