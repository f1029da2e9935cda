//! # rfxhubd — rfxhub daemon
//!
//! Composition root that wires the bridge to its adapters and serves the
//! control API.
//!
//! ## Responsibilities
//! - Load configuration (`rfxhub.toml` + environment overrides)
//! - Initialise `tracing` with the configured filter
//! - Construct the transceiver, object store and state bus
//! - Start the bridge and reconcile the configured devices
//! - Build the axum router, bind and serve
//! - Tear the bridge down on SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rfxhub_adapter_http_axum::router;
use rfxhub_adapter_http_axum::state::AppState;
use rfxhub_adapter_memory_store::InMemoryObjectStore;
use rfxhub_adapter_virtual::VirtualTransceiver;
use rfxhub_app::bridge::Bridge;
use rfxhub_app::state_bus::InProcessStateBus;

use crate::config::{Config, StoreConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("cannot load configuration")?;
    init_tracing(&config.logging.filter);

    // Adapters
    let transport = Arc::new(VirtualTransceiver::new(
        config.transceiver.clone(),
        config.bridge.event_buffer,
    ));
    let store = Arc::new(build_store(&config.store)?);
    let state_bus = Arc::new(InProcessStateBus::new(config.bridge.event_buffer));

    // Bridge
    let bridge = Arc::new(Bridge::new(
        config.bridge_config(),
        transport,
        store,
        Arc::clone(&state_bus),
    ));
    let report = bridge.start().await;
    tracing::info!(
        created = report.created.len(),
        updated = report.updated.len(),
        failed = report.failed.len(),
        "devices reconciled"
    );

    // HTTP
    let app = router::build(AppState::new(Arc::clone(&bridge), state_bus));
    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("cannot bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "rfxhubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    bridge.shutdown().await;
    Ok(())
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter {filter:?}: {err}");
        EnvFilter::new("info")
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn build_store(config: &StoreConfig) -> anyhow::Result<InMemoryObjectStore> {
    let store = match &config.seed {
        Some(path) => {
            let document = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read seed file {path}"))?;
            InMemoryObjectStore::from_json(&document)
                .with_context(|| format!("cannot load seed file {path}"))?
        }
        None => InMemoryObjectStore::new(),
    };
    Ok(match config.capacity {
        Some(limit) => store.with_capacity_limit(limit),
        None => store,
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
