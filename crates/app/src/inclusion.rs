//! Inclusion mode controller.
//!
//! While inclusion is active, events from unknown devices are admitted into
//! the registry. An activation may carry a timeout; the window then closes on
//! its own unless it is deactivated or re-activated first. Re-activating
//! restarts the timer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use rfxhub_domain::inclusion::InclusionState;
use rfxhub_domain::time::{after, now};

pub use rfxhub_domain::inclusion::parse_flag;

#[derive(Default)]
struct Timer {
    /// Bumped on every transition so a superseded timer can never fire.
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

struct Shared {
    timer: Mutex<Timer>,
    sender: watch::Sender<InclusionState>,
}

impl Shared {
    fn timer(&self) -> MutexGuard<'_, Timer> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn expire(&self, generation: u64) {
        let mut timer = self.timer();
        if timer.generation != generation {
            return;
        }
        timer.generation += 1;
        timer.handle = None;
        self.sender.send_replace(InclusionState::inactive());
        tracing::info!("inclusion window expired");
    }
}

/// Owns the inclusion flag and its expiry timer.
pub struct InclusionController {
    timeout: Option<Duration>,
    shared: Arc<Shared>,
}

impl InclusionController {
    /// Create an inactive controller. A `None` or zero timeout never expires.
    #[must_use]
    pub fn new(timeout: Option<Duration>) -> Self {
        let (sender, _) = watch::channel(InclusionState::inactive());
        Self {
            timeout: timeout.filter(|timeout| !timeout.is_zero()),
            shared: Arc::new(Shared {
                timer: Mutex::new(Timer::default()),
                sender,
            }),
        }
    }

    /// Open (or re-open) the inclusion window.
    ///
    /// Must be called from within a Tokio runtime when a timeout is set.
    pub fn activate(&self) {
        let mut timer = self.shared.timer();
        timer.generation += 1;
        if let Some(handle) = timer.handle.take() {
            handle.abort();
        }

        let expires_at = self.timeout.map(|timeout| after(now(), timeout));
        self.shared
            .sender
            .send_replace(InclusionState::active_until(expires_at));

        if let Some(timeout) = self.timeout {
            let generation = timer.generation;
            let shared = Arc::clone(&self.shared);
            timer.handle = Some(tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                shared.expire(generation);
            }));
        }
        tracing::info!(timeout = ?self.timeout, "inclusion activated");
    }

    /// Close the inclusion window and cancel any pending expiry.
    pub fn deactivate(&self) {
        let mut timer = self.shared.timer();
        timer.generation += 1;
        if let Some(handle) = timer.handle.take() {
            handle.abort();
        }
        let was_active = self.shared.sender.send_if_modified(|state| {
            let changed = state.active;
            *state = InclusionState::inactive();
            changed
        });
        if was_active {
            tracing::info!("inclusion deactivated");
        }
    }

    /// Apply a loose host flag (`true`, `1`, `"true"`, `"1"` activate).
    pub fn set(&self, flag: &serde_json::Value) {
        if parse_flag(flag) {
            self.activate();
        } else {
            self.deactivate();
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.shared.sender.borrow().active
    }

    #[must_use]
    pub fn state(&self) -> InclusionState {
        *self.shared.sender.borrow()
    }

    /// Watch every transition, including timer expiry.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<InclusionState> {
        self.shared.sender.subscribe()
    }

    /// Cancel the timer without publishing a transition.
    pub fn shutdown(&self) {
        let mut timer = self.shared.timer();
        timer.generation += 1;
        if let Some(handle) = timer.handle.take() {
            handle.abort();
        }
    }

    #[must_use]
    pub fn has_pending_timer(&self) -> bool {
        self.shared.timer().handle.is_some()
    }
}

impl Drop for InclusionController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
