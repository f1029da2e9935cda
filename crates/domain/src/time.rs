//! Time and timestamp helpers.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// UTC timestamp used for `last_seen_at`, inclusion expiry, state updates, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Timestamp `after` past `from`, saturating at the maximum representable time.
#[must_use]
pub fn after(from: Timestamp, after: Duration) -> Timestamp {
    chrono::Duration::from_std(after)
        .ok()
        .and_then(|delta| from.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Whether `last` lies further than `window` in the past of `now`.
///
/// A missing timestamp counts as outside any window.
#[must_use]
pub fn outside_window(last: Option<Timestamp>, now: Timestamp, window: Duration) -> bool {
    match last {
        Some(last) => after(last, window) < now,
        None => true,
    }
}
