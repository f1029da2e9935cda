//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod control;
#[allow(clippy::missing_errors_doc)]
pub mod entries;
#[allow(clippy::missing_errors_doc)]
pub mod objects;
pub mod sse;

use axum::Router;
use axum::routing::{get, post, put};

use rfxhub_app::ports::{ObjectStore, Transport};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<T, S>() -> Router<AppState<T, S>>
where
    T: Transport + 'static,
    S: ObjectStore + 'static,
{
    Router::new()
        // Registry
        .route("/entries", get(entries::list::<T, S>))
        .route("/entries/stale", get(entries::stale::<T, S>))
        .route("/entries/{id}", get(entries::get::<T, S>))
        // Control surface
        .route(
            "/inclusion",
            get(control::get_inclusion::<T, S>).put(control::set_inclusion::<T, S>),
        )
        .route("/connection", get(control::connection::<T, S>))
        .route("/endpoints", get(control::endpoints::<T, S>))
        .route("/program", post(control::program::<T, S>))
        .route("/states/{id}", post(control::change_state::<T, S>))
        // Host objects
        .route(
            "/objects/{id}",
            put(objects::put::<T, S>).delete(objects::delete::<T, S>),
        )
        // Live updates
        .route("/updates/stream", get(sse::stream::<T, S>))
}
