//! Registry inspection handlers.

use axum::Json;
use axum::extract::{Path, State};

use rfxhub_app::ports::{ObjectStore, Transport};
use rfxhub_domain::error::{RfxError, UnknownDeviceError};
use rfxhub_domain::id::RegistryId;
use rfxhub_domain::registry::RegistryEntry;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/entries`
pub async fn list<T, S>(State(state): State<AppState<T, S>>) -> Json<Vec<RegistryEntry>>
where
    T: Transport + 'static,
    S: ObjectStore + 'static,
{
    Json(state.bridge.registry().list())
}

/// `GET /api/entries/stale` — auto-repair devices silent past the repair window.
pub async fn stale<T, S>(State(state): State<AppState<T, S>>) -> Json<Vec<RegistryEntry>>
where
    T: Transport + 'static,
    S: ObjectStore + 'static,
{
    Json(state.bridge.stale_entries())
}

/// `GET /api/entries/{id}`
pub async fn get<T, S>(
    State(state): State<AppState<T, S>>,
    Path(id): Path<String>,
) -> Result<Json<RegistryEntry>, ApiError>
where
    T: Transport + 'static,
    S: ObjectStore + 'static,
{
    let id: RegistryId = id.parse().map_err(RfxError::from)?;
    state
        .bridge
        .registry()
        .get(&id)
        .map(Json)
        .ok_or_else(|| RfxError::from(UnknownDeviceError { id: id.to_string() }).into())
}
