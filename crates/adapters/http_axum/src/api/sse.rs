//! Server-Sent Events (SSE) stream of state updates.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use rfxhub_app::ports::{ObjectStore, Transport};

use crate::state::AppState;

/// `GET /api/updates/stream` — every published state update, as JSON.
///
/// The stream runs until the client disconnects. Updates missed by a slow
/// client are skipped with a warning.
pub async fn stream<T, S>(
    State(state): State<AppState<T, S>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>
where
    T: Transport + 'static,
    S: ObjectStore + 'static,
{
    let updates = BroadcastStream::new(state.state_bus.subscribe()).filter_map(|result| {
        match result {
            Ok(update) => match serde_json::to_string(&update) {
                Ok(json) => Some(Ok(Event::default().event("state").data(json))),
                Err(err) => {
                    tracing::warn!(%err, "failed to serialize state update for SSE stream");
                    None
                }
            },
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "SSE subscriber lagged, updates dropped");
                None
            }
        }
    });

    Sse::new(updates).keep_alive(KeepAlive::default())
}
