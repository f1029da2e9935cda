//! Host object handlers.
//!
//! Writes go to the object store and are mirrored into the registry, the way
//! an object-change subscription would on the host.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use rfxhub_app::ports::{ObjectStore, Transport};
use rfxhub_domain::error::{RfxError, ValidationError};
use rfxhub_domain::id::RegistryId;
use rfxhub_domain::object::ObjectDescriptor;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `PUT /api/objects/{id}`
pub async fn put<T, S>(
    State(state): State<AppState<T, S>>,
    Path(id): Path<String>,
    Json(object): Json<ObjectDescriptor>,
) -> Result<Json<ObjectDescriptor>, ApiError>
where
    T: Transport + 'static,
    S: ObjectStore + 'static,
{
    if object.id.as_str() != id {
        return Err(RfxError::from(ValidationError::IdMismatch {
            path: id,
            body: object.id.to_string(),
        })
        .into());
    }
    let stored = state.bridge.put_object(object).await?;
    Ok(Json(stored))
}

/// `DELETE /api/objects/{id}`
pub async fn delete<T, S>(
    State(state): State<AppState<T, S>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    T: Transport + 'static,
    S: ObjectStore + 'static,
{
    let id: RegistryId = id.parse().map_err(RfxError::from)?;
    state.bridge.delete_object(&id).await?;
    Ok(DeleteResponse::NoContent)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use rfxhub_domain::id::RegistryId;

    use crate::router::build;
    use crate::test_support::{started_state, test_state};

    fn put_request(uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn should_mirror_stored_object_into_registry() {
        let (state, _) = test_state();
        let bridge = Arc::clone(&state.bridge);

        let response = build(state)
            .oneshot(put_request(
                "/api/objects/rfxcom.0.lighting2.0x01_1",
                &serde_json::json!({
                    "_id": "rfxcom.0.lighting2.0x01_1",
                    "type": "channel",
                    "common": { "name": "Porch" },
                    "native": { "autoRepair": true }
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let id: RegistryId = "rfxcom.0.lighting2.0x01_1".parse().unwrap();
        let entry = bridge.registry().get(&id).unwrap();
        assert_eq!(entry.metadata.name, "Porch");
        assert!(entry.auto_repair);
    }

    #[tokio::test]
    async fn should_reject_body_id_that_differs_from_path() {
        let (state, _) = test_state();
        let response = build(state)
            .oneshot(put_request(
                "/api/objects/rfxcom.0.lighting2.0x01_1",
                &serde_json::json!({
                    "_id": "rfxcom.0.lighting2.0x02_1",
                    "type": "channel",
                    "common": { "name": "Porch" }
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_drop_entry_when_object_deleted() {
        let (state, _) = started_state().await;
        let bridge = Arc::clone(&state.bridge);
        let id: RegistryId = "rfxcom.0.rty.0x0A1B2C_1".parse().unwrap();
        assert!(bridge.registry().contains(&id));

        let response = build(state)
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/objects/rfxcom.0.rty.0x0A1B2C_1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(!bridge.registry().contains(&id));
    }
}
