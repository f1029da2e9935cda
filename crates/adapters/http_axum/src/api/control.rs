//! Control surface handlers: inclusion, connectivity, endpoints, programming
//! and state-change requests.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use rfxhub_app::ports::{Endpoint, ObjectStore, Transport};
use rfxhub_app::services::control::ProgramRequest;
use rfxhub_domain::error::RfxError;
use rfxhub_domain::id::RegistryId;
use rfxhub_domain::inclusion::InclusionState;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for toggling inclusion mode.
///
/// `active` accepts the loose forms hosts write (`true`, `1`, `"true"`,
/// `"1"`); anything else switches inclusion off.
#[derive(Deserialize)]
pub struct InclusionRequest {
    pub active: serde_json::Value,
}

/// Request body for a state change.
#[derive(Deserialize)]
pub struct StateChangeRequest {
    #[serde(default)]
    pub ack: bool,
}

#[derive(Serialize)]
pub struct ConnectionResponse {
    pub connected: bool,
}

/// Possible responses from command-style endpoints.
pub enum CommandResponse {
    Accepted,
}

impl IntoResponse for CommandResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Accepted => StatusCode::ACCEPTED.into_response(),
        }
    }
}

/// `GET /api/inclusion`
pub async fn get_inclusion<T, S>(State(state): State<AppState<T, S>>) -> Json<InclusionState>
where
    T: Transport + 'static,
    S: ObjectStore + 'static,
{
    Json(state.bridge.inclusion())
}

/// `PUT /api/inclusion`
pub async fn set_inclusion<T, S>(
    State(state): State<AppState<T, S>>,
    Json(req): Json<InclusionRequest>,
) -> Json<InclusionState>
where
    T: Transport + 'static,
    S: ObjectStore + 'static,
{
    Json(state.bridge.set_inclusion(&req.active))
}

/// `GET /api/connection`
pub async fn connection<T, S>(State(state): State<AppState<T, S>>) -> Json<ConnectionResponse>
where
    T: Transport + 'static,
    S: ObjectStore + 'static,
{
    Json(ConnectionResponse {
        connected: state.bridge.is_connected(),
    })
}

/// `GET /api/endpoints`
pub async fn endpoints<T, S>(State(state): State<AppState<T, S>>) -> Json<Vec<Endpoint>>
where
    T: Transport + 'static,
    S: ObjectStore + 'static,
{
    Json(state.bridge.list_endpoints().await)
}

/// `POST /api/program`
pub async fn program<T, S>(
    State(state): State<AppState<T, S>>,
    Json(req): Json<ProgramRequest>,
) -> Result<CommandResponse, ApiError>
where
    T: Transport + 'static,
    S: ObjectStore + 'static,
{
    state.bridge.program(req).await?;
    Ok(CommandResponse::Accepted)
}

/// `POST /api/states/{id}` — the host wrote a state.
///
/// Unacknowledged writes to a button state send the matching command.
pub async fn change_state<T, S>(
    State(state): State<AppState<T, S>>,
    Path(id): Path<String>,
    body: Option<Json<StateChangeRequest>>,
) -> Result<CommandResponse, ApiError>
where
    T: Transport + 'static,
    S: ObjectStore + 'static,
{
    let id: RegistryId = id.parse().map_err(RfxError::from)?;
    let ack = body.is_some_and(|Json(req)| req.ack);
    state.bridge.handle_state_change(&id, ack).await?;
    Ok(CommandResponse::Accepted)
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use rfxhub_domain::rty::RtyCommand;

    use crate::router::build;
    use crate::test_support::{started_state, test_state};

    fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn should_report_inclusion_off_by_default() {
        let (state, _) = test_state();
        let response = build(state)
            .oneshot(
                Request::builder()
                    .uri("/api/inclusion")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["active"], false);
    }

    #[tokio::test]
    async fn should_activate_inclusion_from_loose_flag() {
        let (state, _) = test_state();
        let bridge = std::sync::Arc::clone(&state.bridge);

        let response = build(state)
            .oneshot(json_request(
                "PUT",
                "/api/inclusion",
                &serde_json::json!({ "active": "1" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["active"], true);
        assert!(bridge.inclusion().active);
    }

    #[tokio::test]
    async fn should_report_disconnected_before_start() {
        let (state, _) = test_state();
        let response = build(state)
            .oneshot(
                Request::builder()
                    .uri("/api/connection")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(body_json(response).await["connected"], false);
    }

    #[tokio::test]
    async fn should_list_transport_endpoints() {
        let (state, _) = test_state();
        let response = build(state)
            .oneshot(
                Request::builder()
                    .uri("/api/endpoints")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            body_json(response).await,
            serde_json::json!([{ "path": "/dev/ttyUSB0" }])
        );
    }

    #[tokio::test]
    async fn should_program_transient_blind() {
        let (state, transport) = test_state();
        let response = build(state)
            .oneshot(json_request(
                "POST",
                "/api/program",
                &serde_json::json!({ "deviceId": "0x01", "unitCode": 2 }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let frames = transport.frames.lock().unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].command, RtyCommand::Program);
    }

    #[tokio::test]
    async fn should_reject_programming_unknown_family() {
        let (state, _) = test_state();
        let response = build(state)
            .oneshot(json_request(
                "POST",
                "/api/program",
                &serde_json::json!({ "deviceId": "0x01", "unitCode": 2, "type": "lighting2" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_send_command_for_button_state() {
        let (state, transport) = started_state().await;
        let response = build(state)
            .oneshot(json_request(
                "POST",
                "/api/states/rfxcom.0.rty.0x0A1B2C_1.down",
                &serde_json::json!({ "ack": false }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let frames = transport.frames.lock().unwrap();
        assert_eq!(frames.last().unwrap().command, RtyCommand::Down);
    }

    #[tokio::test]
    async fn should_ignore_acknowledged_state_writes() {
        let (state, transport) = started_state().await;
        let response = build(state)
            .oneshot(json_request(
                "POST",
                "/api/states/rfxcom.0.rty.0x0A1B2C_1.down",
                &serde_json::json!({ "ack": true }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert!(transport.frames.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_reject_command_outside_vocabulary() {
        let (state, _) = started_state().await;
        let response = build(state)
            .oneshot(json_request(
                "POST",
                "/api/states/rfxcom.0.rty.0x0A1B2C_1.blink",
                &serde_json::json!({}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_channel() {
        let (state, _) = started_state().await;
        let response = build(state)
            .oneshot(json_request(
                "POST",
                "/api/states/rfxcom.0.rty.0x0F0F0F_1.up",
                &serde_json::json!({}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
