//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use rfxhub_domain::error::RfxError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`RfxError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(RfxError);

impl From<RfxError> for ApiError {
    fn from(err: RfxError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            RfxError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            RfxError::UnsupportedCommand(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            RfxError::UnknownDevice(err) => (StatusCode::NOT_FOUND, err.to_string()),
            RfxError::Transport(err) => {
                tracing::error!(error = %err, "transport error");
                (StatusCode::BAD_GATEWAY, format!("transport error: {err}"))
            }
            RfxError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfxhub_domain::error::{UnknownDeviceError, UnsupportedCommandError, ValidationError};

    fn status(err: RfxError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn should_map_each_error_kind_to_status() {
        assert_eq!(
            status(ValidationError::EmptyIdentifier.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(
                UnsupportedCommandError {
                    device: "ns.rty.0x01_1".to_string(),
                    command: "blink".to_string(),
                }
                .into()
            ),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(
                UnknownDeviceError {
                    id: "ns.rty.0x01_1".to_string(),
                }
                .into()
            ),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(RfxError::Transport("port closed".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(RfxError::Storage("disk full".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
