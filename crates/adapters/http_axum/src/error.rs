//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use telerelay_domain::error::{CommandError, RelayError};

/// JSON error body returned by the command endpoint.
#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

/// Maps [`RelayError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(RelayError);

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl From<CommandError> for ApiError {
    fn from(err: CommandError) -> Self {
        Self(RelayError::Command(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            RelayError::Command(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            RelayError::Broker(err) => internal(&**err),
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

fn internal(err: &dyn std::error::Error) -> (StatusCode, String) {
    tracing::error!(error = %err, "relay error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal server error".to_string(),
    )
}
