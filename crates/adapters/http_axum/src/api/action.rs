//! Switch command handler.

use axum::Json;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use telerelay_app::ports::BrokerPublisher;
use telerelay_app::relay_engine::{CommandOutcome, CommandRequest};

use crate::error::ApiError;
use crate::state::AppState;

/// Body returned for an accepted command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionBody {
    /// `On` or `Off`.
    pub message: &'static str,
    /// Broker topic the new state was published on.
    pub button_pressed: String,
}

impl From<CommandOutcome> for ActionBody {
    fn from(outcome: CommandOutcome) -> Self {
        Self {
            message: outcome.label(),
            button_pressed: outcome.topic,
        }
    }
}

/// Possible responses from the action endpoint.
pub enum ActionResponse {
    Ok(Json<ActionBody>),
}

impl IntoResponse for ActionResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /action/{index}/{state}`
///
/// Segments that do not percent-decode to UTF-8 are passed on still encoded,
/// so the engine rejects them with the same JSON body as any other bad value.
pub async fn trigger<P>(
    State(state): State<AppState<P>>,
    uri: Uri,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<ActionResponse, ApiError>
where
    P: BrokerPublisher + 'static,
{
    let request = match path {
        Ok(Path((index, switch_state))) => CommandRequest::new(index, switch_state),
        Err(rejection) => {
            tracing::debug!(%rejection, path = uri.path(), "undecodable command path");
            raw_request(&uri)
        }
    };
    let outcome = state.engine.handle_command(&request)?;
    Ok(ActionResponse::Ok(Json(outcome.into())))
}

/// Rebuild the request from the last two raw segments of the path.
fn raw_request(uri: &Uri) -> CommandRequest {
    let mut segments = uri.path().rsplit('/');
    let switch_state = segments.next().unwrap_or_default();
    let index = segments.next().unwrap_or_default();
    CommandRequest::new(index, switch_state)
}
