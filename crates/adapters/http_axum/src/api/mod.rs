//! Command and live-update handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod action;
pub mod live;

use axum::Router;
use axum::routing::{get, post};

use telerelay_app::ports::BrokerPublisher;

use crate::state::AppState;

/// Build the relay routes.
pub fn routes<P>() -> Router<AppState<P>>
where
    P: BrokerPublisher + 'static,
{
    Router::new()
        .route("/action/{index}/{state}", post(action::trigger::<P>))
        .route("/ws", get(live::upgrade::<P>))
}
