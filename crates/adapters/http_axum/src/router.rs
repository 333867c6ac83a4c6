//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use telerelay_app::ports::BrokerPublisher;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Includes a permissive [`CorsLayer`] so browser dashboards on other origins
/// can post commands, and a [`TraceLayer`] that logs each HTTP
/// request/response at the `DEBUG` level using the `tracing` ecosystem.
pub fn build<P>(state: AppState<P>) -> Router
where
    P: BrokerPublisher + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .merge(crate::api::routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
