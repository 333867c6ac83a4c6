//! Shared application state for axum handlers.

use std::sync::Arc;

use telerelay_app::ports::BrokerPublisher;
use telerelay_app::relay_engine::RelayEngine;
use telerelay_app::subscriber_hub::SubscriberHub;

/// Application state shared across all axum handlers.
///
/// Generic over the broker publisher to avoid dynamic dispatch.
/// `Clone` is implemented manually so `P` itself does not need to be `Clone`.
pub struct AppState<P> {
    /// The relay every handler drives.
    pub engine: Arc<RelayEngine<P>>,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<P> AppState<P>
where
    P: BrokerPublisher + 'static,
{
    /// Create a new application state from an engine already shared with
    /// background tasks (e.g. the MQTT bridge).
    pub fn from_arc(engine: Arc<RelayEngine<P>>) -> Self {
        Self { engine }
    }

    /// The listener hub behind the engine.
    #[must_use]
    pub fn hub(&self) -> Arc<SubscriberHub> {
        Arc::clone(self.engine.hub())
    }
}
