//! Broker port: outbound publish to the message broker.

use std::sync::Arc;

use telerelay_domain::error::RelayError;

/// Publishes actuation messages to the broker.
///
/// Implementations must not block: the relay calls `publish` while it holds
/// its sequencing lock, so the message should be queued and the call return
/// immediately. Delivery is best effort; the relay logs errors and moves on.
pub trait BrokerPublisher: Send + Sync {
    /// Queue `payload` for publication on `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Broker`] when the message could not be queued.
    fn publish(&self, topic: &str, payload: &str) -> Result<(), RelayError>;
}

impl<T: BrokerPublisher> BrokerPublisher for Arc<T> {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), RelayError> {
        (**self).publish(topic, payload)
    }
}
