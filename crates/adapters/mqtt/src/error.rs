//! MQTT adapter error types.

use telerelay_domain::error::RelayError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc client could not queue a request.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),
}

impl MqttError {
    /// Convert into a [`RelayError::Broker`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> RelayError {
        RelayError::Broker(Box::new(self))
    }
}

impl From<MqttError> for RelayError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rumqttc::{AsyncClient, MqttOptions, QoS};

    /// A real client error: the request queue holds one entry and is full.
    fn queue_full_error() -> rumqttc::ClientError {
        let (client, _eventloop) = AsyncClient::new(MqttOptions::new("test", "localhost", 1883), 1);
        client
            .try_publish("a", QoS::AtMostOnce, false, "1")
            .unwrap();
        client
            .try_publish("a", QoS::AtMostOnce, false, "2")
            .unwrap_err()
    }

    #[test]
    fn should_display_client_error() {
        let err = MqttError::Client(queue_full_error());
        assert_eq!(err.to_string(), "MQTT client error");
    }

    #[test]
    fn should_convert_client_error_to_broker_error() {
        let err: RelayError = MqttError::Client(queue_full_error()).into();
        assert!(matches!(err, RelayError::Broker(_)));
    }
}
