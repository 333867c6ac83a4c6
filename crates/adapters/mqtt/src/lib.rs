//! # telerelay-adapter-mqtt
//!
//! MQTT adapter: connects the relay to the message broker.
//!
//! ## Responsibilities
//! - Connect to an MQTT broker via `rumqttc`
//! - Subscribe to every topic in the channel registry, again after each reconnect
//! - Feed inbound publishes to [`RelayEngine::handle_telemetry`]
//! - Implement the [`BrokerPublisher`] port for outbound switch commands
//!
//! ## Dependency rule
//! Same as other adapters: depends on `telerelay-app` and `telerelay-domain`.

mod config;
mod error;

pub use config::MqttConfig;
pub use error::MqttError;

use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS, SubscribeFilter};
use tokio::task::JoinHandle;

use telerelay_app::ports::BrokerPublisher;
use telerelay_app::relay_engine::RelayEngine;
use telerelay_domain::error::RelayError;
use telerelay_domain::registry::ChannelRegistry;

/// Outbound side of the broker connection.
///
/// Publishing only enqueues the message for the event loop, so it never
/// blocks the relay.
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
}

impl MqttPublisher {
    /// Ask the event loop to send a `DISCONNECT` to the broker.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::Client`] if the request queue is full or closed.
    pub fn disconnect(&self) -> Result<(), MqttError> {
        self.client.try_disconnect().map_err(MqttError::Client)
    }
}

impl BrokerPublisher for MqttPublisher {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), RelayError> {
        self.client
            .try_publish(topic, QoS::AtMostOnce, false, payload.as_bytes().to_vec())
            .map_err(|err| MqttError::Client(err).into())
    }
}

/// Inbound side of the broker connection: owns the `rumqttc` event loop.
pub struct MqttBridge {
    client: AsyncClient,
    eventloop: EventLoop,
    topics: Vec<String>,
    reconnect_delay: Duration,
}

/// Build the publisher and the bridge for one broker connection.
///
/// Nothing touches the network until [`MqttBridge::start`] polls the event loop.
#[must_use]
pub fn connect(config: &MqttConfig, registry: &ChannelRegistry) -> (MqttPublisher, MqttBridge) {
    let mut options = MqttOptions::new(
        config.client_id.clone(),
        config.broker_host.clone(),
        config.broker_port,
    );
    options.set_keep_alive(config.keep_alive());

    let (client, eventloop) = AsyncClient::new(options, config.channel_capacity.max(1));
    let bridge = MqttBridge {
        client: client.clone(),
        eventloop,
        topics: registry.topics().map(str::to_string).collect(),
        reconnect_delay: config.reconnect_delay(),
    };
    (MqttPublisher { client }, bridge)
}

impl MqttBridge {
    /// Topics subscribed on every (re)connection.
    #[must_use]
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// Spawn the event loop. It runs until the task is aborted.
    pub fn start<P>(self, engine: Arc<RelayEngine<P>>) -> JoinHandle<()>
    where
        P: BrokerPublisher + 'static,
    {
        tokio::spawn(self.run(engine))
    }

    async fn run<P: BrokerPublisher>(mut self, engine: Arc<RelayEngine<P>>) {
        loop {
            match self.eventloop.poll().await {
                Ok(event) => self.handle_event(event, &engine),
                Err(err) => {
                    tracing::warn!(
                        %err,
                        retry_in_secs = self.reconnect_delay.as_secs(),
                        "MQTT connection lost, retrying"
                    );
                    tokio::time::sleep(self.reconnect_delay).await;
                }
            }
        }
    }

    /// React to one event from the broker connection: subscribe after every
    /// `CONNACK`, relay every inbound `PUBLISH`.
    fn handle_event<P: BrokerPublisher>(&self, event: Event, engine: &RelayEngine<P>) {
        match event {
            Event::Incoming(Packet::ConnAck(_)) => {
                tracing::info!(topics = self.topics.len(), "connected to MQTT broker");
                if let Err(err) = self.subscribe_all() {
                    tracing::warn!(%err, "failed to queue MQTT subscriptions");
                }
            }
            Event::Incoming(Packet::Publish(publish)) => {
                let payload = String::from_utf8_lossy(&publish.payload).into_owned();
                tracing::debug!(topic = %publish.topic, %payload, "MQTT message received");
                engine.handle_telemetry(&publish.topic, payload);
            }
            _ => {}
        }
    }

    fn subscribe_all(&self) -> Result<(), MqttError> {
        let filters = self
            .topics
            .iter()
            .map(|topic| SubscribeFilter::new(topic.clone(), QoS::AtMostOnce));
        self.client
            .try_subscribe_many(filters)
            .map_err(MqttError::Client)
    }
}
