//! Relay engine: applies broker telemetry and client commands to the store
//! and fans the resulting updates out to listeners.
//!
//! Each event runs *store write → broker publish → broadcast* under one
//! sequencing lock, so the order in which the store changes is the order in
//! which the broker and every listener see those changes. Nothing inside the
//! lock awaits: the publisher and the hub only enqueue.

use std::sync::{Arc, Mutex, PoisonError};

use telerelay_domain::channel::{Category, Channel};
use telerelay_domain::error::CommandError;
use telerelay_domain::registry::ChannelRegistry;
use telerelay_domain::switch::SwitchState;

use crate::ports::BrokerPublisher;
use crate::state_store::{SlotValue, StateStore};
use crate::subscriber_hub::SubscriberHub;

/// An actuation request as received from a client.
///
/// Both fields are kept verbatim; validation happens in
/// [`RelayEngine::handle_command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// 1-based switch index, as a decimal string.
    pub channel_index: String,
    /// Either `on` or `off`.
    pub desired_state: String,
}

impl CommandRequest {
    pub fn new(channel_index: impl Into<String>, desired_state: impl Into<String>) -> Self {
        Self {
            channel_index: channel_index.into(),
            desired_state: desired_state.into(),
        }
    }
}

/// Result of an accepted command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// The state the switch was set to.
    pub state: SwitchState,
    /// Broker topic the new state was published on.
    pub topic: String,
}

impl CommandOutcome {
    /// Human label for the new state (`On` / `Off`).
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.state.label()
    }
}

/// The state-synchronization relay.
pub struct RelayEngine<P> {
    registry: Arc<ChannelRegistry>,
    store: Arc<StateStore>,
    hub: Arc<SubscriberHub>,
    publisher: P,
    sequencer: Mutex<()>,
}

impl<P: BrokerPublisher> RelayEngine<P> {
    /// Create an engine over shared store and hub instances.
    pub fn new(
        registry: Arc<ChannelRegistry>,
        store: Arc<StateStore>,
        hub: Arc<SubscriberHub>,
        publisher: P,
    ) -> Self {
        Self {
            registry,
            store,
            hub,
            publisher,
            sequencer: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    #[must_use]
    pub fn hub(&self) -> &Arc<SubscriberHub> {
        &self.hub
    }

    /// Apply one inbound broker message.
    ///
    /// Topics that do not belong to a telemetry channel are dropped without
    /// error. Returns the channel that was updated, if any.
    #[tracing::instrument(level = "debug", skip(self, payload))]
    pub fn handle_telemetry(&self, topic: &str, payload: impl Into<String>) -> Option<Channel> {
        let Some(channel) = self.registry.resolve_telemetry(topic) else {
            tracing::trace!("no telemetry channel for topic, dropping");
            return None;
        };

        let _turn = self.sequencer.lock().unwrap_or_else(PoisonError::into_inner);
        self.store.set(channel, SlotValue::Text(payload.into()));
        let update = self.store.group_snapshot(channel.category);
        let delivered = self.hub.broadcast(update);
        tracing::debug!(%channel, delivered, "telemetry relayed");

        Some(channel)
    }

    /// Validate and apply one actuation command.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidChannel`] when the index is not a
    /// number in `1..=switch_count`, and [`CommandError::InvalidState`] when
    /// the state is not exactly `on` or `off`. In both cases nothing is
    /// written, published or broadcast.
    #[tracing::instrument(skip(self))]
    pub fn handle_command(&self, request: &CommandRequest) -> Result<CommandOutcome, CommandError> {
        let channel = self.switch_channel(&request.channel_index)?;
        let state = SwitchState::from_command(&request.desired_state)?;
        let topic = self
            .registry
            .topic(channel)
            .ok_or_else(|| CommandError::InvalidChannel {
                index: request.channel_index.clone(),
            })?
            .to_string();

        let _turn = self.sequencer.lock().unwrap_or_else(PoisonError::into_inner);
        self.store.set(channel, SlotValue::Switch(state));
        if let Err(err) = self.publisher.publish(&topic, state.wire_value()) {
            tracing::warn!(%err, %topic, "failed to publish switch state");
        }
        let delivered = self.hub.broadcast(self.store.group_snapshot(Category::Switch));
        tracing::info!(%channel, state = state.label(), delivered, "switch actuated");

        Ok(CommandOutcome { state, topic })
    }

    fn switch_channel(&self, raw_index: &str) -> Result<Channel, CommandError> {
        let invalid = || CommandError::InvalidChannel {
            index: raw_index.to_string(),
        };
        let index: usize = raw_index.parse().map_err(|_| invalid())?;
        if index == 0 || index > self.registry.count(Category::Switch) {
            return Err(invalid());
        }
        Ok(Channel::new(Category::Switch, index - 1))
    }
}
