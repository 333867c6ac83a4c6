//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`RelayError`]
//! via `#[from]` (no `String` variants). [`RegistryError`] is raised once at
//! startup and never crosses a port.

/// Top-level error for the relay.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// A command was rejected during validation.
    #[error("command rejected")]
    Command(#[from] CommandError),

    /// The broker adapter failed.
    #[error("broker error")]
    Broker(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Validation failures for actuation commands.
///
/// Both variants are raised before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The switch index is not a number in `1..=switch_count`.
    #[error("Invalid button index")]
    InvalidChannel {
        /// The index exactly as the caller sent it.
        index: String,
    },

    /// The desired state is neither `on` nor `off`.
    #[error("Invalid state")]
    InvalidState {
        /// The state literal exactly as the caller sent it.
        state: String,
    },
}

/// Failures while building a [`ChannelRegistry`](crate::registry::ChannelRegistry).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The same topic string is claimed by two slots.
    #[error("topic {topic:?} is claimed by both {first} and {second}")]
    DuplicateTopic {
        /// The colliding topic.
        topic: String,
        /// Wire name of the slot that claimed it first.
        first: String,
        /// Wire name of the slot that claimed it again.
        second: String,
    },

    /// A topic string is empty.
    #[error("empty topic for {slot}")]
    EmptyTopic {
        /// Wire name of the slot with the empty topic.
        slot: String,
    },
}
