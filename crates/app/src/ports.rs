//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the relay core and the outside world.
//! They are defined here (in `app`) so that both the relay and the adapter
//! layer can depend on them without creating circular dependencies.

pub mod broker;

pub use broker::BrokerPublisher;
