//! # telerelay-app
//!
//! Application layer: the state-synchronization relay and its **port
//! definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `BrokerPublisher`: fire-and-forget publish to the message broker
//! - Hold the in-memory **`StateStore`** (latest value per channel)
//! - Fan updates out to live listeners through the **`SubscriberHub`**
//! - Drive both protocol handlers (telemetry in, commands in) through the
//!   **`RelayEngine`**, keeping store, broker and listeners in the same order
//!
//! ## Dependency rule
//! Depends on `telerelay-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod relay_engine;
pub mod state_store;
pub mod subscriber_hub;
