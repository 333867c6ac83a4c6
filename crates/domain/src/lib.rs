//! # telerelay-domain
//!
//! Pure domain model for the telerelay telemetry/actuation relay.
//!
//! ## Responsibilities
//! - Define **Channels** (one addressable data point: a sensor, a health
//!   metric, a water metric or a switch) and their **Categories**
//! - Define the **ChannelRegistry** mapping broker topics to channels, and
//!   reject colliding topic tables at construction time
//! - Define **Switch states** and their wire / command / label encodings
//! - Define the **State update** payload pushed to live subscribers
//! - Define the error conventions shared by every layer
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;

pub mod channel;
pub mod registry;
pub mod switch;
pub mod update;
