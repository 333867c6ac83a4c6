//! # telerelay-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - `POST /action/{index}/{state}`: map a switch command into
//!   [`RelayEngine::handle_command`](telerelay_app::relay_engine::RelayEngine::handle_command)
//!   and the result into JSON
//! - `GET /ws`: upgrade to a WebSocket, register one hub listener for it and
//!   forward every state update as a JSON text frame
//! - `GET /health`: liveness probe
//!
//! ## Dependency rule
//! Depends on `telerelay-app` (for the engine and hub) and `telerelay-domain`
//! (for error and payload types). Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
