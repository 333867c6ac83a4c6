//! # telerelayd: telerelay daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Build the channel registry, state store and subscriber hub
//! - Connect to the MQTT broker and spawn the bridge event loop
//! - Build the axum router, injecting the relay engine
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use telerelay_adapter_http_axum::state::AppState;
use telerelay_app::relay_engine::RelayEngine;
use telerelay_app::state_store::StateStore;
use telerelay_app::subscriber_hub::SubscriberHub;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .init();

    // Relay core
    let registry = Arc::new(config.registry()?);
    let store = Arc::new(StateStore::new(&registry));
    let hub = Arc::new(SubscriberHub::new(
        Arc::clone(&store),
        config.relay.listener_capacity,
    ));

    // Broker
    let (publisher, bridge) = telerelay_adapter_mqtt::connect(&config.mqtt, &registry);
    tracing::info!(
        host = %config.mqtt.broker_host,
        port = config.mqtt.broker_port,
        topics = bridge.topics().len(),
        "MQTT bridge configured"
    );

    let engine = Arc::new(RelayEngine::new(registry, store, hub, publisher.clone()));
    let bridge_task = bridge.start(Arc::clone(&engine));

    // HTTP
    let state = AppState::from_arc(engine);
    let app = telerelay_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("telerelayd listening on http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutting down");
    if let Err(err) = publisher.disconnect() {
        tracing::warn!(%err, "failed to queue MQTT disconnect");
    }
    bridge_task.abort();

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
