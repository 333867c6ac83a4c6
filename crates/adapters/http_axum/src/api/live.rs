//! WebSocket feed of live state updates.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;

use telerelay_app::ports::BrokerPublisher;
use telerelay_app::subscriber_hub::SubscriberHub;

use crate::state::AppState;

/// `GET /ws`: upgrade to a WebSocket carrying state updates.
///
/// The first frame is the full state; every later frame holds only the group
/// that changed. Frames sent by the client are logged and otherwise ignored.
pub async fn upgrade<P>(ws: WebSocketUpgrade, State(state): State<AppState<P>>) -> Response
where
    P: BrokerPublisher + 'static,
{
    let hub = state.hub();
    ws.on_upgrade(move |socket| forward(socket, hub))
}

/// Pump hub updates into one socket until either side goes away.
async fn forward(mut socket: WebSocket, hub: Arc<SubscriberHub>) {
    let mut listener = hub.register();
    let id = listener.id();

    loop {
        tokio::select! {
            update = listener.recv() => {
                let Some(update) = update else {
                    tracing::debug!(listener = %id, "listener dropped by hub, closing socket");
                    break;
                };
                let text = match serde_json::to_string(&*update) {
                    Ok(text) => text,
                    Err(err) => {
                        tracing::warn!(%err, "failed to serialize state update");
                        continue;
                    }
                };
                if let Err(err) = socket.send(Message::Text(text.into())).await {
                    tracing::debug!(listener = %id, %err, "failed to deliver update");
                    break;
                }
            }
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    tracing::debug!(listener = %id, message = %text.as_str(), "received message from client");
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    tracing::debug!(listener = %id, %err, "socket error");
                    break;
                }
            },
        }
    }

    hub.unregister(id);
}
