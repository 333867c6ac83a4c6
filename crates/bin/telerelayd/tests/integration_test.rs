//! End-to-end smoke tests for the full telerelayd stack.
//!
//! Each test wires the real registry, store, hub, engine and axum router
//! together with a recording broker publisher. HTTP routes are exercised via
//! `tower::ServiceExt::oneshot`; the live feed is exercised over a real TCP
//! socket with a WebSocket client.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures_util::StreamExt;
use http_body_util::BodyExt;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tower::ServiceExt;

use telerelay_adapter_http_axum::router;
use telerelay_adapter_http_axum::state::AppState;
use telerelay_app::ports::BrokerPublisher;
use telerelay_app::relay_engine::RelayEngine;
use telerelay_app::state_store::StateStore;
use telerelay_app::subscriber_hub::SubscriberHub;
use telerelay_domain::error::RelayError;
use telerelay_domain::registry::{ChannelRegistry, TopicTable};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Default)]
struct RecordingPublisher {
    published: Mutex<Vec<(String, String)>>,
}

impl RecordingPublisher {
    fn published(&self) -> Vec<(String, String)> {
        self.published.lock().unwrap().clone()
    }
}

impl BrokerPublisher for RecordingPublisher {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), RelayError> {
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), payload.to_string()));
        Ok(())
    }
}

struct TestApp {
    router: axum::Router,
    engine: Arc<RelayEngine<Arc<RecordingPublisher>>>,
    publisher: Arc<RecordingPublisher>,
}

/// Build a fully-wired router over the default topic table.
fn app() -> TestApp {
    let publisher = Arc::new(RecordingPublisher::default());
    let registry = Arc::new(
        ChannelRegistry::new(TopicTable::default()).expect("default topics should be valid"),
    );
    let store = Arc::new(StateStore::new(&registry));
    let hub = Arc::new(SubscriberHub::new(Arc::clone(&store), 16));
    let engine = Arc::new(RelayEngine::new(
        registry,
        store,
        hub,
        Arc::clone(&publisher),
    ));
    let router = router::build(AppState::from_arc(Arc::clone(&engine)));
    TestApp {
        router,
        engine,
        publisher,
    }
}

async fn post(app: &TestApp, uri: &str) -> (StatusCode, serde_json::Value) {
    let resp = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Serve the router on an ephemeral port and open a WebSocket to `/ws`.
async fn serve(app: &TestApp) -> std::net::SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app.router.clone();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn open(addr: std::net::SocketAddr) -> Client {
    let (client, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    client
}

async fn next_json(client: &mut Client) -> serde_json::Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("frame should arrive in time")
            .expect("stream should stay open")
            .unwrap();
        if msg.is_text() {
            return serde_json::from_str(msg.to_text().unwrap()).unwrap();
        }
    }
}

async fn wait_for_listeners(app: &TestApp, expected: usize) {
    for _ in 0..100 {
        if app.engine.hub().len() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!(
        "expected {expected} listeners, found {}",
        app.engine.hub().len()
    );
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let resp = app()
        .router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_publish_command_and_acknowledge() {
    let app = app();

    let (status, body) = post(&app, "/action/3/on").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({"message": "On", "buttonPressed": "home/switch3"})
    );
    assert_eq!(
        app.publisher.published(),
        [("home/switch3".to_string(), "true".to_string())]
    );
}

#[tokio::test]
async fn should_acknowledge_off_command() {
    let app = app();

    let (status, body) = post(&app, "/action/12/off").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Off");
    assert_eq!(body["buttonPressed"], "home/switch12");
    assert_eq!(
        app.publisher.published(),
        [("home/switch12".to_string(), "false".to_string())]
    );
}

#[tokio::test]
async fn should_reject_invalid_button_index() {
    let app = app();

    for index in ["0", "13", "-1", "abc"] {
        let (status, body) = post(&app, &format!("/action/{index}/on")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "index {index}");
        assert_eq!(body, serde_json::json!({"message": "Invalid button index"}));
    }
    assert!(app.publisher.published().is_empty());
}

#[tokio::test]
async fn should_reject_invalid_state() {
    let app = app();

    for state in ["toggle", "ON", "1"] {
        let (status, body) = post(&app, &format!("/action/1/{state}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "state {state}");
        assert_eq!(body, serde_json::json!({"message": "Invalid state"}));
    }
    assert!(app.publisher.published().is_empty());
}

// ---------------------------------------------------------------------------
// Live feed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_send_full_snapshot_on_connect() {
    let app = app();
    app.engine.handle_telemetry("water/a1", "87");
    let addr = serve(&app).await;

    let mut client = open(addr).await;
    let snapshot = next_json(&mut client).await;

    let buttons = snapshot["buttonStates"].as_array().unwrap();
    assert_eq!(buttons.len(), 12);
    assert!(buttons.iter().all(|state| state == "false"));
    assert_eq!(snapshot["sensorData"].as_object().unwrap().len(), 5);
    assert_eq!(snapshot["healthData"].as_object().unwrap().len(), 4);
    assert_eq!(snapshot["waterData"], serde_json::json!({"water1": "87"}));
}

#[tokio::test]
async fn should_push_partial_updates_after_snapshot() {
    let app = app();
    let addr = serve(&app).await;
    let mut client = open(addr).await;
    let _snapshot = next_json(&mut client).await;

    let (status, _) = post(&app, "/action/2/on").await;
    assert_eq!(status, StatusCode::OK);
    let update = next_json(&mut client).await;
    let object = update.as_object().unwrap();
    assert_eq!(object.len(), 1);
    assert_eq!(update["buttonStates"][1], "true");
    assert_eq!(update["buttonStates"][0], "false");

    app.engine.handle_telemetry("health/t3", "ok");
    let update = next_json(&mut client).await;
    assert_eq!(update.as_object().unwrap().len(), 1);
    assert_eq!(update["healthData"]["value3"], "ok");
}

#[tokio::test]
async fn should_fan_out_to_every_listener() {
    let app = app();
    let addr = serve(&app).await;
    let mut first = open(addr).await;
    let mut second = open(addr).await;
    let _ = next_json(&mut first).await;
    let _ = next_json(&mut second).await;

    app.engine.handle_telemetry("bme680/p1", "21.5");

    for client in [&mut first, &mut second] {
        let update = next_json(client).await;
        assert_eq!(update["sensorData"]["sensor1"], "21.5");
    }
}

#[tokio::test]
async fn should_unregister_listener_when_client_disconnects() {
    let app = app();
    let addr = serve(&app).await;
    let mut client = open(addr).await;
    let _ = next_json(&mut client).await;
    wait_for_listeners(&app, 1).await;

    client.close(None).await.unwrap();
    drop(client);

    wait_for_listeners(&app, 0).await;
    // Commands keep working with nobody listening.
    let (status, _) = post(&app, "/action/1/off").await;
    assert_eq!(status, StatusCode::OK);
}
