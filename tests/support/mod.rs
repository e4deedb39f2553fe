// Shared primitives for one-time server bootstrapping across integration tests.
#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use pong_server::use_cases::MatchSettings;
use serde_json::Value;
use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

// Ticks run faster than the production default so matches progress quickly.
pub const TEST_TICK: Duration = Duration::from_millis(5);
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

// Global address used by all tests after the server publishes its bound port.
static SERVER_ADDR: OnceLock<String> = OnceLock::new();
// One-time guard that ensures the server bootstrap path runs only once.
static SERVER_READY: OnceLock<()> = OnceLock::new();

// Ensure the test server is running and return its `host:port`.
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let published_addr = Arc::new(OnceLock::<String>::new());
        let published_addr_thread = Arc::clone(&published_addr);
        // Spawn an OS thread so the server outlives individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                // Bind to an ephemeral port to avoid collisions with local services.
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_addr_thread.set(addr.to_string());
                let settings = MatchSettings {
                    command_channel_capacity: 64,
                    event_channel_capacity: 128,
                    tick_interval: TEST_TICK,
                    rng_seed: Some(7),
                };
                pong_server::run_with_settings(listener, settings)
                    .await
                    .expect("server failed");
            });
        });
        wait_for_server_readiness(published_addr);
    });

    SERVER_ADDR
        .get()
        .expect("server addr should be initialized")
        .as_str()
}

// Wait for address publication and then for the socket to accept TCP connections.
fn wait_for_server_readiness(published_addr: Arc<OnceLock<String>>) {
    let addr = loop {
        if let Some(addr) = published_addr.get() {
            break addr.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    let _ = SERVER_ADDR.set(addr.clone());

    for _ in 0..100 {
        if std::net::TcpStream::connect(&addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}

// Open a WebSocket to `path` on the shared test server.
pub async fn connect(path: &str) -> WsClient {
    let addr = ensure_server();
    let (ws, _response) = connect_async(format!("ws://{addr}{path}"))
        .await
        .expect("websocket handshake");
    ws
}

pub async fn send_json(ws: &mut WsClient, value: Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .expect("send frame");
}

pub async fn send_text(ws: &mut WsClient, text: &str) {
    ws.send(Message::Text(text.to_string().into()))
        .await
        .expect("send frame");
}

// Next text frame as JSON, or `None` if nothing arrives within `wait`.
pub async fn try_next_json(ws: &mut WsClient, wait: Duration) -> Option<Value> {
    loop {
        let frame = tokio::time::timeout(wait, ws.next()).await.ok()??;
        match frame.expect("websocket frame") {
            Message::Text(text) => {
                return Some(serde_json::from_str(text.as_str()).expect("server sends JSON"));
            }
            Message::Close(_) => return None,
            _ => continue,
        }
    }
}

pub async fn next_json(ws: &mut WsClient) -> Value {
    try_next_json(ws, RECV_TIMEOUT)
        .await
        .expect("expected a message from the server")
}

// Skip messages until one with the given `type` arrives.
pub async fn next_of_type(ws: &mut WsClient, kind: &str) -> Value {
    loop {
        let value = next_json(ws).await;
        if value["type"] == kind {
            return value;
        }
    }
}

// Connect and read the `info` message; returns the socket and its match id.
pub async fn open_match(path: &str) -> (WsClient, String) {
    let mut ws = connect(path).await;
    let info = next_json(&mut ws).await;
    assert_eq!(info["type"], "info");
    let match_id = info["matchId"]
        .as_str()
        .expect("info carries a match id")
        .to_string();
    (ws, match_id)
}

pub fn start_message(match_id: &str, width: f64, height: f64, kind: Option<&str>) -> Value {
    let mut start = serde_json::json!({
        "matchId": match_id,
        "windowWidth": width,
        "windowHeight": height,
    });
    if let Some(kind) = kind {
        start["typeOfMatch"] = Value::from(kind);
    }
    serde_json::json!({ "type": "game.starting", "start": start })
}
