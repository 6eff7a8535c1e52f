//! Shared test utilities

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use sea_local_home::{Method, ResolvedAddress, Transport, TransportError};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// A request observed by [`MockTransport`]
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct SentRequest {
    pub address: ResolvedAddress,
    pub path: String,
}

/// In-memory transport: answers with a fixed value unless the target
/// hostname is marked offline
#[allow(dead_code)]
pub struct MockTransport {
    response: Value,
    offline: HashSet<String>,
    delay: Option<Duration>,
    sent: Mutex<Vec<SentRequest>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new(response: Value) -> Self {
        Self {
            response,
            offline: HashSet::new(),
            delay: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn offline(mut self, hostname: &str) -> Self {
        self.offline.insert(hostname.to_string());
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        address: &ResolvedAddress,
        _method: Method,
        path: &str,
        _body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        self.sent.lock().await.push(SentRequest {
            address: address.clone(),
            path: path.to_string(),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.offline.contains(&address.hostname) {
            return Err(TransportError::EmptyResponse);
        }
        Ok(self.response.clone())
    }
}

/// What the fake device answers on its state endpoint
#[allow(dead_code)]
#[derive(Clone)]
pub enum StateReply {
    Json(Value),
    Raw(&'static str),
}

/// Fake sensor firmware: serves `/api/google/state` and records the bodies
/// posted to `/api/google/homegraph`
#[allow(dead_code)]
pub struct FakeDevice {
    pub addr: SocketAddr,
    pub received: Arc<Mutex<Vec<Value>>>,
}

#[allow(dead_code)]
#[derive(Clone)]
struct FakeDeviceState {
    reply: StateReply,
    received: Arc<Mutex<Vec<Value>>>,
}

#[allow(dead_code)]
async fn state(State(device): State<FakeDeviceState>) -> axum::response::Response {
    use axum::response::IntoResponse;
    match device.reply {
        StateReply::Json(value) => Json(value).into_response(),
        StateReply::Raw(body) => body.into_response(),
    }
}

#[allow(dead_code)]
async fn homegraph(
    State(device): State<FakeDeviceState>,
    Json(body): Json<Value>,
) -> Json<Value> {
    device.received.lock().await.push(body.clone());
    Json(json!({ "requestId": body["requestId"], "payload": { "commands": [] } }))
}

/// Spawn a fake device on an ephemeral localhost port
#[allow(dead_code)]
pub async fn spawn_fake_device(reply: StateReply) -> FakeDevice {
    let received = Arc::new(Mutex::new(Vec::new()));
    let state_handle = FakeDeviceState {
        reply,
        received: received.clone(),
    };
    let app = Router::new()
        .route("/api/google/state", get(state))
        .route("/api/google/homegraph", post(homegraph))
        .with_state(state_handle);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind fake device");
    let addr = listener.local_addr().expect("fake device has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake device crashed");
    });

    FakeDevice { addr, received }
}

/// Reserve a localhost port with nothing listening on it
#[allow(dead_code)]
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind probe listener");
    listener.local_addr().expect("probe has no address").port()
}
