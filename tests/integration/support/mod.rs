//! Fake OpenAI-compatible chat-completion server for integration tests.

#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

/// API key the fake provider accepts.
pub const TEST_API_KEY: &str = "test-key";

/// How the fake provider answers.
#[derive(Debug, Clone)]
pub enum FakeReply {
    /// 200 with `choices[0].message.content` set to this text.
    Completion(String),
    /// This status with this raw body.
    Error(u16, String),
    /// 200 with a JSON body lacking `choices`.
    NoChoices,
}

/// A request the fake provider received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Value of the `Authorization` header.
    pub authorization: Option<String>,
    /// Decoded JSON body.
    pub body: Value,
}

#[derive(Clone)]
struct FakeState {
    reply: FakeReply,
    received: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Handle to a running fake provider.
pub struct FakeProvider {
    /// Base URL to configure the client with (ends in `/v1`).
    pub base_url: String,
    received: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: tokio::task::JoinHandle<()>,
}

impl FakeProvider {
    /// Requests received so far.
    pub fn received(&self) -> Vec<RecordedRequest> {
        self.received.lock().expect("lock poisoned").clone()
    }
}

impl Drop for FakeProvider {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Finds an available port for testing.
pub fn find_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind to port")
        .local_addr()
        .expect("Failed to get local addr")
        .port()
}

/// Serves `router` on a free local port and returns its base address.
pub async fn spawn_router(router: Router) -> (String, tokio::task::JoinHandle<()>) {
    let port = find_available_port();
    let addr = format!("127.0.0.1:{port}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server failed");
    });

    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    (format!("http://{addr}"), handle)
}

/// Starts a fake provider answering every completion with `reply`.
pub async fn spawn_fake_provider(reply: FakeReply) -> FakeProvider {
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = FakeState {
        reply,
        received: Arc::clone(&received),
    };

    let router = Router::new()
        .route("/v1/chat/completions", post(handle_completion))
        .with_state(state);

    let (addr, handle) = spawn_router(router).await;
    FakeProvider {
        base_url: format!("{addr}/v1"),
        received,
        handle,
    }
}

async fn handle_completion(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    state
        .received
        .lock()
        .expect("lock poisoned")
        .push(RecordedRequest {
            authorization,
            body,
        });

    match state.reply {
        FakeReply::Completion(content) => Json(json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        FakeReply::Error(status, body) => (
            StatusCode::from_u16(status).expect("valid status"),
            body,
        )
            .into_response(),
        FakeReply::NoChoices => Json(json!({ "id": "chatcmpl-test", "object": "chat.completion" }))
            .into_response(),
    }
}
