//! In-process fake of the chat completion endpoint for tests.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// What the fake endpoint answers with
#[derive(Debug, Clone)]
pub enum FakeReply {
    /// A well-formed completion whose content is the given text
    Text(String),
    /// A non-success status with the given body
    Status(u16, String),
    /// A 200 with the given raw JSON body
    RawJson(String),
}

/// One request as seen by the fake endpoint
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub body: Value,
    pub authorization: Option<String>,
}

#[derive(Clone)]
struct FakeState {
    reply: FakeReply,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

pub struct FakeCompletionServer {
    /// Base URL to configure the client with, ending in `/v1`
    pub base_url: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl FakeCompletionServer {
    pub async fn spawn(reply: FakeReply) -> Self {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            reply,
            captured: captured.clone(),
        };
        let app = Router::new()
            .route("/v1/chat/completions", post(handle_completion))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/v1", addr),
            captured,
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().clone()
    }
}

async fn handle_completion(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.captured.lock().push(CapturedRequest { body, authorization });

    match state.reply {
        FakeReply::Text(text) => Json(json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": text },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
        }))
        .into_response(),
        FakeReply::Status(code, body) => (
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        )
            .into_response(),
        FakeReply::RawJson(body) => {
            ([(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
    }
}
