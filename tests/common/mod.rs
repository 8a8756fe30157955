//! Common test utilities and fixtures
//!
//! Provides an isolated working directory for the binary and a fake
//! chat completion endpoint.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use assert_cmd::Command;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Environment variables the binary reads; cleared so the host cannot leak in
const ADVISOR_ENV: &[&str] = &[
    "OPENAI_API_KEY",
    "ADVISOR_CONFIG",
    "ADVISOR_HOST",
    "ADVISOR_PORT",
    "ADVISOR_OPENAI_BASE_URL",
    "ADVISOR_OPENAI_MODEL",
    "ADVISOR_OPENAI_TIMEOUT_SECS",
    "ADVISOR_DOTENV_PATH",
    "ADVISOR_SECRETS_FILE",
    "ADVISOR_LOG_LEVEL",
    "ADVISOR_LOG_FILE",
    "ADVISOR_LOG_JSON",
    "RUST_LOG",
];

/// Temporary working directory with no config, `.env` or secrets file
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `name` relative to the sandbox
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// The advisor binary, run inside the sandbox with a clean environment
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("persona-advisor").unwrap();
        cmd.current_dir(self.dir.path());
        for var in ADVISOR_ENV {
            cmd.env_remove(var);
        }
        cmd.env("HOME", self.dir.path());
        cmd.env("XDG_CONFIG_HOME", self.dir.path().join(".config"));
        cmd
    }
}

/// What the fake endpoint answers with
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Status(u16, String),
}

/// One request seen by the fake endpoint
#[derive(Debug, Clone)]
pub struct Seen {
    pub body: Value,
    pub authorization: Option<String>,
}

#[derive(Clone)]
struct FakeState {
    reply: Reply,
    seen: Arc<Mutex<Vec<Seen>>>,
}

/// Chat completion endpoint on a background runtime
pub struct FakeApi {
    pub base_url: String,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl FakeApi {
    pub fn start(reply: Reply) -> Self {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            reply,
            seen: seen.clone(),
        };

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                let router = Router::new()
                    .route("/v1/chat/completions", post(complete))
                    .with_state(state);
                axum::serve(listener, router).await.unwrap();
            });
        });

        Self {
            base_url: format!("http://{}/v1", addr),
            seen,
        }
    }

    pub fn requests(&self) -> Vec<Seen> {
        self.seen.lock().clone()
    }
}

async fn complete(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.seen.lock().push(Seen {
        body,
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
    });

    match state.reply {
        Reply::Text(text) => (
            StatusCode::OK,
            Json(json!({
                "id": "chatcmpl-test",
                "object": "chat.completion",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": text },
                    "finish_reason": "stop"
                }],
                "usage": { "prompt_tokens": 42, "completion_tokens": 7, "total_tokens": 49 }
            })),
        ),
        Reply::Status(code, message) => (
            StatusCode::from_u16(code).unwrap(),
            Json(json!({ "error": { "message": message, "type": "test_error" } })),
        ),
    }
}
