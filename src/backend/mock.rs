//! Mock backend for testing
//!
//! Records every request it receives and answers with a canned reply,
//! an echo of the exchange, or a failure.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::types::{CompletionReply, CompletionRequest};

use super::CompletionBackend;

#[derive(Debug, Clone)]
enum MockBehavior {
    Reply(String),
    Echo,
    Fail(String),
}

/// Recording test double for `CompletionBackend`
pub struct MockBackend {
    behavior: MockBehavior,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockBackend {
    fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `text`
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_behavior(MockBehavior::Reply(text.into()))
    }

    /// Answer with the system and user content joined by a newline
    pub fn echo() -> Self {
        Self::with_behavior(MockBehavior::Echo)
    }

    /// Fail every call with a boundary error carrying `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(MockBehavior::Fail(message.into()))
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl CompletionBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionReply> {
        let text = match &self.behavior {
            MockBehavior::Reply(text) => Ok(text.clone()),
            MockBehavior::Echo => Ok(request
                .messages
                .iter()
                .map(|turn| turn.content.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            MockBehavior::Fail(message) => Err(Error::boundary_request(message.clone())),
        };
        self.requests.lock().push(request);

        text.map(|text| CompletionReply { text, usage: None })
    }
}
