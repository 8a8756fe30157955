//! OpenAI-compatible API backend
//!
//! Implements `CompletionBackend` by POSTing to `{base_url}/chat/completions`
//! on OpenAI or any compatible server.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::OpenAiSettings;
use crate::error::{Error, Result};
use crate::types::{CompletionReply, CompletionRequest, TokenUsage};

use super::CompletionBackend;

// ─────────────────────────────────────────────────────────────────
// OpenAI API types (response)
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ─────────────────────────────────────────────────────────────────
// OpenAI Backend
// ─────────────────────────────────────────────────────────────────

/// OpenAI-compatible chat completion client
pub struct OpenAiBackend {
    client: Client,
    endpoint: String,
    api_key: Option<SecretString>,
}

impl OpenAiBackend {
    /// Build the client once at startup.
    pub fn new(settings: &OpenAiSettings, api_key: Option<SecretString>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let endpoint = format!("{}/chat/completions", settings.base_url.trim_end_matches('/'));

        info!(
            endpoint = %endpoint,
            model = %settings.model,
            authenticated = api_key.is_some(),
            "OpenAI-compatible backend created"
        );

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    /// Build the authorization header value (if an API key is set)
    fn auth_header(&self) -> Option<String> {
        self.api_key
            .as_ref()
            .map(|key| format!("Bearer {}", key.expose_secret()))
    }
}

/// Pull the human-readable message out of an error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionReply> {
        let start = Instant::now();

        let mut req = self.client.post(&self.endpoint).json(&request);
        if let Some(auth) = self.auth_header() {
            req = req.header("Authorization", auth);
        }

        let response = req.send().await.map_err(|e| {
            warn!(error = %e, "Completion request failed");
            Error::boundary_request(format!("Request error: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Completion endpoint returned an error");
            return Err(Error::BoundaryStatus {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::boundary_malformed(format!("Failed to parse API response: {}", e)))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::boundary_malformed("No choices in API response"))?
            .message
            .content
            .ok_or_else(|| Error::boundary_malformed("Completion has no text content"))?;

        let usage = parsed
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens));

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            chars = text.chars().count(),
            "Completion received"
        );

        Ok(CompletionReply { text, usage })
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
