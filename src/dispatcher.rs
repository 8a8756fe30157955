//! Completion dispatcher
//!
//! Turns a question and a persona label into one system-then-user exchange,
//! sends it through the injected backend, and hands back the reply text.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::backend::CompletionBackend;
use crate::error::{Error, Result};
use crate::persona::PersonaRegistry;
use crate::types::{Answer, CompletionRequest};

/// Sampling temperature for every request
pub const COMPLETION_TEMPERATURE: f32 = 0.0;

/// Stateless request/response front for the completion backend
pub struct Dispatcher {
    registry: PersonaRegistry,
    backend: Arc<dyn CompletionBackend>,
    model: String,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn CompletionBackend>, model: impl Into<String>) -> Self {
        Self {
            registry: PersonaRegistry::new(),
            backend,
            model: model.into(),
        }
    }

    pub fn registry(&self) -> &PersonaRegistry {
        &self.registry
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the exchange for `user_text` under `persona_label`
    pub fn build_request(&self, user_text: &str, persona_label: &str) -> CompletionRequest {
        if self.registry.resolve(persona_label).is_none() {
            warn!(persona = %persona_label, "Unknown persona, using default system prompt");
        }

        CompletionRequest::system_then_user(
            self.model.as_str(),
            COMPLETION_TEMPERATURE,
            self.registry.lookup(persona_label),
            user_text,
        )
    }

    /// Ask one question.
    ///
    /// Blank input is rejected before the backend is touched. Whatever the
    /// backend fails with is returned as a boundary error; nothing is retried.
    pub async fn ask(&self, user_text: &str, persona_label: &str) -> Result<Answer> {
        let user_text = user_text.trim();
        if user_text.is_empty() {
            return Err(Error::EmptyInput);
        }

        let request = self.build_request(user_text, persona_label);
        debug!(
            backend = self.backend.name(),
            model = %self.model,
            chars = user_text.chars().count(),
            "Dispatching completion"
        );

        let reply = self.backend.complete(request).await.map_err(|e| {
            if e.is_boundary_failure() {
                e
            } else {
                Error::boundary_request(e.to_string())
            }
        })?;

        if let Some(usage) = reply.usage {
            info!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion succeeded"
            );
        } else {
            info!("Completion succeeded");
        }

        Ok(Answer { text: reply.text })
    }
}
