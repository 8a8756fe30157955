//! Application state shared by the form server and the CLI.

use std::sync::Arc;

use tracing::{info, warn, Instrument};
use uuid::Uuid;

use crate::credentials::CredentialSource;
use crate::dispatcher::Dispatcher;
use crate::error::{Error, Result};
use crate::types::Answer;

/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    credential_source: Option<CredentialSource>,
}

impl AppState {
    pub fn new(dispatcher: Arc<Dispatcher>, credential_source: Option<CredentialSource>) -> Self {
        Self {
            dispatcher,
            credential_source,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.credential_source.is_some()
    }

    /// Handle one form submission.
    ///
    /// Checks run in order: credential present, then non-blank text. Either
    /// failing returns before any outbound call.
    pub async fn submit(&self, user_text: &str, persona_label: &str) -> Result<Answer> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("submission", %request_id, persona = %persona_label);

        async {
            if !self.has_credential() {
                warn!("Submission rejected: no API credential");
                return Err(Error::MissingCredential);
            }

            let result = self.dispatcher.ask(user_text, persona_label).await;
            match &result {
                Ok(answer) => info!(chars = answer.text.chars().count(), "Submission answered"),
                Err(e) => warn!(error = %e.format_for_log(), "Submission failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}
