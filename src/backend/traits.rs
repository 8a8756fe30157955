//! Backend trait definitions
//!
//! Defines the `CompletionBackend` seam between the dispatcher and the
//! hosted completion endpoint.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CompletionReply, CompletionRequest};

/// A chat-style completion endpoint.
///
/// Implementations make exactly one outbound call per `complete` and never
/// retry. Failures are reported as boundary errors.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Send one exchange and return the reply text
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionReply>;
}
