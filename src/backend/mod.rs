//! Completion backends
//!
//! The dispatcher talks to a `CompletionBackend`; production uses the
//! OpenAI-compatible HTTP client, tests inject the mock.

mod openai;
mod traits;

#[cfg(test)]
mod mock;

pub use openai::OpenAiBackend;
pub use traits::CompletionBackend;

#[cfg(test)]
pub use mock::MockBackend;
