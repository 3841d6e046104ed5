pub mod gemini;

use async_trait::async_trait;
use parley_core::{Message, ParleyResult};

/// Trait for remote model backends.
///
/// A backend is stateless: every call carries the full conversation history
/// that the caller wants the model to see, newest turn last.
///
/// To add a new provider:
/// 1. Create a new module in `backends/`
/// 2. Implement `LlmBackend` for your struct
/// 3. Hand it to [`crate::LlmClient::from_backend`]
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Generate the model's next reply for `messages`.
    async fn chat(&self, messages: &[Message]) -> ParleyResult<String>;
}
