use crate::backends::gemini::GeminiBackend;
use crate::backends::LlmBackend;
use crate::config::ModelConfig;
use parley_core::{Message, ParleyResult};

/// LLM client that dispatches to a provider backend.
///
/// Uses the `LlmBackend` trait to abstract away provider-specific API
/// differences. The client itself holds no conversation state; that lives in
/// [`crate::ChatHandle`].
pub struct LlmClient {
    backend: Box<dyn LlmBackend>,
}

impl LlmClient {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            backend: Box::new(GeminiBackend::new(config)),
        }
    }

    /// Create from a pre-built backend (for custom providers and tests).
    pub fn from_backend(backend: Box<dyn LlmBackend>) -> Self {
        Self { backend }
    }

    /// Non-streaming chat completion over the given history.
    pub async fn chat(&self, messages: &[Message]) -> ParleyResult<String> {
        self.backend.chat(messages).await
    }
}
