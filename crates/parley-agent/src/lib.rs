//! Remote language-model access for Parley.
//!
//! The [`LlmClient`] dispatches requests to an [`LlmBackend`] (Gemini by
//! default) and hands out [`ChatHandle`]s, each of which carries the history
//! of one remote conversation.

/// Provider backends.
pub mod backends;
/// Chat handles (one per remote conversation).
pub mod chat;
/// Model configuration.
pub mod config;
/// Backend dispatch.
pub mod llm;

pub use backends::LlmBackend;
pub use chat::ChatHandle;
pub use config::{HarmBlockThreshold, HarmCategory, ModelConfig, SafetySetting};
pub use llm::LlmClient;
