use crate::config::{render_preamble, SessionConfig, SESSION_SEPARATOR};
use crate::transcript::TranscriptStore;
use parley_agent::{ChatHandle, LlmClient};
use parley_core::{ParleyError, ParleyResult, Role};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// One logical dialogue with the remote model.
///
/// A session is bounded by two [`reset`](Self::reset) calls. Each reset
/// flushes the transcript, marks the boundary, and replaces the live
/// [`ChatHandle`] with a fresh one seeded by the personality preamble.
///
/// Methods take `&mut self`; use [`crate::SharedSession`] when several tasks
/// drive the same session.
pub struct ConversationSession {
    llm: Arc<LlmClient>,
    chat: ChatHandle,
    store: TranscriptStore,
    personality: String,
    preamble_template: String,
    apology: String,
    request_timeout: Duration,
}

impl ConversationSession {
    /// Build a session whose chat has not been seeded yet.
    ///
    /// Most callers want [`start`](Self::start).
    pub fn new(llm: Arc<LlmClient>, config: SessionConfig) -> Self {
        let request_timeout = config.request_timeout();
        Self {
            chat: ChatHandle::start(llm.clone()),
            llm,
            store: TranscriptStore::new(config.history_file, config.rotation_threshold_bytes),
            personality: config.personality,
            preamble_template: config.preamble_template,
            apology: config.apology,
            request_timeout,
        }
    }

    /// Build a session and run the initial reset.
    pub async fn start(llm: Arc<LlmClient>, config: SessionConfig) -> ParleyResult<Self> {
        let mut session = Self::new(llm, config);
        session.reset().await?;
        Ok(session)
    }

    /// Send `user_input` to the model and return its reply.
    ///
    /// Never fails: any model error or timeout is logged and answered with
    /// the configured apology, and nothing is recorded for that turn.
    pub async fn interact(&mut self, user_input: &str) -> String {
        match self.send(user_input).await {
            Ok(reply) => {
                self.store.record(Role::User, user_input);
                self.store.record(Role::Model, reply.as_str());
                reply
            }
            Err(e) => {
                warn!(chat_id = %self.chat.id(), error = %e, "Model call failed");
                self.apology.clone()
            }
        }
    }

    /// End the current session and seed a new one.
    ///
    /// A transcript flush failure is logged and the reset carries on; a
    /// failure to deliver the preamble is returned to the caller.
    pub async fn reset(&mut self) -> ParleyResult<()> {
        match self.store.flush().await {
            Ok(written) => info!(entries = written, "Transcript flushed"),
            Err(e) => error!(
                path = %self.store.path().display(),
                pending = self.store.len(),
                error = %e,
                "Transcript flush failed"
            ),
        }
        self.store.record(Role::System, SESSION_SEPARATOR);

        let previous = self.chat.id();
        self.chat = ChatHandle::start(self.llm.clone());
        info!(previous = %previous, chat_id = %self.chat.id(), "Session reset");

        let preamble = self.preamble();
        self.send(&preamble).await?;
        Ok(())
    }

    /// Takes effect at the next [`reset`](Self::reset).
    pub fn set_personality(&mut self, text: impl Into<String>) {
        self.personality = text.into();
    }

    pub fn personality(&self) -> &str {
        &self.personality
    }

    /// Preamble the next reset will send.
    pub fn preamble(&self) -> String {
        render_preamble(&self.preamble_template, &self.personality)
    }

    pub fn set_request_timeout(&mut self, timeout: Duration) {
        self.request_timeout = timeout;
    }

    /// Rendered transcript lines not yet flushed.
    pub fn print_history(&self) -> impl Iterator<Item = String> + '_ {
        self.store.print_all()
    }

    pub fn store(&self) -> &TranscriptStore {
        &self.store
    }

    pub fn chat(&self) -> &ChatHandle {
        &self.chat
    }

    /// Write any buffered transcript entries to disk.
    pub async fn flush(&mut self) -> ParleyResult<usize> {
        self.store.flush().await
    }

    /// Final flush before the process exits.
    pub async fn shutdown(mut self) -> ParleyResult<()> {
        self.flush().await?;
        Ok(())
    }

    async fn send(&mut self, text: &str) -> ParleyResult<String> {
        let deadline = self.request_timeout;
        tokio::time::timeout(deadline, self.chat.send_message(text))
            .await
            .map_err(|_| ParleyError::Timeout(deadline))?
    }
}
