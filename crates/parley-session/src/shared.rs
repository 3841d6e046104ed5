use crate::session::ConversationSession;
use parley_core::ParleyResult;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Cloneable handle to a [`ConversationSession`].
///
/// Every operation holds the session lock for its whole duration, remote
/// call included, so a reset never interleaves with an interact that would
/// use the chat it is replacing. Separate `SharedSession`s share nothing.
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<ConversationSession>>,
}

impl SharedSession {
    pub fn new(session: ConversationSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub async fn interact(&self, text: &str) -> String {
        self.inner.lock().await.interact(text).await
    }

    pub async fn reset(&self) -> ParleyResult<()> {
        self.inner.lock().await.reset().await
    }

    pub async fn set_personality(&self, text: impl Into<String>) {
        self.inner.lock().await.set_personality(text);
    }

    /// Change the personality and reset under a single lock acquisition.
    pub async fn set_personality_and_reset(&self, text: impl Into<String>) -> ParleyResult<()> {
        let mut session = self.inner.lock().await;
        session.set_personality(text);
        session.reset().await
    }

    pub async fn print_history(&self) -> Vec<String> {
        self.inner.lock().await.print_history().collect()
    }

    /// Flush buffered transcript entries; call once at process exit.
    pub async fn shutdown(&self) -> ParleyResult<()> {
        self.inner.lock().await.flush().await?;
        Ok(())
    }

    /// Exclusive access for inspection.
    pub async fn lock(&self) -> MutexGuard<'_, ConversationSession> {
        self.inner.lock().await
    }
}
