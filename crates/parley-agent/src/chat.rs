use crate::llm::LlmClient;
use parley_core::{Message, ParleyResult};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// One live conversation with the remote model.
///
/// The handle keeps the conversation history client-side and sends all of it
/// with every turn. A turn only becomes part of the history once the model
/// has answered it, so a failed send leaves the handle exactly as it was.
pub struct ChatHandle {
    id: Uuid,
    llm: Arc<LlmClient>,
    history: Vec<Message>,
}

impl ChatHandle {
    /// Start a conversation with empty history.
    pub fn start(llm: Arc<LlmClient>) -> Self {
        let id = Uuid::new_v4();
        debug!(chat_id = %id, "Started chat");
        Self {
            id,
            llm,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Turns accepted so far, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Send `text` as the next user turn and return the model's reply.
    pub async fn send_message(&mut self, text: &str) -> ParleyResult<String> {
        let user = Message::user(text);
        let mut request = Vec::with_capacity(self.history.len() + 1);
        request.extend_from_slice(&self.history);
        request.push(user.clone());

        let reply = self.llm.chat(&request).await?;

        self.history.push(user);
        self.history.push(Message::model(reply.clone()));
        Ok(reply)
    }
}
