use async_trait::async_trait;
use parley_core::ParleyResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub channel_id: String,
    pub sender_id: String,
    pub content: String,
    /// Set for messages authored by bots, including ourselves.
    #[serde(default)]
    pub from_bot: bool,
}

impl ChannelMessage {
    /// A bot-authored message addressed to the same channel.
    pub fn reply(&self, content: impl Into<String>) -> Self {
        Self {
            channel_id: self.channel_id.clone(),
            sender_id: "parley".to_string(),
            content: content.into(),
            from_bot: true,
        }
    }
}

#[derive(Debug)]
pub enum ChannelEvent {
    MessageReceived(ChannelMessage),
    Connected(String),
    Disconnected(String),
}

#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;
    async fn send(&self, message: ChannelMessage) -> ParleyResult<()>;
}
