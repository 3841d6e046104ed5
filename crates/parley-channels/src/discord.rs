use crate::channel::{Channel, ChannelMessage};
use async_trait::async_trait;
use parley_core::{ParleyError, ParleyResult};
use serde::Serialize;
use tracing::debug;

const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

/// Longest message body Discord accepts, in characters.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Discord channel adapter.
///
/// Uses the Discord REST API for sending messages. Inbound messages arrive
/// from whatever process owns the gateway connection; see
/// [`crate::CommandDispatcher::run`].
pub struct DiscordChannel {
    bot_token: String,
    api_base: String,
    client: reqwest::Client,
}

// ── Discord API types ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CreateMessageRequest<'a> {
    content: &'a str,
}

// ── Implementation ──────────────────────────────────────────────────────────

impl DiscordChannel {
    /// Create a new `DiscordChannel` from the bot token issued by the
    /// Developer Portal.
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            api_base: DISCORD_API_BASE.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Point REST calls at a different API root.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    async fn post(&self, channel_id: &str, content: &str) -> ParleyResult<()> {
        let url = format!("{}/channels/{}/messages", self.api_base, channel_id);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bot {}", self.bot_token))
            .json(&CreateMessageRequest { content })
            .send()
            .await
            .map_err(|e| ParleyError::Channel(format!("Discord send error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ParleyError::Channel(format!(
                "Discord create message failed ({status}): {body}"
            )));
        }

        Ok(())
    }
}

/// Split `text` into pieces of at most `limit` characters.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(limit.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[async_trait]
impl Channel for DiscordChannel {
    fn name(&self) -> &str {
        "discord"
    }

    /// Long replies go out as several consecutive messages.
    async fn send(&self, message: ChannelMessage) -> ParleyResult<()> {
        let parts = split_message(&message.content, DISCORD_MESSAGE_LIMIT);
        debug!(channel_id = %message.channel_id, parts = parts.len(), "Discord send");
        for part in &parts {
            self.post(&message.channel_id, part).await?;
        }
        Ok(())
    }
}
