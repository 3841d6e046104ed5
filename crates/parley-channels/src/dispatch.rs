use crate::channel::{Channel, ChannelEvent, ChannelMessage};
use parley_session::SharedSession;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub const RESET_REPLY: &str = "Successfully wiped models history!";
pub const PERSONALITY_REPLY: &str = "Successfully performed the changes!";
pub const EMPTY_HISTORY_REPLY: &str = "No unsaved history.";

/// A request a user can make of the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Forward text to the model.
    Chat(String),
    /// Flush the transcript and start a fresh conversation.
    Reset,
    /// Replace the personality, then reset.
    Personality(String),
    /// Show transcript lines not yet written to disk.
    History,
}

impl Command {
    /// Parse a raw message.
    ///
    /// Slash commands (`/chat`, `/reset`, `/personality`, `/history`) are
    /// always recognised. Other text is chat only when it starts with
    /// `mention_prefix` followed by a space; with no prefix every other
    /// non-empty message is chat. Anything else yields `None`.
    pub fn parse(content: &str, mention_prefix: Option<&str>) -> Option<Self> {
        let content = content.trim();

        if let Some(command) = content.strip_prefix('/') {
            let (name, rest) = match command.split_once(char::is_whitespace) {
                Some((name, rest)) => (name, rest.trim()),
                None => (command, ""),
            };
            return match (name, rest.is_empty()) {
                ("chat", false) => Some(Command::Chat(rest.to_string())),
                ("reset", _) => Some(Command::Reset),
                ("personality", false) => Some(Command::Personality(rest.to_string())),
                ("history", _) => Some(Command::History),
                _ => None,
            };
        }

        let text = match mention_prefix {
            Some(prefix) => {
                let (first, rest) = content.split_once(' ')?;
                if first != prefix {
                    return None;
                }
                rest.trim()
            }
            None => content,
        };

        if text.is_empty() {
            None
        } else {
            Some(Command::Chat(text.to_string()))
        }
    }
}

/// Routes commands from any front end to one shared session.
#[derive(Clone)]
pub struct CommandDispatcher {
    session: SharedSession,
    mention_prefix: Option<String>,
}

impl CommandDispatcher {
    pub fn new(session: SharedSession, mention_prefix: Option<String>) -> Self {
        Self {
            session,
            mention_prefix,
        }
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Reply for `message`, or `None` when it is not addressed to us.
    pub async fn handle(&self, message: &ChannelMessage) -> Option<String> {
        if message.from_bot {
            return None;
        }
        let command = Command::parse(&message.content, self.mention_prefix.as_deref())?;
        Some(self.execute(command).await)
    }

    pub async fn execute(&self, command: Command) -> String {
        match command {
            Command::Chat(text) => self.session.interact(&text).await,
            Command::Reset => match self.session.reset().await {
                Ok(()) => RESET_REPLY.to_string(),
                Err(e) => {
                    error!(error = %e, "Reset failed");
                    format!("Reset failed: {e}")
                }
            },
            Command::Personality(text) => {
                match self.session.set_personality_and_reset(text).await {
                    Ok(()) => PERSONALITY_REPLY.to_string(),
                    Err(e) => {
                        error!(error = %e, "Personality reset failed");
                        format!("Reset failed: {e}")
                    }
                }
            }
            Command::History => {
                let lines = self.session.print_history().await;
                if lines.is_empty() {
                    EMPTY_HISTORY_REPLY.to_string()
                } else {
                    lines.join("\n")
                }
            }
        }
    }

    /// Answer every inbound message until the event stream closes.
    pub async fn run(&self, mut events: mpsc::Receiver<ChannelEvent>, channel: &dyn Channel) {
        while let Some(event) = events.recv().await {
            match event {
                ChannelEvent::MessageReceived(message) => {
                    let Some(reply) = self.handle(&message).await else {
                        continue;
                    };
                    if let Err(e) = channel.send(message.reply(reply)).await {
                        warn!(
                            channel = %channel.name(),
                            channel_id = %message.channel_id,
                            error = %e,
                            "Reply delivery failed"
                        );
                    }
                }
                ChannelEvent::Connected(name) => info!(channel = %name, "Channel connected"),
                ChannelEvent::Disconnected(name) => {
                    info!(channel = %name, "Channel disconnected");
                }
            }
        }
    }
}
