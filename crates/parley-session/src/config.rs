use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Marker in the preamble template replaced by the current personality.
pub const PERSONALITY_PLACEHOLDER: &str = "!!PERSONALITY";

/// Text of the `system` transcript entry written at every reset.
pub const SESSION_SEPARATOR: &str = "--------- New Session ---------";

/// Everything a [`crate::ConversationSession`] needs besides the model client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_personality")]
    pub personality: String,
    /// Behavioural rules sent as the first turn of every session. Must contain
    /// [`PERSONALITY_PLACEHOLDER`] for the personality to take effect.
    #[serde(default = "default_preamble_template")]
    pub preamble_template: String,
    #[serde(default = "default_history_file")]
    pub history_file: PathBuf,
    #[serde(default = "default_rotation_threshold_bytes")]
    pub rotation_threshold_bytes: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Reply sent to the user whenever the model call fails.
    #[serde(default = "default_apology")]
    pub apology: String,
}

fn default_personality() -> String {
    "You are the most polite robot ever created; however, you have a deep hatred for \
     commas and hate anyone who uses them. Answer every following prompt in kind"
        .to_string()
}

fn default_preamble_template() -> String {
    format!(
        "You are a chat bot called Gemini in a discord server with another chat bot and will talk to it.\n\
         In addition you will respond while following these rules\n\
         1. Reply with short responses only, maximum 500 characters\n\
         2. Swearing is allowed\n\
         3. Racism, sexism and hate speech are not allowed\n\
         4. Your goal is to be funny and entertaining\n\
         \n\
         Finally your responses should comply with the following personality:\n\
         {PERSONALITY_PLACEHOLDER}\n"
    )
}

fn default_history_file() -> PathBuf {
    PathBuf::from("ChatHistoryBackup.txt")
}

fn default_rotation_threshold_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_apology() -> String {
    "Im sorry. An error occured while processing that request".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            personality: default_personality(),
            preamble_template: default_preamble_template(),
            history_file: default_history_file(),
            rotation_threshold_bytes: default_rotation_threshold_bytes(),
            request_timeout_secs: default_request_timeout_secs(),
            apology: default_apology(),
        }
    }
}

impl SessionConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Substitute `personality` for every placeholder in `template`.
pub fn render_preamble(template: &str, personality: &str) -> String {
    template.replace(PERSONALITY_PLACEHOLDER, personality)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn default_template_has_placeholder() {
        assert!(SessionConfig::default()
            .preamble_template
            .contains(PERSONALITY_PLACEHOLDER));
    }

    #[test]
    fn render_replaces_every_placeholder() {
        let out = render_preamble("a !!PERSONALITY b !!PERSONALITY", "X");
        assert_eq!(out, "a X b X");
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config: SessionConfig = toml::from_str("").unwrap();
        assert_eq!(config.history_file, PathBuf::from("ChatHistoryBackup.txt"));
        assert_eq!(config.rotation_threshold_bytes, 5 * 1024 * 1024);
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
    }
}
