use anyhow::Context;
use parley_agent::ModelConfig;
use parley_session::SessionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const GOOGLE_API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const DISCORD_API_KEY_VAR: &str = "DISCORD_API_KEY";
pub const HISTORY_FILE_VAR: &str = "PARLEY_HISTORY_FILE";

const REDACTED: &str = "***";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub discord: DiscordConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    #[serde(default)]
    pub token: String,
    /// First word that addresses a plain message to the bot.
    #[serde(default = "default_mention_prefix")]
    pub mention_prefix: String,
}

fn default_mention_prefix() -> String {
    "Gemini".to_string()
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            mention_prefix: default_mention_prefix(),
        }
    }
}

impl ParleyConfig {
    /// Read `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }

    /// Overlay values from the environment; set variables win over the file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(GOOGLE_API_KEY_VAR) {
            self.model.api_key = key;
        }
        if let Some(token) = lookup(DISCORD_API_KEY_VAR) {
            self.discord.token = token;
        }
        if let Some(file) = lookup(HISTORY_FILE_VAR) {
            self.session.history_file = PathBuf::from(file);
        }
    }

    /// Copy with credentials masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.model.api_key.is_empty() {
            copy.model.api_key = REDACTED.to_string();
        }
        if !copy.discord.token.is_empty() {
            copy.discord.token = REDACTED.to_string();
        }
        copy
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ParleyConfig::load(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.model.model_id, "gemini-pro");
        assert_eq!(config.discord.mention_prefix, "Gemini");
        assert_eq!(
            config.session.history_file,
            PathBuf::from("ChatHistoryBackup.txt")
        );
    }

    #[test]
    fn parses_sections() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("parley.toml");
        std::fs::write(
            &path,
            r#"
                [model]
                temperature = 0.3

                [session]
                personality = "terse"
                rotation_threshold_bytes = 1024

                [discord]
                mention_prefix = "Bot"
            "#,
        )
        .unwrap();

        let config = ParleyConfig::load(&path).unwrap();
        assert_eq!(config.model.temperature, 0.3);
        assert_eq!(config.session.personality, "terse");
        assert_eq!(config.session.rotation_threshold_bytes, 1024);
        assert_eq!(config.discord.mention_prefix, "Bot");
    }

    #[test]
    fn invalid_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("parley.toml");
        std::fs::write(&path, "[session]\nrotation_threshold_bytes = \"big\"").unwrap();
        assert!(ParleyConfig::load(&path).is_err());
    }

    #[test]
    fn environment_overrides_file() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (GOOGLE_API_KEY_VAR, "g-key"),
            (HISTORY_FILE_VAR, "/tmp/log.txt"),
        ]);
        let mut config = ParleyConfig::default();
        config.discord.token = "from-file".to_string();

        config.apply_env(|name| vars.get(name).map(|v| (*v).to_string()));

        assert_eq!(config.model.api_key, "g-key");
        assert_eq!(config.discord.token, "from-file");
        assert_eq!(config.session.history_file, PathBuf::from("/tmp/log.txt"));
    }

    #[test]
    fn redacted_masks_only_present_secrets() {
        let mut config = ParleyConfig::default();
        config.model.api_key = "g-key".to_string();

        let shown = config.redacted();
        assert_eq!(shown.model.api_key, REDACTED);
        assert!(shown.discord.token.is_empty());
        assert_eq!(config.model.api_key, "g-key");
    }
}
