use serde::{Deserialize, Serialize};

/// Content categories the Gemini API filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmCategory {
    /// Harassment.
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    /// Hate speech.
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    /// Sexually explicit content.
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    /// Dangerous content.
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

/// How strictly a [`HarmCategory`] is filtered. `BlockNone` is the laxest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    /// Never block.
    BlockNone,
    /// Block only high-probability harm.
    BlockOnlyHigh,
    /// Block medium and high probability harm.
    BlockMediumAndAbove,
    /// Block low, medium and high probability harm.
    BlockLowAndAbove,
}

/// Per-category content filter setting sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    /// Category being configured.
    pub category: HarmCategory,
    /// Filter laxness for the category.
    pub threshold: HarmBlockThreshold,
}

/// Remote model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_id")]
    pub model_id: String,
    /// Usually filled from `GOOGLE_API_KEY` at startup.
    #[serde(default)]
    pub api_key: String,
    pub api_base_url: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_safety_settings")]
    pub safety_settings: Vec<SafetySetting>,
}

fn default_model_id() -> String {
    "gemini-pro".to_string()
}

fn default_temperature() -> f32 {
    0.8
}

/// All four categories unfiltered.
pub fn default_safety_settings() -> Vec<SafetySetting> {
    [
        HarmCategory::Harassment,
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ]
    .into_iter()
    .map(|category| SafetySetting {
        category,
        threshold: HarmBlockThreshold::BlockNone,
    })
    .collect()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_id: default_model_id(),
            api_key: String::new(),
            api_base_url: None,
            temperature: default_temperature(),
            safety_settings: default_safety_settings(),
        }
    }
}

impl ModelConfig {
    /// API root, honouring `api_base_url` when set.
    pub fn base_url(&self) -> &str {
        match &self.api_base_url {
            Some(url) => url.trim_end_matches('/'),
            None => "https://generativelanguage.googleapis.com",
        }
    }

    /// Model id without any `models/` prefix.
    pub fn model_name(&self) -> &str {
        self.model_id
            .strip_prefix("models/")
            .unwrap_or(&self.model_id)
    }
}
