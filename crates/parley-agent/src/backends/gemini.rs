use super::LlmBackend;
use crate::config::{ModelConfig, SafetySetting};
use async_trait::async_trait;
use parley_core::{Message, ParleyError, ParleyResult, Role};
use serde::Serialize;
use tracing::debug;

/// Google Gemini `generateContent` backend.
pub struct GeminiBackend {
    config: ModelConfig,
    http: reqwest::Client,
}

impl GeminiBackend {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url(),
            self.config.model_name()
        )
    }
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    async fn chat(&self, messages: &[Message]) -> ParleyResult<String> {
        let contents: Vec<GeminiContent<'_>> = messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| GeminiContent {
                role: m.role.as_str(),
                parts: vec![GeminiPart { text: &m.content }],
            })
            .collect();

        let body = GenerateContentRequest {
            contents,
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
            safety_settings: &self.config.safety_settings,
        };

        debug!(model = %self.config.model_name(), turns = messages.len(), "Gemini request");

        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ParleyError::Http(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ParleyError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(ParleyError::Http(format!(
                "Gemini API error {status}: {text}"
            )));
        }

        let resp_body: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| ParleyError::Agent(format!("Malformed Gemini response: {e}")))?;
        parse_gemini_response(&resp_body)
    }
}

// -- Gemini wire types --

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
    #[serde(rename = "safetySettings")]
    safety_settings: &'a [SafetySetting],
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

/// Extract the reply text from a `generateContent` response body.
///
/// A prompt rejected by the safety filters comes back without candidates; a
/// reply cut off by them comes back with a candidate that has no text.
pub fn parse_gemini_response(body: &serde_json::Value) -> ParleyResult<String> {
    if let Some(err) = body.get("error") {
        let message = err["message"].as_str().unwrap_or("unknown error");
        return Err(ParleyError::Agent(format!("Gemini API error: {message}")));
    }

    let Some(candidate) = body["candidates"].as_array().and_then(|c| c.first()) else {
        let reason = body["promptFeedback"]["blockReason"]
            .as_str()
            .unwrap_or("none given");
        return Err(ParleyError::Agent(format!(
            "Gemini returned no candidates (block reason: {reason})"
        )));
    };

    let parts: Vec<&str> = candidate["content"]["parts"]
        .as_array()
        .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
        .unwrap_or_default();

    if parts.is_empty() {
        let finish = candidate["finishReason"].as_str().unwrap_or("UNKNOWN");
        return Err(ParleyError::Agent(format!(
            "Gemini candidate has no text (finish reason: {finish})"
        )));
    }

    Ok(parts.concat())
}
