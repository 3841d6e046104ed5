//! Regression tests for parley-agent configuration.

use parley_agent::{HarmBlockThreshold, HarmCategory, ModelConfig, SafetySetting};

#[test]
fn test_model_config_deserialization_with_defaults() {
    let config: ModelConfig = toml::from_str(r#"api_key = "test-key""#).unwrap();
    assert_eq!(config.model_id, "gemini-pro");
    assert_eq!(config.temperature, 0.8);
    assert_eq!(config.safety_settings.len(), 4);
    assert!(config
        .safety_settings
        .iter()
        .all(|s| s.threshold == HarmBlockThreshold::BlockNone));
    assert!(config.api_base_url.is_none());
}

#[test]
fn test_model_config_explicit_safety_settings() {
    let toml_str = r#"
        model_id = "gemini-1.5-flash"
        api_key = "k"
        temperature = 0.2

        [[safety_settings]]
        category = "HARM_CATEGORY_HATE_SPEECH"
        threshold = "BLOCK_LOW_AND_ABOVE"
    "#;

    let config: ModelConfig = toml::from_str(toml_str).unwrap();
    assert_eq!(config.temperature, 0.2);
    assert_eq!(
        config.safety_settings,
        vec![SafetySetting {
            category: HarmCategory::HateSpeech,
            threshold: HarmBlockThreshold::BlockLowAndAbove,
        }]
    );
}

#[test]
fn test_unknown_threshold_is_rejected() {
    let toml_str = r#"
        [[safety_settings]]
        category = "HARM_CATEGORY_HARASSMENT"
        threshold = "BLOCK_EVERYTHING"
    "#;
    assert!(toml::from_str::<ModelConfig>(toml_str).is_err());
}

#[test]
fn test_base_url_default_and_override() {
    let mut config = ModelConfig::default();
    assert_eq!(
        config.base_url(),
        "https://generativelanguage.googleapis.com"
    );

    config.api_base_url = Some("http://localhost:8080/".to_string());
    assert_eq!(config.base_url(), "http://localhost:8080");
}

#[test]
fn test_model_name_strips_models_prefix() {
    let config = ModelConfig {
        model_id: "models/gemini-pro".to_string(),
        ..ModelConfig::default()
    };
    assert_eq!(config.model_name(), "gemini-pro");
}
