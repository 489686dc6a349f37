use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

use crate::duration::{default_engine_timeout, deserialize_duration};

/// Text generation engine configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextGenConfig {
    /// Engine protocol
    #[serde(rename = "type")]
    pub provider_type: TextGenProviderType,
    /// Model identifier passed to the engine
    pub model: String,
    /// API key
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Upper bound on the length of the generated text
    #[serde(default = "default_max_length")]
    pub max_length: u32,
    /// Deadline for a single generation call (e.g. "60s")
    #[serde(default = "default_engine_timeout", deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

/// Supported text generation engines
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextGenProviderType {
    /// Hugging Face inference API (`text-generation` pipeline)
    HuggingFace,
    /// OpenAI-compatible completions API
    Openai,
}

const fn default_max_length() -> u32 {
    100
}
