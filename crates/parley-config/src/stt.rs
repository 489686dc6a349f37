use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

use crate::duration::{default_engine_timeout, deserialize_duration};

/// Speech recognition engine configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SttConfig {
    /// Engine type
    #[serde(rename = "type")]
    pub provider_type: SttProviderType,
    /// Model override, each engine has its own default
    #[serde(default)]
    pub model: Option<String>,
    /// API key
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Language hint (e.g. "en")
    #[serde(default)]
    pub language: Option<String>,
    /// Deadline for a single recognition call
    #[serde(default = "default_engine_timeout", deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

/// Supported speech recognition engines
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SttProviderType {
    /// `OpenAI` Whisper
    Whisper,
    /// Deepgram
    Deepgram,
}
