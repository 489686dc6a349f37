use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

use crate::duration::{default_engine_timeout, deserialize_duration};

/// Speech synthesis engine configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TtsConfig {
    /// Engine type
    #[serde(rename = "type")]
    pub provider_type: TtsProviderType,
    /// Model override, each engine has its own default
    #[serde(default)]
    pub model: Option<String>,
    /// Voice override (an `OpenAI` voice name or an `ElevenLabs` voice ID)
    #[serde(default)]
    pub voice: Option<String>,
    /// API key
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Deadline for a single synthesis call
    #[serde(default = "default_engine_timeout", deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

/// Supported speech synthesis engines
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TtsProviderType {
    /// `OpenAI` TTS
    OpenaiTts,
    /// `ElevenLabs`
    Elevenlabs,
}
