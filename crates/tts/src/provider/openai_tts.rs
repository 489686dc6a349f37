use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::TtsError;

use super::{Synthesizer, api_error, write_audio};

const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "tts-1";
const DEFAULT_VOICE: &str = "alloy";

/// `OpenAI` speech API
pub(crate) struct OpenAiTtsProvider {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
    voice: String,
}

impl OpenAiTtsProvider {
    pub fn new(
        model: Option<String>,
        voice: Option<String>,
        api_key: Option<SecretString>,
        base_url: Option<&Url>,
    ) -> Self {
        let base_url = base_url.map_or(DEFAULT_OPENAI_API_URL, Url::as_str);

        Self {
            client: parley_core::http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            voice: voice.unwrap_or_else(|| DEFAULT_VOICE.to_string()),
        }
    }
}

#[derive(serde::Serialize)]
struct OpenAiTtsRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'static str,
}

#[async_trait]
impl Synthesizer for OpenAiTtsProvider {
    async fn synthesize(&self, text: &str, output: &Path) -> crate::error::Result<()> {
        let url = format!("{}/audio/speech", self.base_url);

        tracing::debug!(
            "OpenAI TTS request: model={}, voice={}, input_len={}",
            self.model,
            self.voice,
            text.len(),
        );

        let body = OpenAiTtsRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            response_format: "mp3",
        };

        let mut builder = self.client.post(&url).json(&body);

        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("OpenAI TTS request failed: {e}");
            TtsError::ConnectionError(format!("Failed to send request to OpenAI: {e}"))
        })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            return Err(api_error("OpenAI TTS", status, error_text));
        }

        let audio = response.bytes().await.map_err(|e| {
            tracing::error!("Failed to read OpenAI TTS response body: {e}");
            TtsError::ConnectionError(format!("Failed to read audio from OpenAI: {e}"))
        })?;

        write_audio(output, &audio).await?;

        tracing::debug!("OpenAI TTS synthesis complete, {} bytes", audio.len());

        Ok(())
    }

    fn name(&self) -> &str {
        "openai_tts"
    }
}
