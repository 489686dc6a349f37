use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::TtsError;

use super::{Synthesizer, api_error, write_audio};

const DEFAULT_ELEVENLABS_API_URL: &str = "https://api.elevenlabs.io/v1";
const DEFAULT_MODEL: &str = "eleven_multilingual_v2";
const DEFAULT_VOICE: &str = "21m00Tcm4TlvDq8ikWAM";

/// `ElevenLabs` text-to-speech API
pub(crate) struct ElevenLabsProvider {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
    voice: String,
}

impl ElevenLabsProvider {
    pub fn new(
        model: Option<String>,
        voice: Option<String>,
        api_key: Option<SecretString>,
        base_url: Option<&Url>,
    ) -> Self {
        let base_url = base_url.map_or(DEFAULT_ELEVENLABS_API_URL, Url::as_str);

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
struct ElevenLabsRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

#[async_trait]
impl Synthesizer for ElevenLabsProvider {
    async fn synthesize(&self, text: &str, output: &Path) -> crate::error::Result<()> {
        let url = format!("{}/text-to-speech/{}", self.base_url, self.voice);

        tracing::debug!(
            "ElevenLabs TTS request: model={}, voice={}, input_len={}",
            self.model,
            self.voice,
            text.len(),
        );

        let body = ElevenLabsRequest {
            text,
            model_id: &self.model,
        };

        let mut builder = self
            .client
            .post(&url)
            .header(http::header::ACCEPT, "audio/mpeg")
            .json(&body);

        if let Some(ref key) = self.api_key {
            builder = builder.header("xi-api-key", key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("ElevenLabs request failed: {e}");
            TtsError::ConnectionError(format!("Failed to send request to ElevenLabs: {e}"))
        })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            return Err(api_error("ElevenLabs", status, error_text));
        }

        let audio = response.bytes().await.map_err(|e| {
            tracing::error!("Failed to read ElevenLabs response body: {e}");
            TtsError::ConnectionError(format!("Failed to read audio from ElevenLabs: {e}"))
        })?;

        write_audio(output, &audio).await?;

        tracing::debug!("ElevenLabs TTS synthesis complete, {} bytes", audio.len());

        Ok(())
    }

    fn name(&self) -> &str {
        "elevenlabs"
    }
}
