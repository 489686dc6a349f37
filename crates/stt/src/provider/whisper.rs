use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::{
    error::SttError,
    types::{AudioClip, Recognition},
};

use super::{Recognizer, classify_status, unreachable};

const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_WHISPER_MODEL: &str = "whisper-1";

/// `OpenAI` Whisper (or any server speaking its transcription API)
pub(crate) struct WhisperProvider {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
    language: Option<String>,
}

impl WhisperProvider {
    pub fn new(
        model: Option<String>,
        api_key: Option<SecretString>,
        base_url: Option<&Url>,
        language: Option<String>,
    ) -> Self {
        let base_url = base_url.map_or(DEFAULT_OPENAI_API_URL, Url::as_str);

        Self {
            client: parley_core::http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_WHISPER_MODEL.to_string()),
            language,
        }
    }
}

#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

#[async_trait]
impl Recognizer for WhisperProvider {
    async fn recognize(&self, clip: &AudioClip) -> crate::error::Result<Recognition> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        tracing::debug!(
            "Whisper transcription request: {} bytes, model={}",
            clip.audio.len(),
            self.model,
        );

        let file = reqwest::multipart::Part::bytes(clip.audio.clone())
            .file_name(clip.filename.clone())
            .mime_str(clip.format.mime_type())
            .map_err(|e| {
                tracing::error!("Invalid audio content type: {e}");
                SttError::InternalError
            })?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("model", self.model.clone());

        if let Some(ref language) = self.language {
            form = form.text("language", language.clone());
        }

        let mut builder = self.client.post(&url).multipart(form);

        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return Ok(unreachable("Whisper", &e)),
        };

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            return Ok(classify_status("Whisper", status, &error_text));
        }

        let result: WhisperResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Whisper response: {e}");
            SttError::InvalidResponse
        })?;

        tracing::debug!("Whisper transcription complete");

        Ok(Recognition::from_transcript(result.text))
    }

    fn name(&self) -> &str {
        "whisper"
    }
}
