use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::TextGenError;

use super::{GenerationParams, TextGenerator, api_error};

const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible completions API
pub(crate) struct OpenAiProvider {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
}

impl OpenAiProvider {
    pub fn new(model: String, api_key: Option<SecretString>, base_url: Option<&Url>) -> Self {
        let base_url = base_url.map_or(DEFAULT_OPENAI_API_URL, Url::as_str);

        Self {
            client: parley_core::http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }
}

#[derive(serde::Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    n: u32,
}

#[derive(serde::Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(serde::Deserialize)]
struct CompletionChoice {
    text: String,
}

#[async_trait]
impl TextGenerator for OpenAiProvider {
    async fn generate(&self, prompt: &str, params: GenerationParams) -> crate::error::Result<String> {
        let url = format!("{}/completions", self.base_url);

        tracing::debug!(
            "OpenAI completion request: model={}, prompt_len={}, max_tokens={}",
            self.model,
            prompt.len(),
            params.max_length,
        );

        let body = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: params.max_length,
            n: params.num_return_sequences,
        };

        let mut builder = self.client.post(&url).json(&body);

        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("OpenAI completion request failed: {e}");
            TextGenError::ConnectionError(format!("Failed to send request to OpenAI: {e}"))
        })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            return Err(api_error("OpenAI", status, error_text));
        }

        let completion: CompletionResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse OpenAI completion response: {e}");
            TextGenError::InternalError
        })?;

        let choice = completion.choices.into_iter().next().ok_or_else(|| {
            tracing::error!("OpenAI returned no completion choices");
            TextGenError::InternalError
        })?;

        tracing::debug!("OpenAI completion complete");

        Ok(choice.text)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
