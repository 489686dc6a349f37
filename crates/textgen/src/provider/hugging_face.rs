use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::TextGenError;

use super::{GenerationParams, TextGenerator, api_error};

const DEFAULT_HUGGING_FACE_API_URL: &str = "https://api-inference.huggingface.co";

/// Hugging Face inference API running a `text-generation` pipeline
pub(crate) struct HuggingFaceProvider {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
}

impl HuggingFaceProvider {
    pub fn new(model: String, api_key: Option<SecretString>, base_url: Option<&Url>) -> Self {
        let base_url = base_url.map_or(DEFAULT_HUGGING_FACE_API_URL, Url::as_str);

        Self {
            client: parley_core::http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }
}

#[derive(serde::Serialize)]
struct HuggingFaceRequest<'a> {
    inputs: &'a str,
    parameters: HuggingFaceParameters,
}

#[derive(serde::Serialize)]
struct HuggingFaceParameters {
    max_length: u32,
    num_return_sequences: u32,
}

#[derive(serde::Deserialize)]
struct HuggingFaceGeneration {
    generated_text: String,
}

#[async_trait]
impl TextGenerator for HuggingFaceProvider {
    async fn generate(&self, prompt: &str, params: GenerationParams) -> crate::error::Result<String> {
        let url = format!("{}/models/{}", self.base_url, self.model);

        tracing::debug!(
            "Hugging Face generation request: model={}, prompt_len={}, max_length={}",
            self.model,
            prompt.len(),
            params.max_length,
        );

        let body = HuggingFaceRequest {
            inputs: prompt,
            parameters: HuggingFaceParameters {
                max_length: params.max_length,
                num_return_sequences: params.num_return_sequences,
            },
        };

        let mut builder = self.client.post(&url).json(&body);

        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("Hugging Face request failed: {e}");
            TextGenError::ConnectionError(format!("Failed to send request to Hugging Face: {e}"))
        })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            return Err(api_error("Hugging Face", status, error_text));
        }

        let generations: Vec<HuggingFaceGeneration> = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Hugging Face response: {e}");
            TextGenError::InternalError
        })?;

        let generation = generations.into_iter().next().ok_or_else(|| {
            tracing::error!("Hugging Face returned no generations");
            TextGenError::InternalError
        })?;

        tracing::debug!("Hugging Face generation complete");

        Ok(generation.generated_text)
    }

    fn name(&self) -> &str {
        "hugging_face"
    }
}
