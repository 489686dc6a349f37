pub(crate) mod hugging_face;
pub(crate) mod openai;

use async_trait::async_trait;

use crate::error::TextGenError;

/// Generation limits passed with every prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationParams {
    /// Upper bound on the generated length
    pub max_length: u32,
    /// Number of candidate continuations requested; always one
    pub num_return_sequences: u32,
}

impl GenerationParams {
    pub const fn single(max_length: u32) -> Self {
        Self {
            max_length,
            num_return_sequences: 1,
        }
    }
}

/// A text generation engine
///
/// Implementations return the engine's text unmodified, including any echo
/// of the prompt the engine itself produces.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a continuation of `prompt`
    async fn generate(&self, prompt: &str, params: GenerationParams) -> crate::error::Result<String>;

    /// Get the engine name
    fn name(&self) -> &str;
}

/// Map a non-success engine response to an error
pub(crate) fn api_error(engine: &str, status: reqwest::StatusCode, message: String) -> TextGenError {
    tracing::error!("{engine} API error ({status}): {message}");

    match status.as_u16() {
        401 | 403 => TextGenError::AuthenticationFailed(message),
        status => TextGenError::ProviderApiError { status, message },
    }
}
