use std::time::Duration;

use parley_config::{TextGenConfig, TextGenProviderType};

use crate::{
    error::TextGenError,
    provider::{GenerationParams, TextGenerator, hugging_face::HuggingFaceProvider, openai::OpenAiProvider},
};

/// Text generation adapter shared by every `/api/chat` request
pub struct Server {
    generator: Box<dyn TextGenerator>,
    params: GenerationParams,
    timeout: Duration,
}

impl Server {
    pub fn new(generator: Box<dyn TextGenerator>, max_length: u32, timeout: Duration) -> Self {
        Self {
            generator,
            params: GenerationParams::single(max_length),
            timeout,
        }
    }

    /// Generate text for a prompt
    ///
    /// One bounded candidate is requested; the engine's text is returned as is.
    /// No retry is attempted.
    pub async fn generate(&self, prompt: &str) -> crate::error::Result<String> {
        tokio::time::timeout(self.timeout, self.generator.generate(prompt, self.params))
            .await
            .map_err(|_| TextGenError::Timeout(self.timeout))?
    }

    /// Name of the configured engine
    pub fn engine(&self) -> &str {
        self.generator.name()
    }
}

/// Builder for constructing the text generation server from configuration
pub struct TextGenServerBuilder<'a> {
    config: &'a TextGenConfig,
}

impl<'a> TextGenServerBuilder<'a> {
    pub const fn new(config: &'a TextGenConfig) -> Self {
        Self { config }
    }

    pub fn build(self) -> crate::error::Result<Server> {
        let config = self.config;

        if config.model.is_empty() {
            return Err(TextGenError::ConfigError("textgen.model must not be empty".to_string()));
        }

        let generator: Box<dyn TextGenerator> = match config.provider_type {
            TextGenProviderType::HuggingFace => Box::new(HuggingFaceProvider::new(
                config.model.clone(),
                config.api_key.clone(),
                config.base_url.as_ref(),
            )),
            TextGenProviderType::Openai => Box::new(OpenAiProvider::new(
                config.model.clone(),
                config.api_key.clone(),
                config.base_url.as_ref(),
            )),
        };

        tracing::debug!(
            "Text generation server initialized with engine {} (model={})",
            generator.name(),
            config.model
        );

        Ok(Server::new(generator, config.max_length, config.timeout))
    }
}
