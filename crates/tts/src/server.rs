use std::time::Duration;

use parley_config::{TtsConfig, TtsProviderType};
use parley_scratch::{OutputFile, Scratch};

use crate::{
    error::TtsError,
    provider::{Synthesizer, elevenlabs::ElevenLabsProvider, openai_tts::OpenAiTtsProvider},
};

const OUTPUT_SUFFIX: &str = ".mp3";

/// Speech synthesis adapter shared by every `/api/synthesize` request
pub struct Server {
    synthesizer: Box<dyn Synthesizer>,
    scratch: Scratch,
    timeout: Duration,
}

impl Server {
    pub fn new(synthesizer: Box<dyn Synthesizer>, scratch: Scratch, timeout: Duration) -> Self {
        Self {
            synthesizer,
            scratch,
            timeout,
        }
    }

    /// Render `text` into a freshly allocated output file
    ///
    /// The file is deleted when the returned handle (or the reader opened
    /// from it) is dropped. On failure it is deleted before returning.
    pub async fn synthesize(&self, text: &str) -> crate::error::Result<OutputFile> {
        let output = self.scratch.allocate_output(OUTPUT_SUFFIX).await?;

        tokio::time::timeout(self.timeout, self.synthesizer.synthesize(text, output.path()))
            .await
            .map_err(|_| TtsError::Timeout(self.timeout))??;

        if output.len().await? == 0 {
            return Err(TtsError::EmptyAudio);
        }

        Ok(output)
    }

    /// Name of the configured engine
    pub fn engine(&self) -> &str {
        self.synthesizer.name()
    }
}

/// Builder for constructing the speech synthesis server from configuration
pub struct TtsServerBuilder<'a> {
    config: &'a TtsConfig,
    scratch: Scratch,
}

impl<'a> TtsServerBuilder<'a> {
    pub const fn new(config: &'a TtsConfig, scratch: Scratch) -> Self {
        Self { config, scratch }
    }

    pub fn build(self) -> crate::error::Result<Server> {
        let config = self.config;

        for (field, value) in [("model", &config.model), ("voice", &config.voice)] {
            if value.as_deref().is_some_and(str::is_empty) {
                return Err(TtsError::ConfigError(format!("tts.{field} must not be empty")));
            }
        }

        let synthesizer: Box<dyn Synthesizer> = match config.provider_type {
            TtsProviderType::OpenaiTts => Box::new(OpenAiTtsProvider::new(
                config.model.clone(),
                config.voice.clone(),
                config.api_key.clone(),
                config.base_url.as_ref(),
            )),
            TtsProviderType::Elevenlabs => Box::new(ElevenLabsProvider::new(
                config.model.clone(),
                config.voice.clone(),
                config.api_key.clone(),
                config.base_url.as_ref(),
            )),
        };

        tracing::debug!("Speech synthesis server initialized with engine {}", synthesizer.name());

        Ok(Server::new(synthesizer, self.scratch, config.timeout))
    }
}
