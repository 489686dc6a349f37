use std::{path::Path, time::Duration};

use parley_config::{SttConfig, SttProviderType};
use parley_core::AudioFormat;
use parley_scratch::Scratch;

use crate::{
    error::SttError,
    provider::{Recognizer, deepgram::DeepgramProvider, whisper::WhisperProvider},
    types::{AudioClip, Recognition, TranscribeRequest},
};

/// Speech recognition adapter shared by every `/api/transcribe` request
pub struct Server {
    recognizer: Box<dyn Recognizer>,
    scratch: Scratch,
    timeout: Duration,
    max_upload_size: usize,
}

impl Server {
    pub fn new(recognizer: Box<dyn Recognizer>, scratch: Scratch, timeout: Duration, max_upload_size: usize) -> Self {
        Self {
            recognizer,
            scratch,
            timeout,
            max_upload_size,
        }
    }

    /// Transcribe an audio file already on disk
    ///
    /// The format comes from the file extension, falling back to WAV. An
    /// engine that misses the deadline counts as unavailable.
    pub async fn transcribe(&self, audio_path: &Path) -> crate::error::Result<Recognition> {
        let audio = tokio::fs::read(audio_path)
            .await
            .map_err(|source| parley_scratch::ScratchError::Read {
                path: audio_path.to_path_buf(),
                source,
            })?;

        let filename = audio_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let clip = AudioClip {
            audio,
            format: AudioFormat::from_filename(&filename).unwrap_or(AudioFormat::Wav),
            filename,
        };

        if let Ok(recognition) = tokio::time::timeout(self.timeout, self.recognizer.recognize(&clip)).await {
            recognition
        } else {
            tracing::warn!(
                "{} did not answer within {:?}, treating as unavailable",
                self.recognizer.name(),
                self.timeout
            );
            Ok(Recognition::ServiceUnavailable)
        }
    }

    /// Persist an upload, transcribe it, then release it
    ///
    /// The stored file is released whatever the transcription outcome; a
    /// release failure only surfaces when transcription itself succeeded.
    pub async fn transcribe_upload(&self, request: TranscribeRequest) -> crate::error::Result<Recognition> {
        let upload = self.scratch.store_upload(&request.filename, &request.audio).await?;

        tracing::debug!("Stored upload at {}", upload.path().display());

        let result = self.transcribe(upload.path()).await;
        let released = upload.release().await;

        let recognition = result?;
        released?;

        Ok(recognition)
    }

    /// Largest accepted multipart body, in bytes
    pub fn max_upload_size(&self) -> usize {
        self.max_upload_size
    }

    /// Name of the configured engine
    pub fn engine(&self) -> &str {
        self.recognizer.name()
    }
}

/// Builder for constructing the speech recognition server from configuration
pub struct SttServerBuilder<'a> {
    config: &'a SttConfig,
    scratch: Scratch,
    max_upload_size: usize,
}

impl<'a> SttServerBuilder<'a> {
    pub const fn new(config: &'a SttConfig, scratch: Scratch, max_upload_size: usize) -> Self {
        Self {
            config,
            scratch,
            max_upload_size,
        }
    }

    pub fn build(self) -> crate::error::Result<Server> {
        let config = self.config;

        if config.model.as_deref().is_some_and(str::is_empty) {
            return Err(SttError::ConfigError("stt.model must not be empty".to_string()));
        }

        let recognizer: Box<dyn Recognizer> = match config.provider_type {
            SttProviderType::Whisper => Box::new(WhisperProvider::new(
                config.model.clone(),
                config.api_key.clone(),
                config.base_url.as_ref(),
                config.language.clone(),
            )),
            SttProviderType::Deepgram => Box::new(DeepgramProvider::new(
                config.model.clone(),
                config.api_key.clone(),
                config.base_url.as_ref(),
                config.language.clone(),
            )),
        };

        tracing::debug!("Speech recognition server initialized with engine {}", recognizer.name());

        Ok(Server::new(recognizer, self.scratch, config.timeout, self.max_upload_size))
    }
}
