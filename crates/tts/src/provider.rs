pub(crate) mod elevenlabs;
pub(crate) mod openai_tts;

use std::path::Path;

use async_trait::async_trait;
use parley_scratch::ScratchError;

use crate::error::TtsError;

/// A speech synthesis engine
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Render `text` as MP3 audio into the file at `output`
    ///
    /// Returns once the audio has been completely written.
    async fn synthesize(&self, text: &str, output: &Path) -> crate::error::Result<()>;

    /// Get the engine name
    fn name(&self) -> &str;
}

/// Map a non-success engine response to an error
pub(crate) fn api_error(engine: &str, status: reqwest::StatusCode, message: String) -> TtsError {
    tracing::error!("{engine} API error ({status}): {message}");

    match status.as_u16() {
        401 | 403 => TtsError::AuthenticationFailed(message),
        status => TtsError::ProviderApiError { status, message },
    }
}

/// Write rendered audio to the output file
pub(crate) async fn write_audio(output: &Path, audio: &[u8]) -> crate::error::Result<()> {
    tokio::fs::write(output, audio).await.map_err(|source| {
        TtsError::Resource(ScratchError::Write {
            path: output.to_path_buf(),
            source,
        })
    })
}
