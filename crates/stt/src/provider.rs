pub(crate) mod deepgram;
pub(crate) mod whisper;

use async_trait::async_trait;

use crate::types::{AudioClip, Recognition};

/// A speech recognition engine
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Recognize speech in a complete audio clip
    ///
    /// Returns `Recognition::Unintelligible` when the engine hears no speech
    /// and `Recognition::ServiceUnavailable` when it cannot be reached or
    /// answers with an error status.
    async fn recognize(&self, clip: &AudioClip) -> crate::error::Result<Recognition>;

    /// Get the engine name
    fn name(&self) -> &str;
}

/// Classify a failed send: the engine could not be reached
pub(crate) fn unreachable(engine: &str, error: &reqwest::Error) -> Recognition {
    tracing::warn!("{engine} unreachable: {error}");

    Recognition::ServiceUnavailable
}

/// Classify a non-success engine response
///
/// Every error status means the service is unavailable to us. Rejected
/// credentials are logged as errors since they need an operator.
pub(crate) fn classify_status(engine: &str, status: reqwest::StatusCode, message: &str) -> Recognition {
    if matches!(
        status,
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN
    ) {
        tracing::error!("{engine} rejected our credentials ({status}): {message}");
    } else {
        tracing::warn!("{engine} unavailable ({status}): {message}");
    }

    Recognition::ServiceUnavailable
}
