use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use parley_scratch::ScratchError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SttError>;

/// Speech recognition failures
///
/// Unintelligible audio, an unreachable engine and any engine error status
/// are not errors; they are reported through [`crate::Recognition`].
#[derive(Debug, Error)]
pub enum SttError {
    /// The engine answered with a body that is not a transcription
    #[error("Unreadable response from the speech recognition engine")]
    InvalidResponse,

    /// Storing, reading or releasing the uploaded audio failed
    #[error(transparent)]
    Resource(#[from] ScratchError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal failure; details are logged, never shown to clients
    #[error("Internal server error")]
    InternalError,
}

impl SttError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidResponse => StatusCode::BAD_GATEWAY,
            Self::Resource(_) | Self::ConfigError(_) | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message that is safe to expose to API consumers
    pub fn client_message(&self) -> String {
        match self {
            Self::Resource(_) | Self::ConfigError(_) | Self::InternalError => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for SttError {
    fn into_response(self) -> Response {
        tracing::error!("Transcription failed: {self}");

        parley_core::error_response(self.status_code(), self.client_message())
    }
}
