use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use parley_scratch::ScratchError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TtsError>;

/// Speech synthesis failures with appropriate HTTP status codes
#[derive(Debug, Error)]
pub enum TtsError {
    /// The engine refused our credentials
    #[error("Authentication with the speech synthesis engine failed: {0}")]
    AuthenticationFailed(String),

    /// The engine answered with a non-success status
    #[error("Speech synthesis engine error ({status}): {message}")]
    ProviderApiError { status: u16, message: String },

    /// Network or connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The engine reported success but wrote no audio
    #[error("Speech synthesis engine returned no audio")]
    EmptyAudio,

    /// The engine did not finish within the configured deadline
    #[error("Speech synthesis timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// Allocating, writing or opening the output file failed
    #[error(transparent)]
    Resource(#[from] ScratchError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl TtsError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthenticationFailed(_)
            | Self::ProviderApiError { .. }
            | Self::ConnectionError(_)
            | Self::EmptyAudio => StatusCode::BAD_GATEWAY,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Resource(_) | Self::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message that is safe to expose to API consumers
    pub fn client_message(&self) -> String {
        match self {
            Self::Resource(_) | Self::ConfigError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for TtsError {
    fn into_response(self) -> Response {
        tracing::error!("Speech synthesis failed: {self}");

        parley_core::error_response(self.status_code(), self.client_message())
    }
}
