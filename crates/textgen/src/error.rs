use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TextGenError>;

/// Text generation failures with appropriate HTTP status codes
#[derive(Debug, Error)]
pub enum TextGenError {
    /// The engine refused our credentials
    #[error("Authentication with the text generation engine failed: {0}")]
    AuthenticationFailed(String),

    /// The engine answered with a non-success status
    #[error("Text generation engine error ({status}): {message}")]
    ProviderApiError { status: u16, message: String },

    /// Network or connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The engine did not answer within the configured deadline
    #[error("Text generation timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal failure; details are logged, never shown to clients
    #[error("Internal server error")]
    InternalError,
}

impl TextGenError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthenticationFailed(_) | Self::ProviderApiError { .. } | Self::ConnectionError(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::ConfigError(_) | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message that is safe to expose to API consumers
    pub fn client_message(&self) -> String {
        match self {
            Self::InternalError | Self::ConfigError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for TextGenError {
    fn into_response(self) -> Response {
        tracing::error!("Text generation failed: {self}");

        parley_core::error_response(self.status_code(), self.client_message())
    }
}
