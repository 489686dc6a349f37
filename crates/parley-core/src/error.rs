use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of every error response: `{"error": "<message>"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Build a JSON error response with the given status
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ErrorBody { error: message.into() };

    (status, Json(body)).into_response()
}

/// A request refused before any engine or filesystem work happened
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Malformed or missing input, the message is part of the public contract
    #[error("{0}")]
    BadRequest(&'static str),

    /// The body could not be read off the connection
    #[error("Failed to read request body: {0}")]
    Unreadable(String),

    /// The body exceeds the route's size limit
    #[error("Request body is too large, limit is {0} bytes")]
    PayloadTooLarge(usize),
}

impl Rejection {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Unreadable(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        tracing::debug!(reason = %self, "request rejected");

        error_response(self.status_code(), self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    #[tokio::test]
    async fn bad_request_renders_message_verbatim() {
        let response = Rejection::BadRequest("No prompt provided").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], br#"{"error":"No prompt provided"}"#);
    }

    #[test]
    fn oversized_body_is_413() {
        assert_eq!(Rejection::PayloadTooLarge(10).status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
