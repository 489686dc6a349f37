#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod error;
mod provider;
mod request;
mod server;
mod types;

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use parley_core::ExtractPayload;

pub use error::{Result, TextGenError};
pub use provider::{GenerationParams, TextGenerator};
pub use server::{Server, TextGenServerBuilder};
pub use types::{ChatRequest, ChatResponse};

/// Build the text generation server from configuration
///
/// # Errors
///
/// Returns an error if the server fails to initialize
pub fn build_server(config: &parley_config::TextGenConfig) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        TextGenServerBuilder::new(config)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize text generation server: {e}"))?,
    );
    Ok(server)
}

/// Create the endpoint router for text generation
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route("/api/chat", post(chat))
}

/// Handle chat requests
async fn chat(
    State(server): State<Arc<Server>>,
    ExtractPayload(request): ExtractPayload<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    tracing::debug!("Chat handler called, prompt_len={}", request.prompt.len());

    let response = server.generate(&request.prompt).await?;

    tracing::debug!("Text generation complete");

    Ok(Json(ChatResponse { response }))
}
