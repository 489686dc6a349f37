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

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    routing::post,
};
use parley_scratch::Scratch;

pub use error::{Result, SttError};
pub use provider::Recognizer;
pub use request::ExtractUpload;
pub use server::{Server, SttServerBuilder};
pub use types::{AudioClip, Recognition, TranscribeRequest, TranscribeResponse};

/// Build the speech recognition server from configuration
///
/// # Errors
///
/// Returns an error if the server fails to initialize
pub fn build_server(
    config: &parley_config::SttConfig,
    scratch: Scratch,
    max_upload_size: usize,
) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        SttServerBuilder::new(config, scratch, max_upload_size)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize speech recognition server: {e}"))?,
    );
    Ok(server)
}

/// Create the endpoint router for speech recognition
///
/// The upload extractor enforces its own size limit, so axum's default body
/// limit is lifted on this route.
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new()
        .route("/api/transcribe", post(transcribe))
        .layer(DefaultBodyLimit::disable())
}

/// Handle transcription uploads
async fn transcribe(
    State(server): State<Arc<Server>>,
    ExtractUpload(request): ExtractUpload,
) -> Result<Json<TranscribeResponse>> {
    tracing::debug!(
        "Transcribe handler called, file={}, size={}",
        request.filename,
        request.audio.len()
    );

    let recognition = server.transcribe_upload(request).await?;

    tracing::debug!("Transcription complete: {recognition:?}");

    Ok(Json(TranscribeResponse {
        text: recognition.into_text(),
    }))
}
