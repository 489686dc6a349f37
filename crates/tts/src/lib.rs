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
    Router,
    body::Body,
    extract::State,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
    routing::post,
};
use parley_core::ExtractPayload;
use parley_scratch::Scratch;
use tokio_util::io::ReaderStream;

pub use error::{Result, TtsError};
pub use provider::Synthesizer;
pub use server::{Server, TtsServerBuilder};
pub use types::SynthesizeRequest;

/// Media type of every synthesized response
pub const AUDIO_MEDIA_TYPE: &str = "audio/mp3";

/// Build the speech synthesis server from configuration
///
/// # Errors
///
/// Returns an error if the server fails to initialize
pub fn build_server(config: &parley_config::TtsConfig, scratch: Scratch) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        TtsServerBuilder::new(config, scratch)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize speech synthesis server: {e}"))?,
    );
    Ok(server)
}

/// Create the endpoint router for speech synthesis
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route("/api/synthesize", post(synthesize))
}

/// Handle speech synthesis requests
///
/// The audio is streamed from the output file, which is deleted once the
/// response body has been dropped.
async fn synthesize(
    State(server): State<Arc<Server>>,
    ExtractPayload(request): ExtractPayload<SynthesizeRequest>,
) -> Result<Response> {
    tracing::debug!("Synthesize handler called, text_len={}", request.text.len());

    let output = server.synthesize(&request.text).await?;

    let disposition = output
        .path()
        .file_name()
        .and_then(|name| HeaderValue::from_str(&format!("attachment; filename=\"{}\"", name.to_string_lossy())).ok())
        .unwrap_or_else(|| HeaderValue::from_static("attachment"));

    let reader = output.open().await?;
    let len = reader.len();

    tracing::debug!("Speech synthesis complete, streaming {len} bytes");

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(AUDIO_MEDIA_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_LENGTH, HeaderValue::from(len)),
        ],
        Body::from_stream(ReaderStream::new(reader)),
    )
        .into_response())
}
