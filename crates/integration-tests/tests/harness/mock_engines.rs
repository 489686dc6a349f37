//! Mock engine backend for integration tests
//!
//! Serves the three engine APIs Parley speaks by default: Hugging Face text
//! generation, Whisper transcription and `OpenAI` speech synthesis.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use tokio_util::sync::CancellationToken;

use super::MP3;

/// How an engine endpoint answers
#[derive(Debug, Clone)]
pub enum Reply {
    /// Answer successfully with this text (ignored by synthesis)
    Ok(&'static str),
    /// Answer with this status and a plain-text body
    Status(u16),
    /// Wait this long before answering successfully
    Delay(Duration, &'static str),
}

/// Per-endpoint behaviour of the mock backend
#[derive(Debug, Clone)]
pub struct Behaviour {
    pub generation: Reply,
    pub transcription: Reply,
    pub speech: Reply,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            generation: Reply::Ok("Hello world"),
            transcription: Reply::Ok("turn on the kitchen lights"),
            speech: Reply::Ok(""),
        }
    }
}

/// Mock engine backend that returns predictable responses
pub struct MockEngines {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    behaviour: Behaviour,
    generation_count: AtomicU32,
    transcription_count: AtomicU32,
    speech_count: AtomicU32,
}

impl MockEngines {
    /// Start the mock server with default behaviour, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(Behaviour::default()).await
    }

    /// Start the mock server with custom behaviour
    pub async fn start_with(behaviour: Behaviour) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            behaviour,
            generation_count: AtomicU32::new(0),
            transcription_count: AtomicU32::new(0),
            speech_count: AtomicU32::new(0),
        });

        let app = Router::new()
            .route("/models/{*model}", routing::post(handle_generation))
            .route("/audio/transcriptions", routing::post(handle_transcription))
            .route("/audio/speech", routing::post(handle_speech))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as an engine
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of generation requests received
    pub fn generation_count(&self) -> u32 {
        self.state.generation_count.load(Ordering::Relaxed)
    }

    /// Number of transcription requests received
    pub fn transcription_count(&self) -> u32 {
        self.state.transcription_count.load(Ordering::Relaxed)
    }

    /// Number of synthesis requests received
    pub fn speech_count(&self) -> u32 {
        self.state.speech_count.load(Ordering::Relaxed)
    }
}

impl Drop for MockEngines {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// A base URL nothing listens on
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    format!("http://{addr}")
}

async fn resolve(reply: &Reply) -> Result<&'static str, Response> {
    match reply {
        Reply::Ok(text) => Ok(*text),
        Reply::Status(status) => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            Err((status, "mock engine failure").into_response())
        }
        Reply::Delay(delay, text) => {
            tokio::time::sleep(*delay).await;
            Ok(*text)
        }
    }
}

async fn handle_generation(State(state): State<Arc<MockState>>, Json(body): Json<serde_json::Value>) -> Response {
    state.generation_count.fetch_add(1, Ordering::Relaxed);

    assert_eq!(body["parameters"]["num_return_sequences"], 1);

    match resolve(&state.behaviour.generation).await {
        Ok(text) => Json(serde_json::json!([{ "generated_text": text }])).into_response(),
        Err(response) => response,
    }
}

async fn handle_transcription(State(state): State<Arc<MockState>>, _body: Bytes) -> Response {
    state.transcription_count.fetch_add(1, Ordering::Relaxed);

    match resolve(&state.behaviour.transcription).await {
        Ok(text) => Json(serde_json::json!({ "text": text })).into_response(),
        Err(response) => response,
    }
}

async fn handle_speech(State(state): State<Arc<MockState>>, Json(body): Json<serde_json::Value>) -> Response {
    state.speech_count.fetch_add(1, Ordering::Relaxed);

    assert_eq!(body["response_format"], "mp3");

    match resolve(&state.behaviour.speech).await {
        Ok(_) => ([(header::CONTENT_TYPE, "audio/mpeg")], MP3).into_response(),
        Err(response) => response,
    }
}
