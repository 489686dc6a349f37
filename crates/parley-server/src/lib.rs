#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod health;

use std::net::SocketAddr;

use axum::Router;
use parley_config::Config;
use parley_scratch::Scratch;
use tower_http::trace::TraceLayer;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// Prepares the scratch directories, then mounts a route for each
    /// configured engine. Routes of engines left out of the configuration
    /// are not mounted and answer 404.
    ///
    /// # Errors
    ///
    /// Returns an error if the scratch directories cannot be prepared or an
    /// engine fails to initialize
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let listen_address = config.server.listen_address();

        let scratch = Scratch::from_config(&config.scratch)?;

        match scratch.sweep_stale_uploads() {
            Ok(0) => {}
            Ok(removed) => tracing::info!(removed, "removed uploads left by a previous run"),
            Err(e) => tracing::warn!("failed to sweep upload directory: {e}"),
        }

        let mut app = Router::new();

        // Health check
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        // Text generation routes
        if let Some(ref textgen_config) = config.textgen {
            let textgen_state = textgen::build_server(textgen_config)?;
            tracing::info!(engine = textgen_state.engine(), "text generation enabled");
            app = app.merge(textgen::endpoint_router().with_state(textgen_state));
        }

        // Speech recognition routes
        if let Some(ref stt_config) = config.stt {
            let stt_state = stt::build_server(stt_config, scratch.clone(), config.server.max_upload_size)?;
            tracing::info!(engine = stt_state.engine(), "speech recognition enabled");
            app = app.merge(stt::endpoint_router().with_state(stt_state));
        }

        // Speech synthesis routes
        if let Some(ref tts_config) = config.tts {
            let tts_state = tts::build_server(tts_config, scratch)?;
            tracing::info!(engine = tts_state.engine(), "speech synthesis enabled");
            app = app.merge(tts::endpoint_router().with_state(tts_state));
        }

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
