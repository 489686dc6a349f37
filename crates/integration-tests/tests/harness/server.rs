//! Test server wrapper that starts Parley on a random port

use std::net::SocketAddr;
use std::path::PathBuf;

use parley_server::Server;
use tokio_util::sync::CancellationToken;

use super::config::TestConfig;

/// A running test server instance
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    client: reqwest::Client,
    config: TestConfig,
}

impl TestServer {
    /// Start a test server with the given configuration
    ///
    /// Binds to port 0 for automatic port assignment
    pub async fn start(config: TestConfig) -> anyhow::Result<Self> {
        let server = Server::new(&config.config)?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        // Bind the listener here so we know the actual port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, server.into_router())
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        let client = reqwest::Client::new();

        Ok(Self {
            addr,
            shutdown,
            client,
            config,
        })
    }

    /// URL of a path on the running test server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Get a reference to the HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Directory receiving uploaded audio
    pub fn upload_dir(&self) -> PathBuf {
        self.config.upload_dir()
    }

    /// Directory receiving synthesized audio
    pub fn output_dir(&self) -> PathBuf {
        self.config.output_dir()
    }

    /// Upload `content` as the `audio` file of a transcription request
    pub async fn transcribe(&self, filename: &str, content: &[u8]) -> reqwest::Response {
        let part = reqwest::multipart::Part::bytes(content.to_vec()).file_name(filename.to_owned());
        let form = reqwest::multipart::Form::new().part("audio", part);

        self.client
            .post(self.url("/api/transcribe"))
            .multipart(form)
            .send()
            .await
            .unwrap()
    }

    /// Post a JSON body
    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client.post(self.url(path)).json(body).send().await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
