//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use parley_config::{
    Config, HealthConfig, ScratchConfig, ServerConfig, SttConfig, SttProviderType, TextGenConfig,
    TextGenProviderType, TtsConfig, TtsProviderType,
};
use secrecy::SecretString;
use tempfile::TempDir;

/// Configuration plus the scratch directory it points into
pub struct TestConfig {
    pub config: Config,
    pub scratch_dir: TempDir,
}

impl TestConfig {
    pub fn upload_dir(&self) -> PathBuf {
        self.scratch_dir.path().join("uploads")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.scratch_dir.path().join("out")
    }
}

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
    scratch_dir: TempDir,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults and private scratch directories
    pub fn new() -> Self {
        let scratch_dir = tempfile::tempdir().expect("temp dir");

        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig {
                        enabled: true,
                        ..HealthConfig::default()
                    },
                    ..ServerConfig::default()
                },
                scratch: scratch_config(scratch_dir.path()),
                ..Config::default()
            },
            scratch_dir,
        }
    }

    /// Point text generation at a Hugging Face compatible backend
    pub fn with_textgen(mut self, base_url: &str) -> Self {
        self.config.textgen = Some(TextGenConfig {
            provider_type: TextGenProviderType::HuggingFace,
            model: "EleutherAI/gpt-neo-1.3B".to_owned(),
            api_key: Some(SecretString::from("test-key")),
            base_url: Some(base_url.parse().expect("valid URL")),
            max_length: 100,
            timeout: Duration::from_secs(5),
        });
        self
    }

    /// Point speech recognition at a Whisper compatible backend
    pub fn with_stt(mut self, base_url: &str) -> Self {
        self.config.stt = Some(SttConfig {
            provider_type: SttProviderType::Whisper,
            model: None,
            api_key: Some(SecretString::from("test-key")),
            base_url: Some(base_url.parse().expect("valid URL")),
            language: None,
            timeout: Duration::from_secs(5),
        });
        self
    }

    /// Point speech synthesis at an `OpenAI` compatible backend
    pub fn with_tts(mut self, base_url: &str) -> Self {
        self.config.tts = Some(TtsConfig {
            provider_type: TtsProviderType::OpenaiTts,
            model: None,
            voice: None,
            api_key: Some(SecretString::from("test-key")),
            base_url: Some(base_url.parse().expect("valid URL")),
            timeout: Duration::from_secs(5),
        });
        self
    }

    /// Configure all three engines against one backend
    pub fn with_all_engines(self, base_url: &str) -> Self {
        self.with_textgen(base_url).with_stt(base_url).with_tts(base_url)
    }

    /// Shorten every configured engine deadline
    pub fn with_engine_timeout(mut self, timeout: Duration) -> Self {
        if let Some(ref mut textgen) = self.config.textgen {
            textgen.timeout = timeout;
        }
        if let Some(ref mut stt) = self.config.stt {
            stt.timeout = timeout;
        }
        if let Some(ref mut tts) = self.config.tts {
            tts.timeout = timeout;
        }
        self
    }

    /// Set the upload size limit
    pub fn with_max_upload_size(mut self, bytes: usize) -> Self {
        self.config.server.max_upload_size = bytes;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> TestConfig {
        TestConfig {
            config: self.config,
            scratch_dir: self.scratch_dir,
        }
    }
}

fn scratch_config(root: &Path) -> ScratchConfig {
    ScratchConfig {
        upload_dir: root.join("uploads"),
        output_dir: Some(root.join("out")),
    }
}
