#![allow(clippy::must_use_candidate)]

mod duration;
mod env;
pub mod health;
mod loader;
pub mod scratch;
pub mod server;
pub mod stt;
pub mod telemetry;
pub mod textgen;
pub mod tts;

use serde::Deserialize;

pub use health::*;
pub use scratch::*;
pub use server::*;
pub use stt::*;
pub use telemetry::*;
pub use textgen::*;
pub use tts::*;

/// Top-level Parley configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Scratch storage for uploaded and synthesized audio
    #[serde(default)]
    pub scratch: ScratchConfig,
    /// Text generation engine
    #[serde(default)]
    pub textgen: Option<TextGenConfig>,
    /// Speech recognition engine
    #[serde(default)]
    pub stt: Option<SttConfig>,
    /// Speech synthesis engine
    #[serde(default)]
    pub tts: Option<TtsConfig>,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
