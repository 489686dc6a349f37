use std::path::PathBuf;

use serde::Deserialize;

/// Filesystem locations for transient audio files
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScratchConfig {
    /// Directory that receives uploaded audio, created at startup if absent
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Directory for synthesized audio, defaults to the system temp directory
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            output_dir: None,
        }
    }
}

impl ScratchConfig {
    /// Effective output directory
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}
