//! Scratch storage for audio files that live for a single request
//!
//! Uploaded audio is written under the upload directory and released right
//! after it has been read. Synthesized audio is written to a uniquely named
//! file in the output directory and deleted when its owner is dropped. Every
//! name is unique, so concurrent requests never touch each other's files.

#![allow(clippy::missing_errors_doc)]

mod error;
mod output;
mod upload;

use std::path::{Path, PathBuf};

use parley_config::ScratchConfig;
use uuid::Uuid;

pub use error::{Result, ScratchError};
pub use output::{OutputFile, OutputReader};
pub use upload::Upload;

const OUTPUT_PREFIX: &str = "parley-";

/// Handle on the scratch directories
#[derive(Debug, Clone)]
pub struct Scratch {
    upload_dir: PathBuf,
    output_dir: PathBuf,
}

impl Scratch {
    /// Use the given directories, creating them if absent
    pub fn new(upload_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Result<Self> {
        let scratch = Self {
            upload_dir: upload_dir.into(),
            output_dir: output_dir.into(),
        };

        for dir in [&scratch.upload_dir, &scratch.output_dir] {
            std::fs::create_dir_all(dir).map_err(|source| ScratchError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(scratch)
    }

    pub fn from_config(config: &ScratchConfig) -> Result<Self> {
        Self::new(&config.upload_dir, config.output_dir())
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create a new, empty, uniquely named file for engine output
    ///
    /// The file is removed when the returned handle (or the reader opened
    /// from it) is dropped.
    pub async fn allocate_output(&self, suffix: &str) -> Result<OutputFile> {
        let dir = self.output_dir.clone();
        let suffix = suffix.to_string();

        tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix(OUTPUT_PREFIX)
                .suffix(&suffix)
                .tempfile_in(&dir)
                .map(|file| OutputFile::new(file.into_temp_path()))
                .map_err(|source| ScratchError::Allocate { dir, source })
        })
        .await
        .map_err(|e| ScratchError::Allocate {
            dir: self.output_dir.clone(),
            source: std::io::Error::other(e),
        })?
    }

    /// Persist uploaded bytes under the upload directory
    ///
    /// `filename` must already be sanitized. It is prefixed with a random
    /// UUID so that two requests uploading `clip.wav` never share a path.
    pub async fn store_upload(&self, filename: &str, content: &[u8]) -> Result<Upload> {
        let path = self.upload_dir.join(format!("{}-{filename}", Uuid::new_v4()));

        Upload::write(path, content).await
    }

    /// Remove files a previous process left in the upload directory
    ///
    /// Only names carrying the upload UUID prefix are considered.
    pub fn sweep_stale_uploads(&self) -> Result<usize> {
        let entries = std::fs::read_dir(&self.upload_dir).map_err(|source| ScratchError::Read {
            path: self.upload_dir.clone(),
            source,
        })?;

        let mut removed = 0;

        for entry in entries.flatten() {
            let path = entry.path();

            if !path.is_file() || !has_upload_prefix(&entry.file_name().to_string_lossy()) {
                continue;
            }

            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(path = %path.display(), "failed to remove stale upload: {e}"),
            }
        }

        if removed > 0 {
            tracing::info!(removed, dir = %self.upload_dir.display(), "removed stale uploads");
        }

        Ok(removed)
    }
}

/// Delete a scratch file
///
/// A file that is already gone counts as released.
pub async fn release(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ScratchError::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn has_upload_prefix(name: &str) -> bool {
    name.get(..36).is_some_and(|prefix| Uuid::parse_str(prefix).is_ok()) && name[36..].starts_with('-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch() -> (tempfile::TempDir, Scratch) {
        let root = tempfile::tempdir().unwrap();
        let scratch = Scratch::new(root.path().join("uploads"), root.path().join("out")).unwrap();
        (root, scratch)
    }

    fn file_count(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn creates_missing_directories() {
        let (_root, scratch) = scratch();
        assert!(scratch.upload_dir().is_dir());
        assert!(scratch.output_dir().is_dir());
    }

    #[tokio::test]
    async fn uploads_get_unique_paths() {
        let (_root, scratch) = scratch();

        let first = scratch.store_upload("clip.wav", b"RIFF").await.unwrap();
        let second = scratch.store_upload("clip.wav", b"RIFF").await.unwrap();

        assert_ne!(first.path(), second.path());
        assert!(first.path().starts_with(scratch.upload_dir()));
        assert!(first.path().to_string_lossy().ends_with("-clip.wav"));
        assert_eq!(std::fs::read(first.path()).unwrap(), b"RIFF");
    }

    #[tokio::test]
    async fn release_deletes_upload() {
        let (_root, scratch) = scratch();

        let upload = scratch.store_upload("clip.ogg", b"OggS").await.unwrap();
        let path = upload.path().to_path_buf();
        upload.release().await.unwrap();

        assert!(!path.exists());
        assert_eq!(file_count(scratch.upload_dir()), 0);
    }

    #[tokio::test]
    async fn release_is_idempotent() {
        let (_root, scratch) = scratch();

        let upload = scratch.store_upload("clip.mp3", b"ID3").await.unwrap();
        let path = upload.path().to_path_buf();

        release(&path).await.unwrap();
        release(&path).await.unwrap();
        upload.release().await.unwrap();
    }

    #[tokio::test]
    async fn dropped_upload_is_removed() {
        let (_root, scratch) = scratch();

        let upload = scratch.store_upload("clip.wav", b"RIFF").await.unwrap();
        let path = upload.path().to_path_buf();
        drop(upload);

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn output_files_are_unique_and_removed_on_drop() {
        let (_root, scratch) = scratch();

        let first = scratch.allocate_output(".mp3").await.unwrap();
        let second = scratch.allocate_output(".mp3").await.unwrap();

        assert_ne!(first.path(), second.path());
        assert!(first.path().exists());
        assert_eq!(std::fs::metadata(first.path()).unwrap().len(), 0);
        assert!(first.path().to_string_lossy().ends_with(".mp3"));

        drop(first);
        drop(second);
        assert_eq!(file_count(scratch.output_dir()), 0);
    }

    #[tokio::test]
    async fn reader_owns_output_until_dropped() {
        use tokio::io::AsyncReadExt;

        let (_root, scratch) = scratch();

        let output = scratch.allocate_output(".mp3").await.unwrap();
        let path = output.path().to_path_buf();
        std::fs::write(&path, b"ID3 audio").unwrap();
        assert_eq!(output.len().await.unwrap(), 9);

        let mut reader = output.open().await.unwrap();
        assert_eq!(reader.len(), 9);
        assert!(path.exists());

        let mut content = Vec::new();
        reader.read_to_end(&mut content).await.unwrap();
        assert_eq!(content, b"ID3 audio");

        drop(reader);
        assert!(!path.exists());
    }

    #[test]
    fn sweep_only_touches_upload_names() {
        let (_root, scratch) = scratch();

        let stale = scratch.upload_dir().join(format!("{}-old.wav", Uuid::new_v4()));
        let foreign = scratch.upload_dir().join("keep-me.wav");
        std::fs::write(&stale, b"RIFF").unwrap();
        std::fs::write(&foreign, b"RIFF").unwrap();

        assert_eq!(scratch.sweep_stale_uploads().unwrap(), 1);
        assert!(!stale.exists());
        assert!(foreign.exists());
    }
}
