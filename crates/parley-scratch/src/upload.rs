use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::{Result, ScratchError};

/// An uploaded file owned by exactly one request
///
/// Call [`Upload::release`] once the file has been read. An upload that is
/// dropped without being released (for example because the request was
/// cancelled mid-flight) is removed synchronously on drop.
#[derive(Debug)]
pub struct Upload {
    path: PathBuf,
    released: bool,
}

impl Upload {
    pub(crate) async fn write(path: PathBuf, content: &[u8]) -> Result<Self> {
        let write_error = |source| ScratchError::Write {
            path: path.clone(),
            source,
        };

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(write_error)?;

        // From here on a failed write leaves nothing behind
        let upload = Self {
            path: path.clone(),
            released: false,
        };

        file.write_all(content).await.map_err(write_error)?;
        file.flush().await.map_err(write_error)?;

        tracing::debug!(path = %upload.path.display(), bytes = content.len(), "stored upload");

        Ok(upload)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file back
    pub async fn read(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.path).await.map_err(|source| ScratchError::Read {
            path: self.path.clone(),
            source,
        })
    }

    /// Delete the file
    pub async fn release(mut self) -> Result<()> {
        self.released = true;
        crate::release(&self.path).await?;

        tracing::debug!(path = %self.path.display(), "released upload");

        Ok(())
    }
}

impl Drop for Upload {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        if let Err(e) = std::fs::remove_file(&self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(path = %self.path.display(), "failed to remove abandoned upload: {e}");
        }
    }
}
