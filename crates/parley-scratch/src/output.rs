use std::{
    io,
    path::Path,
    pin::Pin,
    task::{Context, Poll},
};

use tempfile::TempPath;
use tokio::io::{AsyncRead, ReadBuf};

use crate::error::{Result, ScratchError};

/// A freshly allocated file an engine writes its output into
///
/// Deleted when dropped.
#[derive(Debug)]
pub struct OutputFile {
    path: TempPath,
}

impl OutputFile {
    pub(crate) const fn new(path: TempPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current size of the file in bytes
    pub async fn len(&self) -> Result<u64> {
        tokio::fs::metadata(&self.path)
            .await
            .map(|metadata| metadata.len())
            .map_err(|source| self.read_error(source))
    }

    /// Open the file for streaming
    ///
    /// Ownership moves into the reader, which deletes the file once it is
    /// dropped.
    pub async fn open(self) -> Result<OutputReader> {
        let file = tokio::fs::File::open(&self.path)
            .await
            .map_err(|source| self.read_error(source))?;

        let len = file
            .metadata()
            .await
            .map_err(|source| self.read_error(source))?
            .len();

        Ok(OutputReader {
            file,
            len,
            _path: self.path,
        })
    }

    fn read_error(&self, source: io::Error) -> ScratchError {
        ScratchError::Read {
            path: self.path.to_path_buf(),
            source,
        }
    }
}

/// Reader over an output file that removes the file on drop
#[derive(Debug)]
pub struct OutputReader {
    file: tokio::fs::File,
    len: u64,
    // Declared after `file` so the handle is closed before the path is removed
    _path: TempPath,
}

impl OutputReader {
    /// Size of the file when it was opened
    pub const fn len(&self) -> u64 {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl AsyncRead for OutputReader {
    fn poll_read(mut self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.file).poll_read(cx, buf)
    }
}
