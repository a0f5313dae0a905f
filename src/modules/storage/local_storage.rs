//! Local filesystem storage for uploaded files
//!
//! Bytes live under a single upload directory. Each file is stored as
//! `<unix-timestamp>_<original name>`, which is unique only at second
//! granularity: two uploads of the same name within one second share a path.

use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::debug;

/// Result of a successful write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub stored_name: String,
    pub storage_path: PathBuf,
    pub bytes_written: u64,
}

/// Outcome of removing stored bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// Nothing was there; treated as already clean
    NotFound,
}

/// Disk-backed storage rooted at the configured upload directory
#[derive(Debug, Clone)]
pub struct LocalStorage {
    directory: PathBuf,
}

impl LocalStorage {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Name under which bytes of `original_name` are stored at `timestamp`
    pub fn stored_name_for(original_name: &str, timestamp: i64) -> String {
        format!("{}_{}", timestamp, original_name)
    }

    /// Create the upload directory (and parents) if missing
    pub async fn ensure_directory(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.directory).await
    }

    /// Stream `content` into a new file for `original_name`.
    ///
    /// An existing file at the derived path is overwritten.
    pub async fn write<R>(&self, original_name: &str, mut content: R) -> std::io::Result<StoredFile>
    where
        R: AsyncRead + Unpin,
    {
        self.ensure_directory().await?;

        let stored_name = Self::stored_name_for(original_name, Utc::now().timestamp());
        let storage_path = self.directory.join(&stored_name);

        let mut file = fs::File::create(&storage_path).await?;
        let bytes_written = tokio::io::copy(&mut content, &mut file).await?;
        file.flush().await?;

        debug!(
            "Stored {} bytes at {}",
            bytes_written,
            storage_path.display()
        );

        Ok(StoredFile {
            stored_name,
            storage_path,
            bytes_written,
        })
    }

    /// Delete stored bytes; a missing file is not an error
    pub async fn remove(&self, storage_path: impl AsRef<Path>) -> std::io::Result<RemoveOutcome> {
        match fs::remove_file(storage_path.as_ref()).await {
            Ok(()) => Ok(RemoveOutcome::Removed),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(RemoveOutcome::NotFound),
            Err(e) => Err(e),
        }
    }

    pub async fn exists(&self, storage_path: impl AsRef<Path>) -> std::io::Result<bool> {
        fs::try_exists(storage_path.as_ref()).await
    }

    pub async fn open(&self, storage_path: impl AsRef<Path>) -> std::io::Result<fs::File> {
        fs::File::open(storage_path.as_ref()).await
    }
}
