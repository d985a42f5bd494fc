//! Temporary File Manager: owns the on-disk lifecycle of uploaded files.
//!
//! `StagingArea::stage` writes bytes under a unique name and hands back a
//! `StagedFile` guard. The guard deletes its file exactly once: through
//! `release` on the happy path, or through `Drop` on every other exit
//! (early return, error, panic, or the request future being dropped).

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::TempPath;
use thiserror::Error;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

const FALLBACK_FILE_NAME: &str = "upload.pdf";
const MAX_NAME_LEN: usize = 100;
const RANDOM_NAME_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("failed to create staging directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create staged file in {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write staged file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Flat, ephemeral directory holding uploads awaiting processing.
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `bytes` to a fresh file named
    /// `<epoch-millis>-<random>-<sanitized original name>`. The directory is
    /// created on first use. Never overwrites an existing file.
    pub async fn stage(
        &self,
        original_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<StagedFile, StagingError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StagingError::CreateDir {
                path: self.dir.clone(),
                source,
            })?;

        let prefix = format!("{}-", Utc::now().timestamp_millis());
        let suffix = format!("-{}", sanitize_file_name(original_name));
        let named = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(&suffix)
            .rand_bytes(RANDOM_NAME_LEN)
            .tempfile_in(&self.dir)
            .map_err(|source| StagingError::Create {
                path: self.dir.clone(),
                source,
            })?;

        // From here on the guard owns the path; a failed write removes it.
        let (file, temp) = named.into_parts();
        let staged = StagedFile {
            path: temp.to_path_buf(),
            temp: Some(temp),
            original_name: original_name.to_string(),
            content_type: content_type.to_string(),
            size: bytes.len(),
        };

        let mut file = File::from_std(file);
        let written = write_all(&mut file, bytes).await;
        drop(file);
        written.map_err(|source| StagingError::Write {
            path: staged.path.clone(),
            source,
        })?;

        debug!(path = %staged.path.display(), size = staged.size, "Staged upload");
        Ok(staged)
    }
}

async fn write_all(file: &mut File, bytes: &[u8]) -> io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await
}

/// Reduces a client-supplied name to a single safe path component.
fn sanitize_file_name(original_name: &str) -> String {
    let last = original_name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect();

    if cleaned.chars().all(|c| c == '.' || c == '_') {
        FALLBACK_FILE_NAME.to_string()
    } else {
        cleaned
    }
}

/// One uploaded document on disk, owned by exactly one request.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    /// Taken on the first removal attempt.
    temp: Option<TempPath>,
    original_name: String,
    content_type: String,
    size: usize,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Deletes the staged file. Never fails: problems are logged.
    pub fn release(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if let Some(temp) = self.temp.take() {
            log_removal(&self.path, temp.close());
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        self.remove();
    }
}

fn log_removal(path: &Path, result: io::Result<()>) {
    match result {
        Ok(()) => debug!(path = %path.display(), "Released staged file"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Staged file already removed")
        }
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to delete staged file"),
    }
}
