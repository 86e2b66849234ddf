//! Filesystem [`ArtifactSink`].
//!
//! Bytes are written to a temporary file inside the download directory and
//! then renamed into place, so a partially written form never appears under
//! its final name. The temporary file is deleted when dropped, which covers
//! every failure path.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use formassist_core::download::ArtifactSink;
use formassist_types::download::DownloadArtifact;
use formassist_types::error::DownloadError;

/// Give up after this many `name (n).ext` candidates.
const MAX_NAME_ATTEMPTS: usize = 100;

/// Saves downloads into a directory, never overwriting an existing file.
#[derive(Debug, Clone)]
pub struct FsArtifactSink {
    dir: PathBuf,
}

impl FsArtifactSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArtifactSink for FsArtifactSink {
    async fn save(&self, artifact: &DownloadArtifact) -> Result<PathBuf, DownloadError> {
        let dir = self.dir.clone();
        let filename = artifact.suggested_filename.clone();
        let bytes = artifact.bytes.clone();

        tokio::task::spawn_blocking(move || write_into(&dir, &filename, &bytes))
            .await
            .map_err(|e| DownloadError::Io(format!("save task failed: {e}")))?
    }
}

fn io_error(err: std::io::Error) -> DownloadError {
    DownloadError::Io(err.to_string())
}

fn write_into(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError> {
    std::fs::create_dir_all(dir).map_err(io_error)?;

    let mut file = tempfile::Builder::new()
        .prefix(".formassist-")
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(io_error)?;
    file.write_all(bytes).map_err(io_error)?;
    file.as_file().sync_all().map_err(io_error)?;

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let target = dir.join(candidate_name(filename, attempt));
        match file.persist_noclobber(&target) {
            Ok(_) => {
                tracing::debug!(path = %target.display(), "download persisted");
                return Ok(target);
            }
            Err(err) if err.error.kind() == ErrorKind::AlreadyExists => file = err.file,
            Err(err) => return Err(io_error(err.error)),
        }
    }

    Err(DownloadError::Io(format!(
        "no free filename for '{filename}' in {}",
        dir.display()
    )))
}

/// `report.pdf`, then `report (1).pdf`, `report (2).pdf`, ...
fn candidate_name(filename: &str, attempt: usize) -> String {
    if attempt == 0 {
        return filename.to_string();
    }
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({attempt}).{ext}"),
        _ => format!("{filename} ({attempt})"),
    }
}
