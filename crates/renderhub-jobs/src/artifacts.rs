//! Content-addressed on-disk artifact store.
//!
//! Artifacts are named `<fingerprint>.<ext>` in a fixed output
//! directory, written once, and treated as immutable thereafter.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use renderhub_core::error::{AppError, ErrorKind};
use renderhub_core::model::OutputFormat;
use renderhub_core::result::AppResult;

/// A finished artifact: its public URL and format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    /// Stable public URL, eligible for year-long caching.
    pub url: String,
    /// Raster format.
    pub format: OutputFormat,
}

/// Filesystem-backed artifact cache keyed by fingerprint.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
    public_base_url: String,
}

impl ArtifactStore {
    /// Create a store rooted at `dir`; the directory is created lazily
    /// on first write.
    pub fn new(dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Probe for `<fp>.gif` then `<fp>.png`; first hit wins.
    pub async fn lookup(&self, fingerprint: &str) -> Option<ArtifactRef> {
        for format in [OutputFormat::Gif, OutputFormat::Png] {
            let path = self.artifact_path(fingerprint, format);
            if fs::try_exists(&path).await.unwrap_or(false) {
                debug!(fingerprint, %format, "Artifact cache hit");
                return Some(self.reference(fingerprint, format));
            }
        }
        None
    }

    /// Write an artifact atomically (temp file + rename) and return its
    /// reference. Last writer wins; content for a fingerprint is
    /// identical by construction.
    pub async fn write(
        &self,
        fingerprint: &str,
        format: OutputFormat,
        bytes: &[u8],
    ) -> AppResult<ArtifactRef> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create output dir: {}", self.dir.display()),
                e,
            )
        })?;

        let final_path = self.artifact_path(fingerprint, format);
        let temp_path = self
            .dir
            .join(format!("{fingerprint}.{}.{}", format.extension(), Uuid::new_v4()));

        fs::write(&temp_path, bytes).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write artifact: {}", temp_path.display()),
                e,
            )
        })?;

        fs::rename(&temp_path, &final_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to finalize artifact: {}", final_path.display()),
                e,
            )
        })?;

        debug!(fingerprint, %format, bytes = bytes.len(), "Wrote artifact");
        Ok(self.reference(fingerprint, format))
    }

    /// Read a stored artifact by file name (`<fp>.<ext>`).
    pub async fn read(&self, file_name: &str) -> AppResult<Vec<u8>> {
        let path = self.dir.join(file_name);
        fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Artifact not found: {file_name}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read artifact: {}", path.display()),
                    e,
                )
            }
        })
    }

    /// The output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn artifact_path(&self, fingerprint: &str, format: OutputFormat) -> PathBuf {
        self.dir
            .join(format!("{fingerprint}.{}", format.extension()))
    }

    fn reference(&self, fingerprint: &str, format: OutputFormat) -> ArtifactRef {
        ArtifactRef {
            url: format!(
                "{}/out/{fingerprint}.{}",
                self.public_base_url,
                format.extension()
            ),
            format,
        }
    }
}
