//! Upload sources for the ingestion pipeline
//!
//! An [`UploadSource`] owns the raw bytes of one import run. The pipeline
//! opens it once for reading and releases it exactly once when decoding
//! completes or fails; after release the resource must not be touched again.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::{AsyncRead, AsyncWriteExt};
use uuid::Uuid;

/// The input resource of one ingestion run.
#[async_trait]
pub trait UploadSource: Send {
    type Reader: AsyncRead + Send + Unpin;

    /// Open the underlying resource for reading.
    async fn open(&mut self) -> std::io::Result<Self::Reader>;

    /// Free the underlying resource. Invoked exactly once per run by the
    /// pipeline, on every exit path.
    async fn release(&mut self);
}

/// An uploaded file spooled to a uniquely-named temporary file.
///
/// Release deletes the file. Dropping an unreleased source also deletes it,
/// so an abandoned run cannot leak temp files.
#[derive(Debug)]
pub struct TempFileSource {
    path: Option<PathBuf>,
}

impl TempFileSource {
    /// Take ownership of an already-spooled file at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Spool an uploaded multipart field to a temp file.
    ///
    /// The upload is consumed incrementally; a partial write removes the
    /// temp file before returning the error.
    pub async fn spool(mut field: axum::extract::multipart::Field<'_>) -> std::io::Result<Self> {
        let path = std::env::temp_dir().join(format!("roster-import-{}.csv", Uuid::new_v4()));
        let mut file = tokio::fs::File::create(&path).await?;

        let written = async {
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|e| std::io::Error::other(format!("multipart read failed: {e}")))?
            {
                file.write_all(&chunk).await?;
            }
            file.flush().await
        }
        .await;

        match written {
            Ok(()) => Ok(Self::new(path)),
            Err(err) => {
                drop(file);
                if let Err(cleanup_err) = tokio::fs::remove_file(&path).await {
                    tracing::warn!(path = %path.display(), error = %cleanup_err, "Failed to remove partial upload");
                }
                Err(err)
            },
        }
    }

    /// Path of the spooled file, if not yet released.
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }
}

#[async_trait]
impl UploadSource for TempFileSource {
    type Reader = tokio::fs::File;

    async fn open(&mut self) -> std::io::Result<Self::Reader> {
        match &self.path {
            Some(path) => tokio::fs::File::open(path).await,
            None => Err(std::io::Error::other("upload source already released")),
        }
    }

    async fn release(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(err) = tokio::fs::remove_file(&path).await {
                tracing::warn!(path = %path.display(), error = %err, "Failed to delete temp upload file");
            }
        }
    }
}

impl Drop for TempFileSource {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(err) = std::fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %err, "Failed to delete temp upload file on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;
    use tokio::io::AsyncReadExt;

    async fn spooled_fixture(dir: &Path, contents: &[u8]) -> TempFileSource {
        let path = dir.join("upload.csv");
        tokio::fs::write(&path, contents).await.unwrap();
        TempFileSource::new(path)
    }

    #[tokio::test]
    async fn test_open_reads_spooled_contents() {
        let dir = tempdir().unwrap();
        let mut source = spooled_fixture(dir.path(), b"name,email\n").await;

        let mut reader = source.open().await.unwrap();
        let mut contents = String::new();
        reader.read_to_string(&mut contents).await.unwrap();
        assert_eq!(contents, "name,email\n");

        source.release().await;
    }

    #[tokio::test]
    async fn test_release_deletes_file_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut source = spooled_fixture(dir.path(), b"x").await;
        let path = source.path().unwrap().clone();
        assert!(path.exists());

        source.release().await;
        assert!(!path.exists());
        assert!(source.path().is_none());

        // A second release is a no-op.
        source.release().await;
    }

    #[tokio::test]
    async fn test_open_after_release_fails() {
        let dir = tempdir().unwrap();
        let mut source = spooled_fixture(dir.path(), b"x").await;
        source.release().await;
        assert!(source.open().await.is_err());
    }

    #[tokio::test]
    async fn test_drop_removes_unreleased_file() {
        let dir = tempdir().unwrap();
        let source = spooled_fixture(dir.path(), b"x").await;
        let path = source.path().unwrap().clone();
        assert!(path.exists());

        drop(source);
        assert!(!path.exists());
    }
}
