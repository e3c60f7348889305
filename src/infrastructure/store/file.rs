//! Filesystem recording store adapter

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::{Locator, RecordingStore, StoreError};
use crate::domain::recording::Recording;

/// Publishes recordings as files under a directory
pub struct FileRecordingStore {
    dir: PathBuf,
}

impl FileRecordingStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_name(recording: &Recording) -> String {
        format!("clip-{}.{}", Uuid::new_v4(), recording.mime_type().extension())
    }
}

#[async_trait]
impl RecordingStore for FileRecordingStore {
    async fn publish(&self, recording: &Recording) -> Result<Locator, StoreError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::WriteFailed(format!("{}: {}", self.dir.display(), e)))?;

        let path = self.dir.join(Self::file_name(recording));
        fs::write(&path, recording.data())
            .await
            .map_err(|e| StoreError::WriteFailed(format!("{}: {}", path.display(), e)))?;

        let path = match fs::canonicalize(&path).await {
            Ok(canonical) => canonical,
            Err(_) => std::path::absolute(&path)
                .map_err(|e| StoreError::WriteFailed(format!("{}: {}", path.display(), e)))?,
        };
        tracing::debug!(
            path = %path.display(),
            size = recording.size_bytes(),
            "recording published"
        );

        Locator::from_path(&path).ok_or_else(|| {
            StoreError::WriteFailed(format!("{}: not an absolute path", path.display()))
        })
    }

    async fn revoke(&self, locator: &Locator) -> Result<(), StoreError> {
        let path = locator
            .file_path()
            .ok_or_else(|| StoreError::NotFound(locator.to_string()))?;

        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound(locator.to_string())
            } else {
                StoreError::RevokeFailed(format!("{}: {}", path.display(), e))
            }
        })
    }
}
