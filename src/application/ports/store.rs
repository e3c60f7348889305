//! Recording store port interface

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;

use crate::domain::recording::Recording;

/// Recording store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Failed to store recording: {0}")]
    WriteFailed(String),

    #[error("Locator no longer references a recording: {0}")]
    NotFound(String),

    #[error("Failed to revoke locator: {0}")]
    RevokeFailed(String),
}

/// Revocable reference to a published recording
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator(String);

impl Locator {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Build a percent-encoded `file://` locator; `None` for relative paths
    pub fn from_path(path: &Path) -> Option<Self> {
        Url::from_file_path(path).ok().map(|url| Self(url.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Local path for `file://` locators
    pub fn file_path(&self) -> Option<PathBuf> {
        let url = Url::parse(&self.0).ok()?;
        if url.scheme() != "file" {
            return None;
        }
        url.to_file_path().ok()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Port for exposing recordings as playable/downloadable artifacts
#[async_trait]
pub trait RecordingStore: Send + Sync {
    /// Publish a recording and return its locator
    async fn publish(&self, recording: &Recording) -> Result<Locator, StoreError>;

    /// Revoke a locator, releasing the bytes it references
    async fn revoke(&self, locator: &Locator) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_locator_round_trips_path() {
        let locator = Locator::from_path(Path::new("/tmp/clip.webm")).unwrap();
        assert_eq!(locator.as_str(), "file:///tmp/clip.webm");
        assert_eq!(locator.file_path(), Some(PathBuf::from("/tmp/clip.webm")));
    }

    #[test]
    fn special_characters_are_percent_encoded() {
        let path = Path::new("/tmp/my clips/#1 100%.webm");
        let locator = Locator::from_path(path).unwrap();
        assert_eq!(locator.as_str(), "file:///tmp/my%20clips/%231%20100%25.webm");
        assert_eq!(locator.file_path(), Some(path.to_path_buf()));
    }

    #[test]
    fn relative_path_has_no_locator() {
        assert!(Locator::from_path(Path::new("clips/clip.webm")).is_none());
    }

    #[test]
    fn non_file_locator_has_no_path() {
        assert!(Locator::new("blob:abc").file_path().is_none());
    }
}
