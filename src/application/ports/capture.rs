//! Capture device port interfaces

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::capture::{CaptureConstraints, RecorderOptions};
use crate::domain::recording::VideoMimeType;

use super::events::DeviceEventSender;

/// Device acquisition and runtime errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeviceError {
    #[error("Capture device not found: {0}")]
    NotFound(String),

    #[error("Capture device is already in use: {0}")]
    InUse(String),

    #[error("Requested capture settings cannot be satisfied: {0}")]
    ConstraintsUnsatisfiable(String),

    #[error("Permission to use the capture device was denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid capture configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Capture device failed: {0}")]
    Failed(String),
}

impl DeviceError {
    /// Short machine-readable kind
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not-found",
            Self::InUse(_) => "in-use",
            Self::ConstraintsUnsatisfiable(_) => "constraints-unsatisfiable",
            Self::PermissionDenied(_) => "permission-denied",
            Self::InvalidConfiguration(_) => "invalid-configuration",
            Self::Failed(_) => "failed",
        }
    }
}

/// Errors constructing a recorder on an acquired device
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecorderConstructionError {
    #[error("Recording as {0} is not supported by this device")]
    UnsupportedMimeType(VideoMimeType),

    #[error("Invalid recorder configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Recorder is already running")]
    AlreadyRecording,

    #[error("Failed to launch recorder: {0}")]
    LaunchFailed(String),
}

/// An open handle to a live audio/video source
pub trait CaptureDevice: Send {
    /// Human-readable source description
    fn label(&self) -> &str;

    /// Construct a recorder and begin emitting chunks to `events`.
    ///
    /// The device must send `RecordingStopped` after its last chunk once
    /// `stop_recording` was called.
    fn start_recording(
        &mut self,
        options: &RecorderOptions,
        events: DeviceEventSender,
    ) -> Result<(), RecorderConstructionError>;

    /// Ask the active recorder to finish and flush
    fn stop_recording(&mut self) -> Result<(), DeviceError>;

    /// Release the underlying source. Idempotent.
    fn release(&mut self);
}

/// Port for acquiring capture devices
#[async_trait]
pub trait CaptureDeviceProvider: Send + Sync {
    /// Open a device honoring the given constraints
    async fn acquire(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Box<dyn CaptureDevice>, DeviceError>;
}

/// Sink the live stream is bound to once a device is acquired
pub trait PreviewSink: Send + Sync {
    fn bind(&self, device_label: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_error_kinds() {
        assert_eq!(DeviceError::NotFound(String::new()).kind(), "not-found");
        assert_eq!(DeviceError::InUse(String::new()).kind(), "in-use");
        assert_eq!(
            DeviceError::PermissionDenied(String::new()).kind(),
            "permission-denied"
        );
    }

    #[test]
    fn construction_error_mentions_mime() {
        let err = RecorderConstructionError::UnsupportedMimeType(VideoMimeType::Mp4);
        assert!(err.to_string().contains("video/mp4"));
    }
}
