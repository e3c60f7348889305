//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::capture::{CaptureConstraints, RecorderOptions, DEFAULT_VIDEO_WIDTH};
use crate::domain::recording::{Countdown, VideoMimeType, DEFAULT_COUNTDOWN_SECS};

/// Instructions sent alongside an uploaded clip
pub const DEFAULT_INSTRUCTIONS: &str = "smile, blink_eyes";

/// Capture source used when none is configured
pub const DEFAULT_DEVICE: &str = "/dev/video0";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub upload_url: Option<String>,
    pub instructions: Option<String>,
    pub mime_type: Option<String>,
    pub assemble_as: Option<String>,
    pub video_width: Option<u32>,
    pub audio: Option<bool>,
    pub countdown: Option<u32>,
    pub device: Option<String>,
    pub output_dir: Option<String>,
    pub upload: Option<bool>,
    pub snapshot: Option<bool>,
    pub notify: Option<bool>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            upload_url: None,
            instructions: Some(DEFAULT_INSTRUCTIONS.to_string()),
            mime_type: Some("webm".to_string()),
            assemble_as: None,
            video_width: Some(DEFAULT_VIDEO_WIDTH),
            audio: Some(false),
            countdown: Some(DEFAULT_COUNTDOWN_SECS),
            device: Some(DEFAULT_DEVICE.to_string()),
            output_dir: None,
            upload: Some(false),
            snapshot: Some(false),
            notify: Some(false),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            upload_url: other.upload_url.or(self.upload_url),
            instructions: other.instructions.or(self.instructions),
            mime_type: other.mime_type.or(self.mime_type),
            assemble_as: other.assemble_as.or(self.assemble_as),
            video_width: other.video_width.or(self.video_width),
            audio: other.audio.or(self.audio),
            countdown: other.countdown.or(self.countdown),
            device: other.device.or(self.device),
            output_dir: other.output_dir.or(self.output_dir),
            upload: other.upload.or(self.upload),
            snapshot: other.snapshot.or(self.snapshot),
            notify: other.notify.or(self.notify),
        }
    }

    /// Capture MIME type, or webm if not set/invalid
    pub fn mime_type_or_default(&self) -> VideoMimeType {
        self.mime_type
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// MIME tag used when assembling chunks; follows the capture type unless set
    pub fn assemble_as_or_default(&self) -> VideoMimeType {
        self.assemble_as
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| self.mime_type_or_default())
    }

    pub fn video_width_or_default(&self) -> u32 {
        self.video_width.unwrap_or(DEFAULT_VIDEO_WIDTH)
    }

    pub fn audio_or_default(&self) -> bool {
        self.audio.unwrap_or(false)
    }

    pub fn countdown_or_default(&self) -> Countdown {
        self.countdown
            .map(Countdown::from_secs)
            .unwrap_or_default()
    }

    pub fn instructions_or_default(&self) -> &str {
        self.instructions.as_deref().unwrap_or(DEFAULT_INSTRUCTIONS)
    }

    pub fn device_or_default(&self) -> &str {
        self.device.as_deref().unwrap_or(DEFAULT_DEVICE)
    }

    /// Output directory, or the user's video directory, or the current directory
    pub fn output_dir_or_default(&self) -> PathBuf {
        self.output_dir
            .as_ref()
            .map(PathBuf::from)
            .or_else(|| dirs::video_dir().map(|d| d.join("camclip")))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn upload_or_default(&self) -> bool {
        self.upload.unwrap_or(false)
    }

    pub fn snapshot_or_default(&self) -> bool {
        self.snapshot.unwrap_or(false)
    }

    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(false)
    }

    /// Device acquisition request derived from this config
    pub fn capture_constraints(&self) -> CaptureConstraints {
        CaptureConstraints::new(self.video_width_or_default(), self.audio_or_default())
    }

    /// Recorder construction options derived from this config
    pub fn recorder_options(&self) -> RecorderOptions {
        RecorderOptions {
            mime_type: self.mime_type_or_default(),
            video_width: self.video_width_or_default(),
        }
    }
}
