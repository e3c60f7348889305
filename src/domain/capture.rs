//! Capture configuration value objects

use serde::{Deserialize, Serialize};

use super::recording::VideoMimeType;

/// Default requested video width in pixels
pub const DEFAULT_VIDEO_WIDTH: u32 = 480;

/// Requested video track settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoConstraints {
    pub width: u32,
}

/// Device acquisition request: `{video: {width}, audio}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConstraints {
    pub video: VideoConstraints,
    pub audio: bool,
}

impl CaptureConstraints {
    pub const fn new(width: u32, audio: bool) -> Self {
        Self {
            video: VideoConstraints { width },
            audio,
        }
    }
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self::new(DEFAULT_VIDEO_WIDTH, false)
    }
}

/// Settings used to construct a device recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecorderOptions {
    pub mime_type: VideoMimeType,
    pub video_width: u32,
}

impl Default for RecorderOptions {
    fn default() -> Self {
        Self {
            mime_type: VideoMimeType::Webm,
            video_width: DEFAULT_VIDEO_WIDTH,
        }
    }
}
