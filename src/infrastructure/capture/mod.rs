//! Capture device adapters

mod ffmpeg;

pub use ffmpeg::{
    classify_ffmpeg_error, CaptureSource, FfmpegCaptureDevice, FfmpegCaptureProvider,
    TEST_PATTERN_SOURCE,
};
