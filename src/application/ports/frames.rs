//! Frame decoding port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::Recording;
use crate::domain::snapshot::VideoFrame;

/// Frame decoding errors
#[derive(Debug, Clone, Error)]
pub enum FrameError {
    #[error("Decoder not available: {0}")]
    DecoderUnavailable(String),

    #[error("Failed to decode frame: {0}")]
    DecodeFailed(String),
}

/// Port for decoding a still frame out of a recording
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn decode_frame(&self, recording: &Recording) -> Result<VideoFrame, FrameError>;
}
