//! Frame snapshot of a finished recording

use crate::domain::recording::Recording;
use crate::domain::snapshot::{EncodeError, Raster, VideoFrame};

use super::ports::FrameSource;

/// A rendered still of a recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    raster: Raster,
    placeholder: bool,
}

impl Snapshot {
    /// Render a decoded frame, or the blank placeholder when there is none
    pub fn render(frame: Option<&VideoFrame>) -> Self {
        match frame {
            Some(frame) if frame.is_valid() => Self {
                raster: Raster::render(frame),
                placeholder: false,
            },
            _ => Self::placeholder(),
        }
    }

    pub fn placeholder() -> Self {
        Self {
            raster: Raster::blank(),
            placeholder: true,
        }
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// True when no frame was available
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn to_png(&self) -> Result<Vec<u8>, EncodeError> {
        self.raster.to_png()
    }

    /// Encoded image locator
    pub fn data_url(&self) -> Result<String, EncodeError> {
        self.raster.to_data_url()
    }
}

/// Render the current frame of `recording`.
///
/// Absent or zero-length recordings, and frames that fail to decode, yield
/// the placeholder. This never fails.
pub async fn capture_frame<F>(recording: Option<&Recording>, frames: &F) -> Snapshot
where
    F: FrameSource + ?Sized,
{
    let Some(recording) = recording.filter(|r| !r.is_blank()) else {
        return Snapshot::placeholder();
    };

    match frames.decode_frame(recording).await {
        Ok(frame) => Snapshot::render(Some(&frame)),
        Err(e) => {
            tracing::warn!(error = %e, "frame decode failed, using placeholder");
            Snapshot::placeholder()
        }
    }
}
