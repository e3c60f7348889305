//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod capture;
pub mod config;
pub mod error;
pub mod recording;
pub mod session;
pub mod snapshot;

// Re-export common types
pub use capture::{CaptureConstraints, RecorderOptions};
pub use config::AppConfig;
pub use error::*;
pub use recording::{Chunk, Countdown, Recording, VideoMimeType};
pub use session::{InvalidStateTransition, RecordingSession, SessionState};
pub use snapshot::{Raster, VideoFrame};
