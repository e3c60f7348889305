//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like FFmpeg, HTTP endpoints and
//! the desktop notification daemon.

pub mod capture;
pub mod config;
pub mod frames;
pub mod notification;
pub mod store;
pub mod upload;

// Re-export adapters
pub use capture::{FfmpegCaptureDevice, FfmpegCaptureProvider};
pub use config::XdgConfigStore;
pub use frames::FfmpegFrameExtractor;
pub use notification::{create_notifier, NotifyRustNotifier};
pub use store::FileRecordingStore;
pub use upload::HttpUploadClient;
