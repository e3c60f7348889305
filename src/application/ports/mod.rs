//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod config;
pub mod events;
pub mod frames;
pub mod notifier;
pub mod store;
pub mod uploader;

// Re-export common types
pub use capture::{
    CaptureDevice, CaptureDeviceProvider, DeviceError, PreviewSink, RecorderConstructionError,
};
pub use config::ConfigStore;
pub use events::{DeviceEvent, DeviceEventSender, SessionEvent};
pub use frames::{FrameError, FrameSource};
pub use notifier::{NotificationError, NotificationIcon, Notifier};
pub use store::{Locator, RecordingStore, StoreError};
pub use uploader::{UploadClient, UploadError, UploadResult};
