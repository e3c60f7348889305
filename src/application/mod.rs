//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod capture;
pub mod ports;
pub mod session;
pub mod snapshot;

// Re-export use cases
pub use capture::{
    CaptureCallbacks, CaptureClipUseCase, CaptureError, CaptureInput, CaptureOutput,
};
pub use session::{SessionConfig, SessionController, SessionError, SessionUpdate};
pub use snapshot::{capture_frame, Snapshot};
