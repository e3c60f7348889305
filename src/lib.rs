//! Camclip - countdown webcam clip recorder
//!
//! This crate records a fixed-length clip from a camera after a countdown,
//! stores it as a local artifact, and can render a still snapshot or upload
//! the clip to a processing endpoint.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Session state machine, recording value objects, and errors
//! - **Application**: Session controller, use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (FFmpeg, HTTP upload, files, etc.)
//! - **CLI**: Command-line interface, argument parsing, and output

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
