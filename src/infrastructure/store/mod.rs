//! Recording store adapters

mod file;

pub use file::FileRecordingStore;
