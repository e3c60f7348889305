//! Frame decoding adapters

mod ffmpeg;

pub use ffmpeg::FfmpegFrameExtractor;
