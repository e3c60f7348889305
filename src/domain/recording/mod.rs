//! Recording domain module

mod chunk;
mod countdown;
mod mime;

pub use chunk::{Chunk, Recording};
pub use countdown::{Countdown, DEFAULT_COUNTDOWN_SECS, TICK_INTERVAL};
pub use mime::VideoMimeType;
