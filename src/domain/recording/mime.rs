//! Video MIME type value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::MimeTypeParseError;

/// Supported video container types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoMimeType {
    #[default]
    Webm,
    Mp4,
}

impl VideoMimeType {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Webm => "video/webm",
            Self::Mp4 => "video/mp4",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Webm => "webm",
            Self::Mp4 => "mp4",
        }
    }
}

impl fmt::Display for VideoMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VideoMimeType {
    type Err = MimeTypeParseError;

    /// Accepts the short name ("webm") or the full MIME string ("video/webm")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "webm" | "video/webm" => Ok(Self::Webm),
            "mp4" | "video/mp4" => Ok(Self::Mp4),
            _ => Err(MimeTypeParseError {
                input: s.to_string(),
            }),
        }
    }
}
