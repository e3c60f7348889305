//! Domain error types

use thiserror::Error;

/// Error when parsing a video MIME type
#[derive(Debug, Clone, Error)]
#[error("Invalid video type: \"{input}\". Valid types are: webm, mp4")]
pub struct MimeTypeParseError {
    pub input: String,
}

/// Errors reading, writing or validating camclip settings
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Cannot read config {0}")]
    ReadError(String),

    #[error("Config {0} is not valid TOML (run `camclip config path` to locate it)")]
    ParseError(String),

    #[error("Cannot write config {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at {0}, use `camclip config set` to change it")]
    AlreadyExists(String),
}
