//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::recording::VideoMimeType;

/// Camclip - record a short webcam clip after a countdown
#[derive(Parser, Debug)]
#[command(name = "camclip")]
#[command(version)]
#[command(about = "Record a fixed-length webcam clip and optionally upload it")]
#[command(long_about = None)]
pub struct Cli {
    /// Recording length in seconds (e.g., 5 or 5s)
    #[arg(short = 'c', long, value_name = "SECS")]
    pub countdown: Option<String>,

    /// Container to record
    #[arg(short = 'm', long = "mime", value_name = "TYPE")]
    pub mime: Option<MimeArg>,

    /// MIME tag used when assembling the clip (defaults to --mime)
    #[arg(long, value_name = "TYPE")]
    pub assemble_as: Option<MimeArg>,

    /// Requested video width in pixels
    #[arg(short = 'w', long, value_name = "PX")]
    pub width: Option<u32>,

    /// Also capture audio
    #[arg(short = 'a', long)]
    pub audio: bool,

    /// Capture device path, or "testsrc" for a synthetic pattern
    #[arg(short = 'd', long, value_name = "DEV")]
    pub device: Option<String>,

    /// Directory the clip is written to
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output: Option<String>,

    /// Upload the clip after recording
    #[arg(short = 'u', long)]
    pub upload: bool,

    /// Upload endpoint URL
    #[arg(short = 'e', long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Instructions sent with the upload
    #[arg(short = 'i', long, value_name = "TEXT")]
    pub instructions: Option<String>,

    /// Write a PNG still of the clip next to it
    #[arg(short = 's', long)]
    pub snapshot: bool,

    /// Show desktop notifications
    #[arg(short = 'n', long)]
    pub notify: bool,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Container argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum MimeArg {
    Webm,
    Mp4,
}

impl From<MimeArg> for VideoMimeType {
    fn from(arg: MimeArg) -> Self {
        match arg {
            MimeArg::Webm => VideoMimeType::Webm,
            MimeArg::Mp4 => VideoMimeType::Mp4,
        }
    }
}

impl MimeArg {
    /// Config-file spelling of this container
    pub fn as_config_value(self) -> &'static str {
        VideoMimeType::from(self).extension()
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "upload_url",
    "instructions",
    "mime_type",
    "assemble_as",
    "video_width",
    "audio",
    "countdown",
    "device",
    "output_dir",
    "upload",
    "snapshot",
    "notify",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
