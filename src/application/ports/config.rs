//! Port for the persisted camclip settings file

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Where `camclip config` reads and writes settings.
///
/// A missing file is not an error: `load` yields an empty [`AppConfig`] and
/// the built-in defaults apply when the layers are merged.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Replace the stored settings, creating parent directories as needed
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    /// Location printed by `camclip config path`
    fn path(&self) -> PathBuf;

    fn exists(&self) -> bool;

    /// Write the defaults for `camclip config init`, refusing to overwrite
    async fn init(&self) -> Result<(), ConfigError>;
}
