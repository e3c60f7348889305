//! TOML settings file under the XDG config home
//!
//! Resolves to `$XDG_CONFIG_HOME/camclip/config.toml` (usually
//! `~/.config/camclip/config.toml`).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Directory name under the XDG config home
const APP_DIR: &str = "camclip";

const CONFIG_FILE: &str = "config.toml";

/// camclip settings stored as flat TOML keys
pub struct XdgConfigStore {
    path: PathBuf,
}

impl XdgConfigStore {
    pub fn new() -> Self {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_default();

        Self {
            path: base.join(APP_DIR).join(CONFIG_FILE),
        }
    }

    /// Use an explicit settings file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse_toml(path: &Path, content: &str) -> Result<AppConfig, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
    }

    fn write_error(&self, e: impl std::fmt::Display) -> ConfigError {
        ConfigError::WriteError(format!("{}: {}", self.path.display(), e))
    }
}

impl Default for XdgConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for XdgConfigStore {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(AppConfig::empty()),
            Err(e) => {
                return Err(ConfigError::ReadError(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let config = Self::parse_toml(&self.path, &content)?;
        tracing::debug!(path = %self.path.display(), "loaded config");
        Ok(config)
    }

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.write_error(e))?;
        }

        let content = toml::to_string_pretty(config).map_err(|e| self.write_error(e))?;
        fs::write(&self.path, content)
            .await
            .map_err(|e| self.write_error(e))
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    async fn init(&self) -> Result<(), ConfigError> {
        if self.exists() {
            return Err(ConfigError::AlreadyExists(
                self.path.display().to_string(),
            ));
        }
        self.save(&AppConfig::defaults()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_is_under_camclip_dir() {
        let path = XdgConfigStore::new().path();
        assert!(path.ends_with("camclip/config.toml"));
    }

    #[test]
    fn custom_path() {
        let store = XdgConfigStore::with_path("/custom/path/config.toml");
        assert_eq!(store.path(), PathBuf::from("/custom/path/config.toml"));
    }

    #[test]
    fn parse_toml_flat_format() {
        let content = r#"
upload_url = "http://localhost:5000/process_video/"
mime_type = "mp4"
countdown = 3
audio = true
"#;

        let config = XdgConfigStore::parse_toml(Path::new("config.toml"), content).unwrap();
        assert_eq!(
            config.upload_url,
            Some("http://localhost:5000/process_video/".to_string())
        );
        assert_eq!(config.mime_type, Some("mp4".to_string()));
        assert_eq!(config.countdown, Some(3));
        assert_eq!(config.audio, Some(true));
        assert!(config.device.is_none());
    }

    #[test]
    fn parse_error_names_the_file() {
        let path = Path::new("/etc/camclip.toml");
        let err = XdgConfigStore::parse_toml(path, "countdown = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
        let msg = err.to_string();
        assert!(msg.contains("/etc/camclip.toml"));
        assert!(msg.contains("camclip config path"));
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        let config = store.load().await.unwrap();
        assert!(config.upload_url.is_none());
        assert!(config.countdown.is_none());
    }

    #[tokio::test]
    async fn unreadable_path_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be read as a file
        let store = XdgConfigStore::with_path(dir.path());
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }

    #[tokio::test]
    async fn init_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("camclip/config.toml"));

        store.init().await.unwrap();
        let config = store.load().await.unwrap();
        assert_eq!(config.countdown, Some(5));
        assert_eq!(config.instructions, Some("smile, blink_eyes".to_string()));

        let err = store.init().await.unwrap_err();
        assert!(matches!(err, ConfigError::AlreadyExists(_)));
        assert!(err.to_string().contains("camclip config set"));
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        let config = AppConfig {
            device: Some("testsrc".to_string()),
            video_width: Some(640),
            ..Default::default()
        };

        store.save(&config).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded.device, Some("testsrc".to_string()));
        assert_eq!(loaded.video_width, Some(640));
    }
}
