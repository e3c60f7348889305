//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::domain::recording::{Countdown, VideoMimeType};

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

/// Validate `value` for `key` and store it in `config`
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "upload_url" => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Value must be an http:// or https:// URL".to_string(),
                });
            }
            config.upload_url = Some(value.to_string());
        }
        "instructions" => config.instructions = Some(value.to_string()),
        "mime_type" => config.mime_type = Some(parse_mime(key, value)?),
        "assemble_as" => config.assemble_as = Some(parse_mime(key, value)?),
        "video_width" => {
            let width = value
                .parse::<u32>()
                .ok()
                .filter(|w| *w > 0)
                .ok_or_else(|| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Value must be a positive number of pixels".to_string(),
                })?;
            config.video_width = Some(width);
        }
        "countdown" => config.countdown = Some(value.parse::<Countdown>()?.as_secs()),
        "device" => config.device = Some(value.to_string()),
        "output_dir" => config.output_dir = Some(value.to_string()),
        "audio" => config.audio = Some(parse_bool_for(key, value)?),
        "upload" => config.upload = Some(parse_bool_for(key, value)?),
        "snapshot" => config.snapshot = Some(parse_bool_for(key, value)?),
        "notify" => config.notify = Some(parse_bool_for(key, value)?),
        _ => unreachable!(), // Already validated
    }
    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    match config_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(
            key,
            config_value(&config, key).as_deref().unwrap_or(NOT_SET),
        );
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

/// Display form of a stored value
fn config_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "upload_url" => config.upload_url.clone(),
        "instructions" => config.instructions.clone(),
        "mime_type" => config.mime_type.clone(),
        "assemble_as" => config.assemble_as.clone(),
        "video_width" => config.video_width.map(|w| w.to_string()),
        "audio" => config.audio.map(|b| b.to_string()),
        "countdown" => config.countdown.map(|c| c.to_string()),
        "device" => config.device.clone(),
        "output_dir" => config.output_dir.clone(),
        "upload" => config.upload.map(|b| b.to_string()),
        "snapshot" => config.snapshot.map(|b| b.to_string()),
        "notify" => config.notify.map(|b| b.to_string()),
        _ => None,
    }
}

fn parse_mime(key: &str, value: &str) -> Result<String, ConfigError> {
    value
        .parse::<VideoMimeType>()
        .map(|m| m.extension().to_string())
        .map_err(|e| ConfigError::ValidationError {
            key: key.to_string(),
            message: e.to_string(),
        })
}

fn parse_bool_for(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).map_err(|_| ConfigError::ValidationError {
        key: key.to_string(),
        message: "Value must be 'true' or 'false'".to_string(),
    })
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}
