//! Main app runner for capture mode

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::application::ports::{ConfigStore, Locator, UploadError};
use crate::application::{
    CaptureCallbacks, CaptureClipUseCase, CaptureError, CaptureInput, CaptureOutput,
    SessionConfig, SessionController, SessionError,
};
use crate::domain::config::AppConfig;
use crate::domain::recording::Recording;
use crate::infrastructure::{
    FfmpegCaptureProvider, FfmpegFrameExtractor, FileRecordingStore, HttpUploadClient,
    NotifyRustNotifier, XdgConfigStore,
};

use super::presenter::{Presenter, TerminalPreview};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment variable overriding the upload endpoint
pub const UPLOAD_URL_ENV: &str = "CAMCLIP_UPLOAD_URL";

/// Record one clip with the merged configuration
pub async fn run_capture(config: AppConfig) -> ExitCode {
    let presenter = Presenter::new();
    let upload = config.upload_or_default();

    let uploader = match (upload, config.upload_url.as_deref()) {
        (true, Some(url)) => HttpUploadClient::new(url),
        (true, None) => {
            presenter.error(&UploadError::MissingEndpoint.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
        (false, _) => HttpUploadClient::unconfigured(),
    };

    let session_config = SessionConfig::from_app_config(&config);
    let total = session_config.countdown.as_secs();

    let controller = SessionController::new(
        FfmpegCaptureProvider::new(config.device_or_default()),
        session_config,
    )
    .with_preview(Arc::new(TerminalPreview::new(presenter.clone())));

    let mut use_case = CaptureClipUseCase::new(
        controller,
        FileRecordingStore::new(config.output_dir_or_default()),
        uploader,
        FfmpegFrameExtractor::new(),
        NotifyRustNotifier::new(),
    );

    let input = CaptureInput {
        upload,
        instructions: config.instructions_or_default().to_string(),
        snapshot: config.snapshot_or_default(),
        enable_notify: config.notify_or_default(),
    };

    let callbacks = build_callbacks(&presenter, total);

    match use_case.execute(input, callbacks).await {
        Ok(output) => report_output(&presenter, &output).await,
        Err(e) => {
            presenter.spinner_fail("Recording failed");
            presenter.error(&e.to_string());
            match e {
                CaptureError::Session(SessionError::Construction(_)) => {
                    ExitCode::from(EXIT_USAGE_ERROR)
                }
                _ => ExitCode::from(EXIT_ERROR),
            }
        }
    }
}

fn build_callbacks(presenter: &Presenter, total: u32) -> CaptureCallbacks {
    let on_ready = presenter.clone();
    let on_tick = presenter.clone();
    let on_stopping = presenter.clone();
    let on_end = presenter.clone();
    let on_upload = presenter.clone();

    CaptureCallbacks {
        on_device_ready: Some(Box::new(move || {
            on_ready.start_spinner("Starting recorder...");
        })),
        on_tick: Some(Box::new(move |remaining: u32| {
            on_tick.update_countdown(remaining, total);
        })),
        on_stopping: Some(Box::new(move || {
            on_stopping.update_spinner("Finishing clip...");
        })),
        on_recording_end: Some(Box::new(move |recording: &Recording| {
            on_end.spinner_success(&format!("Recorded {}", recording));
        })),
        on_uploading_start: Some(Box::new(move || {
            on_upload.start_spinner("Uploading...");
        })),
    }
}

/// Print the artifact locations; upload failures yield a non-zero exit
async fn report_output(presenter: &Presenter, output: &CaptureOutput) -> ExitCode {
    let mut code = EXIT_SUCCESS;

    presenter.output(output.locator.as_str());

    if let Some(snapshot) = &output.snapshot {
        if snapshot.is_placeholder() {
            presenter.warn("No frame could be decoded, snapshot is blank");
        }
        match write_snapshot(&output.locator, snapshot).await {
            Ok(path) => presenter.info(&format!("Snapshot: {}", path.display())),
            Err(e) => {
                presenter.error(&format!("Failed to write snapshot: {}", e));
                code = EXIT_ERROR;
            }
        }
    }

    match &output.upload {
        Some(Ok(response)) => {
            presenter.spinner_success(&format!(
                "Uploaded (HTTP {}, request {})",
                response.status, response.correlation_id
            ));
            presenter.output(&response.body.to_string());
        }
        Some(Err(e)) => {
            presenter.spinner_fail("Upload failed");
            presenter.error(&e.to_string());
            code = EXIT_ERROR;
        }
        None => {}
    }

    ExitCode::from(code)
}

/// Write the snapshot PNG next to the clip
async fn write_snapshot(
    locator: &Locator,
    snapshot: &crate::application::Snapshot,
) -> Result<PathBuf, String> {
    let path = locator
        .file_path()
        .map(|p| p.with_extension("png"))
        .unwrap_or_else(|| Path::new("snapshot.png").to_path_buf());
    let png = snapshot.to_png().map_err(|e| e.to_string())?;
    tokio::fs::write(&path, png)
        .await
        .map_err(|e| e.to_string())?;
    Ok(path)
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(
                error = %e,
                path = %store.path().display(),
                "ignoring unreadable config"
            );
            AppConfig::empty()
        }
    };

    // Build env config
    let env_config = AppConfig {
        upload_url: env::var(UPLOAD_URL_ENV).ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}
