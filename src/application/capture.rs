//! Capture clip use case

use thiserror::Error;

use crate::domain::recording::Recording;

use super::ports::{
    CaptureDeviceProvider, FrameSource, Locator, NotificationIcon, Notifier, RecordingStore,
    StoreError, UploadClient, UploadError, UploadResult,
};
use super::session::{SessionController, SessionError, SessionUpdate};
use super::snapshot::{capture_frame, Snapshot};

/// Errors from the capture use case
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Input parameters for one capture
#[derive(Debug, Clone)]
pub struct CaptureInput {
    /// Whether to upload the finished clip
    pub upload: bool,
    /// Instructions sent with the upload
    pub instructions: String,
    /// Whether to render a frame snapshot
    pub snapshot: bool,
    /// Whether to show notifications
    pub enable_notify: bool,
}

impl Default for CaptureInput {
    fn default() -> Self {
        Self {
            upload: false,
            instructions: crate::domain::config::DEFAULT_INSTRUCTIONS.to_string(),
            snapshot: false,
            enable_notify: false,
        }
    }
}

/// Output of one capture
#[derive(Debug, Clone)]
pub struct CaptureOutput {
    pub recording: Recording,
    /// Where the clip can be played or downloaded
    pub locator: Locator,
    pub snapshot: Option<Snapshot>,
    /// Upload outcome, when an upload was requested. Failures do not affect the clip.
    pub upload: Option<Result<UploadResult, UploadError>>,
}

/// Callbacks for progress and status updates
#[derive(Default)]
#[allow(clippy::type_complexity)]
pub struct CaptureCallbacks {
    /// Called once the device is ready
    pub on_device_ready: Option<Box<dyn Fn() + Send + Sync>>,
    /// Called with the remaining countdown seconds
    pub on_tick: Option<Box<dyn Fn(u32) + Send + Sync>>,
    /// Called when the countdown elapsed and the device is flushing
    pub on_stopping: Option<Box<dyn Fn() + Send + Sync>>,
    /// Called with the assembled recording
    pub on_recording_end: Option<Box<dyn Fn(&Recording) + Send + Sync>>,
    /// Called before the upload request is sent
    pub on_uploading_start: Option<Box<dyn Fn() + Send + Sync>>,
}

/// Record one countdown clip, publish it, and optionally snapshot and upload it
pub struct CaptureClipUseCase<P, S, U, F, N>
where
    P: CaptureDeviceProvider,
    S: RecordingStore,
    U: UploadClient,
    F: FrameSource,
    N: Notifier,
{
    controller: SessionController<P>,
    store: S,
    uploader: U,
    frames: F,
    notifier: N,
}

impl<P, S, U, F, N> CaptureClipUseCase<P, S, U, F, N>
where
    P: CaptureDeviceProvider,
    S: RecordingStore,
    U: UploadClient,
    F: FrameSource,
    N: Notifier,
{
    /// Create a new use case instance
    pub fn new(
        controller: SessionController<P>,
        store: S,
        uploader: U,
        frames: F,
        notifier: N,
    ) -> Self {
        Self {
            controller,
            store,
            uploader,
            frames,
            notifier,
        }
    }

    pub fn controller(&self) -> &SessionController<P> {
        &self.controller
    }

    /// Surface a device or recorder failure as a blocking notification
    async fn report_failure(&self, input: &CaptureInput, error: &SessionError) {
        if !input.enable_notify {
            return;
        }
        if let Err(e) = self
            .notifier
            .notify("Camclip", &error.to_string(), NotificationIcon::Error)
            .await
        {
            tracing::warn!(error = %e, "failed to show notification");
        }
    }

    async fn run_session(
        &mut self,
        input: &CaptureInput,
        callbacks: &CaptureCallbacks,
    ) -> Result<Recording, SessionError> {
        self.controller.acquire_device().await?;

        if let Some(ref cb) = callbacks.on_device_ready {
            cb();
        }

        self.controller.start()?;

        if input.enable_notify {
            let _ = self
                .notifier
                .notify(
                    "Camclip",
                    &format!("Recording for {}...", self.controller.config().countdown),
                    NotificationIcon::Recording,
                )
                .await;
        }

        self.controller
            .run_until_complete(|update| match update {
                SessionUpdate::Tick(remaining) => {
                    if let Some(ref cb) = callbacks.on_tick {
                        cb(*remaining);
                    }
                }
                SessionUpdate::Stopping => {
                    if let Some(ref cb) = callbacks.on_stopping {
                        cb();
                    }
                }
                SessionUpdate::ChunkStored { size, total } => {
                    tracing::trace!(size, total, "chunk stored");
                }
                SessionUpdate::Finished(_) => {}
            })
            .await
    }

    /// Execute the capture workflow
    pub async fn execute(
        &mut self,
        input: CaptureInput,
        callbacks: CaptureCallbacks,
    ) -> Result<CaptureOutput, CaptureError> {
        let recording = match self.run_session(&input, &callbacks).await {
            Ok(recording) => recording,
            Err(e) => {
                // Release the device so the next capture can acquire it
                self.controller.abort();
                self.report_failure(&input, &e).await;
                return Err(e.into());
            }
        };

        if let Some(ref cb) = callbacks.on_recording_end {
            cb(&recording);
        }

        let locator = match self.store.publish(&recording).await {
            Ok(locator) => locator,
            Err(e) => {
                self.controller.abort();
                return Err(e.into());
            }
        };
        tracing::info!(locator = %locator, "recording published");

        let snapshot = if input.snapshot {
            Some(capture_frame(self.controller.recording(), &self.frames).await)
        } else {
            None
        };

        let upload = if input.upload {
            if let Some(ref cb) = callbacks.on_uploading_start {
                cb();
            }
            if input.enable_notify {
                let _ = self
                    .notifier
                    .notify("Camclip", "Uploading...", NotificationIcon::Uploading)
                    .await;
            }

            let result = self.uploader.upload(&recording, &input.instructions).await;
            match &result {
                Ok(response) => tracing::info!(
                    correlation_id = %response.correlation_id,
                    status = response.status,
                    "upload complete"
                ),
                Err(e) => tracing::warn!(error = %e, "upload failed"),
            }
            Some(result)
        } else {
            None
        };

        // Ready for another capture; the published clip stays until revoked
        self.controller.reset()?;

        if input.enable_notify {
            let _ = self
                .notifier
                .notify("Camclip", "Clip saved!", NotificationIcon::Success)
                .await;
        }

        Ok(CaptureOutput {
            recording,
            locator,
            snapshot,
            upload,
        })
    }
}
