//! Recording session controller
//!
//! Drives a [`RecordingSession`] from device acquisition to an assembled
//! [`Recording`]. Device events and countdown ticks share one channel per
//! session and are applied in delivery order by [`SessionController::next_update`].

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant};

use crate::domain::capture::{CaptureConstraints, RecorderOptions};
use crate::domain::config::AppConfig;
use crate::domain::recording::{Countdown, Recording, VideoMimeType, TICK_INTERVAL};
use crate::domain::session::{InvalidStateTransition, RecordingSession, SessionState};

use super::ports::{
    CaptureDevice, CaptureDeviceProvider, DeviceError, DeviceEvent, DeviceEventSender,
    PreviewSink, RecorderConstructionError, SessionEvent,
};

/// Errors from the session controller
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Recorder error: {0}")]
    Construction(#[from] RecorderConstructionError),

    #[error("{0}")]
    InvalidState(#[from] InvalidStateTransition),

    #[error("Device stopped delivering events before the recording completed")]
    EventsClosed,
}

/// Settings for a recording session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub constraints: CaptureConstraints,
    pub recorder: RecorderOptions,
    /// MIME tag applied when assembling chunks
    pub assemble_as: VideoMimeType,
    pub countdown: Countdown,
}

impl SessionConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            constraints: config.capture_constraints(),
            recorder: config.recorder_options(),
            assemble_as: config.assemble_as_or_default(),
            countdown: config.countdown_or_default(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::defaults())
    }
}

/// Observable progress of a session
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    /// Remaining countdown seconds
    Tick(u32),
    /// A chunk was stored; `total` chunks are held so far
    ChunkStored { size: usize, total: usize },
    /// Countdown elapsed and the device was asked to stop
    Stopping,
    /// The device flushed and the recording was assembled
    Finished(Recording),
}

/// Owned countdown timer. Dropping the handle cancels the timer.
struct CountdownHandle {
    task: JoinHandle<()>,
}

impl CountdownHandle {
    /// Emit `Tick(n..=0)` at 1s intervals starting now, then `CountdownElapsed`
    fn spawn(countdown: Countdown, tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        let task = tokio::spawn(async move {
            let mut ticker = interval(TICK_INTERVAL);
            let mut elapsed = 0u64;
            loop {
                ticker.tick().await;
                if !countdown.is_running_at(elapsed) {
                    let _ = tx.send(SessionEvent::CountdownElapsed);
                    break;
                }
                if tx
                    .send(SessionEvent::Tick(countdown.remaining_at(elapsed)))
                    .is_err()
                {
                    break;
                }
                elapsed += 1;
            }
        });
        Self { task }
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Closed receiver used while no session is recording
fn idle_channel() -> mpsc::UnboundedReceiver<SessionEvent> {
    let (_tx, rx) = mpsc::unbounded_channel();
    rx
}

/// Owns the capture device, the countdown and the session state
pub struct SessionController<P>
where
    P: CaptureDeviceProvider,
{
    provider: P,
    preview: Option<Arc<dyn PreviewSink>>,
    config: SessionConfig,
    session: RecordingSession,
    device: Option<Box<dyn CaptureDevice>>,
    countdown: Option<CountdownHandle>,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    started_at: Option<Instant>,
    stopped_at: Option<Instant>,
}

impl<P> SessionController<P>
where
    P: CaptureDeviceProvider,
{
    /// Create a controller in idle state
    pub fn new(provider: P, config: SessionConfig) -> Self {
        Self {
            provider,
            preview: None,
            config,
            session: RecordingSession::new(),
            device: None,
            countdown: None,
            events: idle_channel(),
            started_at: None,
            stopped_at: None,
        }
    }

    /// Bind acquired devices to a preview sink
    pub fn with_preview(mut self, preview: Arc<dyn PreviewSink>) -> Self {
        self.preview = Some(preview);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.session.seconds_remaining()
    }

    /// The assembled recording of the finished session
    pub fn recording(&self) -> Option<&Recording> {
        self.session.recording()
    }

    /// Number of chunks held by the current session
    pub fn chunk_count(&self) -> usize {
        self.session.chunks().len()
    }

    /// Whether a countdown timer is currently owned
    pub fn has_countdown(&self) -> bool {
        self.countdown.is_some()
    }

    fn precondition(&self, expected: SessionState, action: &str) -> Result<(), SessionError> {
        if self.session.state() != expected {
            return Err(InvalidStateTransition {
                current_state: self.session.state(),
                action: action.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Acquire a capture device: IDLE -> DEVICE_READY.
    ///
    /// On failure the session stays idle.
    pub async fn acquire_device(&mut self) -> Result<(), SessionError> {
        self.precondition(SessionState::Idle, "acquire a device")?;

        let device = match self.provider.acquire(&self.config.constraints).await {
            Ok(device) => device,
            Err(e) => {
                tracing::error!(kind = e.kind(), error = %e, "device acquisition failed");
                return Err(e.into());
            }
        };

        self.session.device_acquired()?;
        if let Some(preview) = &self.preview {
            preview.bind(device.label());
        }
        tracing::debug!(device = device.label(), "device ready");
        self.device = Some(device);
        Ok(())
    }

    /// Start recording: DEVICE_READY -> RECORDING.
    ///
    /// Clears previous chunks and starts the countdown. A recorder that
    /// cannot be constructed aborts the attempt and leaves the device ready.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.precondition(SessionState::DeviceReady, "start recording")?;
        let Some(device) = self.device.as_mut() else {
            return Err(InvalidStateTransition {
                current_state: self.session.state(),
                action: "start recording without a device".to_string(),
            }
            .into());
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let events = DeviceEventSender::new(tx.clone());
        if let Err(e) = device.start_recording(&self.config.recorder, events) {
            tracing::error!(error = %e, "recorder construction failed");
            return Err(e.into());
        }

        self.session.start(self.config.countdown)?;
        self.events = rx;
        self.started_at = Some(Instant::now());
        self.stopped_at = None;
        self.countdown = Some(CountdownHandle::spawn(self.config.countdown, tx));
        tracing::debug!(countdown = %self.config.countdown, "recording started");
        Ok(())
    }

    /// Stop recording: RECORDING -> STOPPED.
    ///
    /// The Recording is assembled once the device reports stop completion.
    /// If the device cannot be stopped the session stays in RECORDING.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        self.precondition(SessionState::Recording, "stop recording")?;
        if let Some(device) = self.device.as_mut() {
            device.stop_recording()?;
        }

        self.session.stop()?;
        self.countdown = None;
        self.stopped_at = Some(Instant::now());
        tracing::debug!(chunks = self.session.chunks().len(), "recording stopping");
        Ok(())
    }

    /// Return to IDLE, releasing the device and any timer.
    ///
    /// Hands back the session's Recording reference; artifacts already
    /// published elsewhere are unaffected.
    pub fn reset(&mut self) -> Result<Option<Recording>, SessionError> {
        let previous = self.session.reset()?;
        self.countdown = None;
        if let Some(mut device) = self.device.take() {
            device.release();
        }
        self.events = idle_channel();
        self.started_at = None;
        self.stopped_at = None;
        tracing::debug!("session reset");
        Ok(previous)
    }

    /// Abandon the session from any state and return to IDLE.
    ///
    /// Cancels the countdown, releases the device and discards collected
    /// chunks. Used when a session ends with an error.
    pub fn abort(&mut self) {
        self.countdown = None;
        if let Some(mut device) = self.device.take() {
            device.release();
        }
        self.session.abort();
        self.events = idle_channel();
        self.started_at = None;
        self.stopped_at = None;
        tracing::debug!("session aborted");
    }

    /// Wait for and apply the next meaningful event.
    ///
    /// Returns `Ok(None)` once every event source of the session is gone.
    pub async fn next_update(&mut self) -> Result<Option<SessionUpdate>, SessionError> {
        loop {
            let Some(event) = self.events.recv().await else {
                return Ok(None);
            };
            if let Some(update) = self.apply(event)? {
                return Ok(Some(update));
            }
        }
    }

    fn apply(&mut self, event: SessionEvent) -> Result<Option<SessionUpdate>, SessionError> {
        match event {
            SessionEvent::Tick(remaining) => {
                Ok(self.session.tick(remaining).then_some(SessionUpdate::Tick(remaining)))
            }
            SessionEvent::CountdownElapsed => {
                if !self.session.is_recording() {
                    return Ok(None);
                }
                self.stop()?;
                Ok(Some(SessionUpdate::Stopping))
            }
            SessionEvent::Device(DeviceEvent::ChunkAvailable(data)) => {
                let size = data.len();
                match self.session.push_chunk(data) {
                    Ok(true) => Ok(Some(SessionUpdate::ChunkStored {
                        size,
                        total: self.session.chunks().len(),
                    })),
                    Ok(false) => Ok(None),
                    Err(e) => {
                        tracing::warn!(error = %e, size, "dropping late chunk");
                        Ok(None)
                    }
                }
            }
            SessionEvent::Device(DeviceEvent::Failed(error)) => {
                if !self.session.is_recording() {
                    // A recorder interrupted while flushing may exit non-zero
                    tracing::warn!(
                        kind = error.kind(),
                        error = %error,
                        "recorder exited with error"
                    );
                    return Ok(None);
                }
                tracing::error!(
                    kind = error.kind(),
                    error = %error,
                    "recorder failed while recording"
                );
                self.abort();
                Err(error.into())
            }
            SessionEvent::Device(DeviceEvent::RecordingStopped) => {
                if self.session.is_recording() {
                    // The recorder exited on its own; keep what it delivered
                    tracing::warn!(
                        chunks = self.session.chunks().len(),
                        "recorder stopped before the countdown elapsed"
                    );
                    self.session.stop()?;
                    self.countdown = None;
                    self.stopped_at = Some(Instant::now());
                }
                if !self.session.is_flushing() {
                    tracing::warn!(state = %self.session.state(), "unexpected stop completion");
                    return Ok(None);
                }
                let duration = match (self.started_at, self.stopped_at) {
                    (Some(start), Some(stop)) => stop.saturating_duration_since(start),
                    _ => std::time::Duration::ZERO,
                };
                let recording = self.session.finish(self.config.assemble_as, duration)?;
                tracing::info!(
                    bytes = recording.size_bytes(),
                    chunks = self.session.chunks().len(),
                    mime = %recording.mime_type(),
                    "recording assembled"
                );
                Ok(Some(SessionUpdate::Finished(recording)))
            }
        }
    }

    /// Drive the session until the recording is assembled
    pub async fn run_until_complete<F>(
        &mut self,
        mut on_update: F,
    ) -> Result<Recording, SessionError>
    where
        F: FnMut(&SessionUpdate),
    {
        while let Some(update) = self.next_update().await? {
            on_update(&update);
            if let SessionUpdate::Finished(recording) = update {
                return Ok(recording);
            }
        }
        Err(SessionError::EventsClosed)
    }
}

impl<P> Drop for SessionController<P>
where
    P: CaptureDeviceProvider,
{
    fn drop(&mut self) {
        if let Some(device) = self.device.as_mut() {
            device.release();
        }
    }
}
