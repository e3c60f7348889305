//! Recording session state machine

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use super::recording::{Chunk, Countdown, Recording, VideoMimeType};

/// Recording session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    DeviceReady,
    Recording,
    Stopped,
}

impl SessionState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::DeviceReady => "device-ready",
            Self::Recording => "recording",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an operation is called outside its valid state
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: SessionState,
    pub action: String,
}

/// Recording session entity.
///
/// State machine:
///   IDLE -> DEVICE_READY (device_acquired)
///   DEVICE_READY -> RECORDING (start)
///   RECORDING -> STOPPED (stop)
///   STOPPED -> IDLE (reset)
///   any -> IDLE (abort)
///
/// After `stop` the device may still flush fragments; they are accepted until
/// `finish` assembles the Recording, which happens exactly once per session.
#[derive(Debug, Default)]
pub struct RecordingSession {
    state: SessionState,
    chunks: Vec<Chunk>,
    seconds_remaining: u32,
    recording: Option<Recording>,
}

impl RecordingSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    /// Stopped, but the device has not yet delivered its stop-completion event
    pub fn is_flushing(&self) -> bool {
        self.state == SessionState::Stopped && self.recording.is_none()
    }

    /// Chunks accumulated by the current session, in arrival order
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    /// The assembled Recording, once the session has finished
    pub fn recording(&self) -> Option<&Recording> {
        self.recording.as_ref()
    }

    fn invalid(&self, action: &str) -> InvalidStateTransition {
        InvalidStateTransition {
            current_state: self.state,
            action: action.to_string(),
        }
    }

    /// Transition from IDLE to DEVICE_READY
    pub fn device_acquired(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Idle {
            return Err(self.invalid("acquire a device"));
        }
        self.state = SessionState::DeviceReady;
        Ok(())
    }

    /// Transition from DEVICE_READY to RECORDING, discarding previous chunks
    pub fn start(&mut self, countdown: Countdown) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::DeviceReady {
            return Err(self.invalid("start recording"));
        }
        self.chunks = Vec::new();
        self.recording = None;
        self.seconds_remaining = countdown.as_secs();
        self.state = SessionState::Recording;
        Ok(())
    }

    /// Record a countdown tick. Ticks outside RECORDING are stale and ignored.
    pub fn tick(&mut self, remaining: u32) -> bool {
        if self.state != SessionState::Recording {
            return false;
        }
        self.seconds_remaining = remaining;
        true
    }

    /// Append a fragment delivered by the device.
    ///
    /// Returns `Ok(false)` for empty fragments, which are dropped.
    pub fn push_chunk(&mut self, data: Vec<u8>) -> Result<bool, InvalidStateTransition> {
        if !(self.is_recording() || self.is_flushing()) {
            return Err(self.invalid("accept a chunk"));
        }
        match Chunk::new(data) {
            Some(chunk) => {
                self.chunks.push(chunk);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Transition from RECORDING to STOPPED
    pub fn stop(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Recording {
            return Err(self.invalid("stop recording"));
        }
        self.state = SessionState::Stopped;
        Ok(())
    }

    /// Assemble the Recording after the device confirmed the stop
    pub fn finish(
        &mut self,
        mime_type: VideoMimeType,
        duration: Duration,
    ) -> Result<Recording, InvalidStateTransition> {
        if !self.is_flushing() {
            return Err(self.invalid("assemble a recording"));
        }
        let recording = Recording::assemble(&self.chunks, mime_type, duration);
        self.recording = Some(recording.clone());
        Ok(recording)
    }

    /// Transition from STOPPED to IDLE, handing back the Recording reference
    pub fn reset(&mut self) -> Result<Option<Recording>, InvalidStateTransition> {
        if self.state != SessionState::Stopped {
            return Err(self.invalid("reset"));
        }
        self.state = SessionState::Idle;
        self.seconds_remaining = 0;
        Ok(self.recording.take())
    }

    /// Return to IDLE from any state, discarding chunks and any Recording
    pub fn abort(&mut self) {
        self.state = SessionState::Idle;
        self.chunks = Vec::new();
        self.recording = None;
        self.seconds_remaining = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_session() -> RecordingSession {
        let mut session = RecordingSession::new();
        session.device_acquired().unwrap();
        session.start(Countdown::default()).unwrap();
        session
    }

    #[test]
    fn new_session_is_idle() {
        let session = RecordingSession::new();
        assert!(session.is_idle());
        assert!(session.chunks().is_empty());
        assert!(session.recording().is_none());
    }

    #[test]
    fn start_from_idle_fails() {
        let mut session = RecordingSession::new();
        let err = session.start(Countdown::default()).unwrap_err();
        assert_eq!(err.current_state, SessionState::Idle);
        assert!(err.action.contains("start recording"));
    }

    #[test]
    fn start_while_recording_fails() {
        let mut session = recording_session();
        let err = session.start(Countdown::default()).unwrap_err();
        assert_eq!(err.current_state, SessionState::Recording);
    }

    #[test]
    fn start_sets_seconds_remaining() {
        let session = recording_session();
        assert!(session.is_recording());
        assert_eq!(session.seconds_remaining(), 5);
    }

    #[test]
    fn stop_before_start_is_a_precondition_error() {
        let mut session = RecordingSession::new();
        let err = session.stop().unwrap_err();
        assert_eq!(err.current_state, SessionState::Idle);

        session.device_acquired().unwrap();
        let err = session.stop().unwrap_err();
        assert_eq!(err.current_state, SessionState::DeviceReady);
    }

    #[test]
    fn stop_twice_fails() {
        let mut session = recording_session();
        session.stop().unwrap();
        let err = session.stop().unwrap_err();
        assert_eq!(err.current_state, SessionState::Stopped);
    }

    #[test]
    fn empty_chunks_are_dropped() {
        let mut session = recording_session();
        assert!(!session.push_chunk(Vec::new()).unwrap());
        assert!(session.push_chunk(vec![1]).unwrap());
        assert_eq!(session.chunks().len(), 1);
    }

    #[test]
    fn chunk_outside_recording_fails() {
        let mut session = RecordingSession::new();
        assert!(session.push_chunk(vec![1]).is_err());
    }

    #[test]
    fn chunks_accepted_while_flushing() {
        let mut session = recording_session();
        session.push_chunk(vec![1; 10]).unwrap();
        session.stop().unwrap();
        assert!(session.is_flushing());
        session.push_chunk(vec![2; 5]).unwrap();

        let recording = session
            .finish(VideoMimeType::Webm, Duration::from_secs(6))
            .unwrap();
        assert_eq!(recording.size_bytes(), 15);
        assert!(!session.is_flushing());
        assert!(session.push_chunk(vec![3]).is_err());
    }

    #[test]
    fn finish_happens_once() {
        let mut session = recording_session();
        session.stop().unwrap();
        session.finish(VideoMimeType::Webm, Duration::from_secs(1)).unwrap();
        assert!(session
            .finish(VideoMimeType::Webm, Duration::from_secs(1))
            .is_err());
    }

    #[test]
    fn ticks_only_apply_while_recording() {
        let mut session = recording_session();
        assert!(session.tick(3));
        assert_eq!(session.seconds_remaining(), 3);

        session.stop().unwrap();
        assert!(!session.tick(2));
        assert_eq!(session.seconds_remaining(), 3);
    }

    #[test]
    fn restart_clears_previous_chunks() {
        let mut session = recording_session();
        session.push_chunk(vec![1; 4]).unwrap();
        session.stop().unwrap();
        session.finish(VideoMimeType::Webm, Duration::from_secs(1)).unwrap();

        let previous = session.reset().unwrap();
        assert!(previous.is_some());
        assert!(session.is_idle());

        session.device_acquired().unwrap();
        session.start(Countdown::default()).unwrap();
        assert!(session.chunks().is_empty());
        assert!(session.recording().is_none());
    }

    #[test]
    fn reset_from_recording_fails() {
        let mut session = recording_session();
        let err = session.reset().unwrap_err();
        assert_eq!(err.current_state, SessionState::Recording);
    }

    #[test]
    fn abort_returns_to_idle_from_any_state() {
        let mut session = RecordingSession::new();
        session.abort();
        assert!(session.is_idle());

        session.device_acquired().unwrap();
        session.abort();
        assert!(session.is_idle());

        let mut session = recording_session();
        session.push_chunk(vec![1; 4]).unwrap();
        session.abort();
        assert!(session.is_idle());
        assert!(session.chunks().is_empty());
        assert_eq!(session.seconds_remaining(), 0);
        session.device_acquired().unwrap();
    }

    #[test]
    fn state_display() {
        assert_eq!(SessionState::Idle.to_string(), "idle");
        assert_eq!(SessionState::DeviceReady.to_string(), "device-ready");
        assert_eq!(SessionState::Recording.to_string(), "recording");
        assert_eq!(SessionState::Stopped.to_string(), "stopped");
    }

    #[test]
    fn error_display() {
        let err = InvalidStateTransition {
            current_state: SessionState::Idle,
            action: "stop recording".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("stop recording"));
        assert!(msg.contains("idle"));
    }
}
