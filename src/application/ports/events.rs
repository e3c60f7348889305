//! Session event channel
//!
//! Device callbacks and countdown ticks are delivered as messages on a single
//! channel, so the session applies them strictly in delivery order.

use tokio::sync::mpsc;

use super::capture::DeviceError;

/// Events emitted by a recording device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// A fragment of recorded media is available
    ChunkAvailable(Vec<u8>),
    /// The device finished recording and has flushed every pending chunk
    RecordingStopped,
    /// The recorder terminated with an error
    Failed(DeviceError),
}

/// Messages consumed by the session event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Countdown tick carrying the remaining seconds
    Tick(u32),
    /// The countdown ran past its last value
    CountdownElapsed,
    Device(DeviceEvent),
}

/// Sending half handed to a device when its recorder starts
#[derive(Debug, Clone)]
pub struct DeviceEventSender {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl DeviceEventSender {
    pub fn new(tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self { tx }
    }

    /// Deliver a fragment. Returns false once the session stopped listening.
    pub fn chunk_available(&self, data: Vec<u8>) -> bool {
        self.tx
            .send(SessionEvent::Device(DeviceEvent::ChunkAvailable(data)))
            .is_ok()
    }

    /// Signal stop completion. Must be sent after the last chunk.
    pub fn recording_stopped(&self) -> bool {
        self.tx
            .send(SessionEvent::Device(DeviceEvent::RecordingStopped))
            .is_ok()
    }

    /// Report a runtime failure. Send before `recording_stopped`.
    pub fn failed(&self, error: DeviceError) -> bool {
        self.tx
            .send(SessionEvent::Device(DeviceEvent::Failed(error)))
            .is_ok()
    }
}
