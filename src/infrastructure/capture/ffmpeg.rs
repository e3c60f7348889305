//! FFmpeg-based capture device adapter
//!
//! Records from a V4L2 device (or ffmpeg's synthetic `testsrc`) and streams
//! the encoded container from ffmpeg's stdout as chunks.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::application::ports::{
    CaptureDevice, CaptureDeviceProvider, DeviceError, DeviceEventSender,
    RecorderConstructionError,
};
use crate::domain::capture::{CaptureConstraints, RecorderOptions};
use crate::domain::recording::VideoMimeType;

/// Read size for stdout chunks
const CHUNK_SIZE: usize = 64 * 1024;

/// Widest frame the encoders are asked to produce
const MAX_VIDEO_WIDTH: u32 = 4096;

/// Source name selecting ffmpeg's synthetic test pattern
pub const TEST_PATTERN_SOURCE: &str = "testsrc";

/// Where frames come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureSource {
    /// A V4L2 device node such as /dev/video0
    Device(PathBuf),
    /// ffmpeg's lavfi test pattern
    TestPattern,
}

impl CaptureSource {
    pub fn parse(source: &str) -> Self {
        if source == TEST_PATTERN_SOURCE {
            Self::TestPattern
        } else {
            Self::Device(PathBuf::from(source))
        }
    }

    fn label(&self) -> String {
        match self {
            Self::Device(path) => format!("v4l2:{}", path.display()),
            Self::TestPattern => TEST_PATTERN_SOURCE.to_string(),
        }
    }
}

/// Map ffmpeg's stderr to a device error kind
pub fn classify_ffmpeg_error(stderr: &str) -> DeviceError {
    let lower = stderr.to_lowercase();
    let last_line = stderr
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("unknown error")
        .trim()
        .to_string();

    if lower.contains("device or resource busy") {
        DeviceError::InUse(last_line)
    } else if lower.contains("permission denied") {
        DeviceError::PermissionDenied(last_line)
    } else if lower.contains("no such file or directory") {
        DeviceError::NotFound(last_line)
    } else if lower.contains("invalid argument") || lower.contains("cannot set") {
        DeviceError::ConstraintsUnsatisfiable(last_line)
    } else {
        DeviceError::Failed(last_line)
    }
}

/// Check that the device node can be opened
fn probe_device(path: &Path) -> Result<(), DeviceError> {
    let display = path.display().to_string();
    match std::fs::OpenOptions::new().read(true).open(path) {
        Ok(_) => Ok(()),
        Err(e) => Err(match e.kind() {
            std::io::ErrorKind::NotFound => DeviceError::NotFound(display),
            std::io::ErrorKind::PermissionDenied => DeviceError::PermissionDenied(display),
            // EBUSY
            _ if e.raw_os_error() == Some(16) => DeviceError::InUse(display),
            _ => DeviceError::Failed(format!("{}: {}", display, e)),
        }),
    }
}

/// Provider opening ffmpeg-backed capture devices
pub struct FfmpegCaptureProvider {
    source: CaptureSource,
}

impl FfmpegCaptureProvider {
    /// Create a provider for a device path or `testsrc`
    pub fn new(source: &str) -> Self {
        Self {
            source: CaptureSource::parse(source),
        }
    }

    /// Verify ffmpeg is installed
    async fn check_ffmpeg() -> Result<(), DeviceError> {
        Command::new("ffmpeg")
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|_| ())
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    DeviceError::NotFound("ffmpeg not found. Please install ffmpeg.".to_string())
                } else {
                    DeviceError::Failed(e.to_string())
                }
            })
    }
}

#[async_trait]
impl CaptureDeviceProvider for FfmpegCaptureProvider {
    async fn acquire(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Box<dyn CaptureDevice>, DeviceError> {
        let width = constraints.video.width;
        if width == 0 {
            return Err(DeviceError::InvalidConfiguration(
                "video width must be positive".to_string(),
            ));
        }
        if width > MAX_VIDEO_WIDTH {
            return Err(DeviceError::ConstraintsUnsatisfiable(format!(
                "video width {} exceeds {}",
                width, MAX_VIDEO_WIDTH
            )));
        }

        Self::check_ffmpeg().await?;
        if let CaptureSource::Device(path) = &self.source {
            probe_device(path)?;
        }

        tracing::debug!(source = ?self.source, width, audio = constraints.audio, "device acquired");
        Ok(Box::new(FfmpegCaptureDevice::new(
            self.source.clone(),
            *constraints,
        )))
    }
}

/// An acquired ffmpeg capture source
pub struct FfmpegCaptureDevice {
    source: CaptureSource,
    constraints: CaptureConstraints,
    label: String,
    /// Asks the pump task to interrupt the recorder
    stop_tx: Option<oneshot::Sender<()>>,
    /// Task pumping stdout into chunks; owns the child process
    pump: Option<JoinHandle<()>>,
}

impl FfmpegCaptureDevice {
    fn new(source: CaptureSource, constraints: CaptureConstraints) -> Self {
        Self {
            label: source.label(),
            source,
            constraints,
            stop_tx: None,
            pump: None,
        }
    }

    /// Build FFmpeg args for recording to stdout
    pub fn build_ffmpeg_args(
        source: &CaptureSource,
        audio: bool,
        options: &RecorderOptions,
    ) -> Vec<String> {
        let mut args: Vec<String> = ["-hide_banner", "-loglevel", "error"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        match source {
            CaptureSource::Device(path) => {
                args.extend(["-f", "v4l2", "-i"].map(String::from));
                args.push(path.to_string_lossy().to_string());
                if audio {
                    args.extend(["-f", "pulse", "-i", "default"].map(String::from));
                }
            }
            CaptureSource::TestPattern => {
                args.extend(["-re", "-f", "lavfi", "-i", "testsrc=size=640x480:rate=30"].map(String::from));
                if audio {
                    args.extend(["-f", "lavfi", "-i", "sine=frequency=440"].map(String::from));
                }
            }
        }

        // Keep the aspect ratio; libx264 needs an even height
        args.push("-vf".to_string());
        args.push(format!("scale={}:-2", options.video_width));

        match options.mime_type {
            VideoMimeType::Webm => {
                args.extend(["-c:v", "libvpx", "-deadline", "realtime", "-b:v", "1M"].map(String::from));
                if audio {
                    args.extend(["-c:a", "libopus"].map(String::from));
                }
                args.extend(["-f", "webm"].map(String::from));
            }
            VideoMimeType::Mp4 => {
                args.extend(
                    ["-c:v", "libx264", "-preset", "veryfast", "-pix_fmt", "yuv420p"]
                        .map(String::from),
                );
                if audio {
                    args.extend(["-c:a", "aac"].map(String::from));
                }
                // Fragmented so the container can be written to a pipe
                args.extend(["-movflags", "frag_keyframe+empty_moov", "-f", "mp4"].map(String::from));
            }
        }

        args.push("pipe:1".to_string());
        args
    }

    /// Spawn FFmpeg process
    fn spawn_ffmpeg(args: &[String]) -> Result<Child, RecorderConstructionError> {
        Command::new("ffmpeg")
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RecorderConstructionError::LaunchFailed(e.to_string()))
    }

    /// Forward stdout as chunks, then report stop completion.
    ///
    /// A stop request is turned into SIGINT on the owned child, so the
    /// signal never reaches a process that was already reaped.
    async fn pump(
        mut child: Child,
        events: DeviceEventSender,
        mut stop_rx: oneshot::Receiver<()>,
    ) {
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let read_chunks = async {
            let Some(mut stdout) = stdout else { return };
            let mut buf = vec![0u8; CHUNK_SIZE];
            loop {
                match stdout.read(&mut buf).await {
                    Ok(0) => break,
                    Ok(n) => {
                        if !events.chunk_available(buf[..n].to_vec()) {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "failed reading recorder output");
                        break;
                    }
                }
            }
        };
        let output = async {
            let (_, text) = tokio::join!(read_chunks, read_all(stderr));
            text
        };
        tokio::pin!(output);

        let mut stop_pending = true;
        let stderr_text = loop {
            tokio::select! {
                text = &mut output => break text,
                request = &mut stop_rx, if stop_pending => {
                    stop_pending = false;
                    if request.is_ok() {
                        if let Err(e) = Self::send_interrupt(&child) {
                            tracing::warn!(error = %e, "failed to interrupt recorder");
                        }
                    }
                }
            }
        };

        match child.wait().await {
            Ok(status) if !status.success() && !stderr_text.trim().is_empty() => {
                events.failed(classify_ffmpeg_error(&stderr_text));
            }
            Ok(status) => tracing::debug!(%status, "recorder exited"),
            Err(e) => tracing::warn!(error = %e, "failed waiting for recorder"),
        }

        events.recording_stopped();
    }

    /// Send SIGINT so ffmpeg finalizes the container before exiting
    #[cfg(unix)]
    fn send_interrupt(child: &Child) -> Result<(), DeviceError> {
        use nix::sys::signal::{self, Signal};
        use nix::unistd::Pid;

        if let Some(id) = child.id() {
            signal::kill(Pid::from_raw(id as i32), Signal::SIGINT)
                .map_err(|e| DeviceError::Failed(format!("Signal failed: {}", e)))?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn send_interrupt(_child: &Child) -> Result<(), DeviceError> {
        Err(DeviceError::Failed(
            "graceful recorder stop is only supported on unix".to_string(),
        ))
    }
}

async fn read_all<R: AsyncRead + Unpin>(reader: Option<R>) -> String {
    let Some(mut reader) = reader else {
        return String::new();
    };
    let mut buf = Vec::new();
    let _ = reader.read_to_end(&mut buf).await;
    String::from_utf8_lossy(&buf).to_string()
}

impl CaptureDevice for FfmpegCaptureDevice {
    fn label(&self) -> &str {
        &self.label
    }

    fn start_recording(
        &mut self,
        options: &RecorderOptions,
        events: DeviceEventSender,
    ) -> Result<(), RecorderConstructionError> {
        if self.pump.as_ref().is_some_and(|p| !p.is_finished()) {
            return Err(RecorderConstructionError::AlreadyRecording);
        }
        if options.video_width == 0 || options.video_width > MAX_VIDEO_WIDTH {
            return Err(RecorderConstructionError::InvalidConfiguration(format!(
                "video width {} out of range",
                options.video_width
            )));
        }

        let args = Self::build_ffmpeg_args(&self.source, self.constraints.audio, options);
        tracing::debug!(args = ?args, "launching recorder");
        let child = Self::spawn_ffmpeg(&args)?;

        let (stop_tx, stop_rx) = oneshot::channel();
        self.stop_tx = Some(stop_tx);
        self.pump = Some(tokio::spawn(Self::pump(child, events, stop_rx)));
        Ok(())
    }

    fn stop_recording(&mut self) -> Result<(), DeviceError> {
        let Some(stop_tx) = self.stop_tx.take() else {
            return Err(DeviceError::Failed("no recording in progress".to_string()));
        };
        // A recorder that already exited has reported its stop completion
        if stop_tx.send(()).is_err() {
            tracing::debug!("recorder already exited");
        }
        Ok(())
    }

    fn release(&mut self) {
        self.stop_tx = None;
        if let Some(pump) = self.pump.take() {
            // Dropping the child inside the task kills the process
            pump.abort();
        }
    }
}

impl Drop for FfmpegCaptureDevice {
    fn drop(&mut self) {
        self.release();
    }
}
