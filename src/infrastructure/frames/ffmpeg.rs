//! FFmpeg frame decoder adapter

use std::io::ErrorKind;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

use crate::application::ports::{FrameError, FrameSource};
use crate::domain::recording::Recording;
use crate::domain::snapshot::{VideoFrame, SNAPSHOT_HEIGHT, SNAPSHOT_WIDTH};

/// Decodes the first video frame of a recording as raw RGBA
pub struct FfmpegFrameExtractor {
    width: u32,
    height: u32,
}

impl FfmpegFrameExtractor {
    pub fn new() -> Self {
        Self {
            width: SNAPSHOT_WIDTH,
            height: SNAPSHOT_HEIGHT,
        }
    }

    fn build_ffmpeg_args(&self) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-i".to_string(),
            "pipe:0".to_string(),
            "-frames:v".to_string(),
            "1".to_string(),
            "-vf".to_string(),
            format!("scale={}:{}", self.width, self.height),
            "-f".to_string(),
            "rawvideo".to_string(),
            "-pix_fmt".to_string(),
            "rgba".to_string(),
            "pipe:1".to_string(),
        ]
    }
}

impl Default for FfmpegFrameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a decoder process produced
struct DecoderOutput {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: String,
}

/// Feed `input` to `program` and collect stdout and stderr concurrently,
/// so neither pipe can fill up and stall the process
async fn run_piped(
    program: &str,
    args: &[String],
    input: Vec<u8>,
) -> Result<DecoderOutput, FrameError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                FrameError::DecoderUnavailable(format!("{} not found", program))
            } else {
                FrameError::DecoderUnavailable(e.to_string())
            }
        })?;

    let (Some(mut stdin), Some(mut stdout), Some(mut stderr)) =
        (child.stdin.take(), child.stdout.take(), child.stderr.take())
    else {
        return Err(FrameError::DecodeFailed("decoder pipes unavailable".to_string()));
    };

    let write = async move {
        // ffmpeg closes stdin once it has its frame
        match stdin.write_all(&input).await {
            Err(e) if e.kind() != ErrorKind::BrokenPipe => Err(e),
            _ => Ok(()),
        }
    };
    let read_out = async {
        let mut buf = Vec::new();
        stdout.read_to_end(&mut buf).await.map(|_| buf)
    };
    let read_err = async {
        let mut buf = Vec::new();
        let _ = stderr.read_to_end(&mut buf).await;
        String::from_utf8_lossy(&buf).to_string()
    };

    let (written, out, err) = tokio::join!(write, read_out, read_err);
    written.map_err(|e| FrameError::DecodeFailed(e.to_string()))?;
    let stdout = out.map_err(|e| FrameError::DecodeFailed(e.to_string()))?;

    let status = child
        .wait()
        .await
        .map_err(|e| FrameError::DecodeFailed(e.to_string()))?;

    Ok(DecoderOutput {
        status,
        stdout,
        stderr: err,
    })
}

#[async_trait]
impl FrameSource for FfmpegFrameExtractor {
    async fn decode_frame(&self, recording: &Recording) -> Result<VideoFrame, FrameError> {
        let output = run_piped("ffmpeg", &self.build_ffmpeg_args(), recording.data().to_vec())
            .await?;
        if !output.status.success() {
            return Err(FrameError::DecodeFailed(output.stderr.trim().to_string()));
        }

        let frame = VideoFrame {
            width: self.width,
            height: self.height,
            rgba: output.stdout,
        };
        if !frame.is_valid() {
            return Err(FrameError::DecodeFailed(format!(
                "expected {} bytes of RGBA, got {}",
                self.width as usize * self.height as usize * 4,
                frame.rgba.len()
            )));
        }

        Ok(frame)
    }
}
