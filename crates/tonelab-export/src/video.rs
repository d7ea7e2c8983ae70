//! Video export boundary. Frames travel as base64 PNG payloads in the
//! request/response types; the actual muxing happens in an external
//! ffmpeg process (crash isolation).

use std::path::Path;
use std::process::Command;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tonelab_core::RasterBuffer;

use crate::error::{ExportError, Result};
use crate::still::encode_still;

/// The wire contract with the video-muxing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoExportRequest {
    /// Base64-encoded PNG per frame, in playback order.
    pub frames: Vec<String>,
    pub frame_rate: u32,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoExportResponse {
    pub download_url: String,
}

/// Build an export request from rendered frames. All frames must share
/// the same dimensions.
pub fn build_export_request(
    frames: &[RasterBuffer],
    frame_rate: u32,
    filename: &str,
) -> Result<VideoExportRequest> {
    let first = frames
        .first()
        .ok_or_else(|| ExportError::FrameSequence("no frames to export".to_string()))?;
    for (i, frame) in frames.iter().enumerate() {
        if frame.width != first.width || frame.height != first.height {
            return Err(ExportError::FrameSequence(format!(
                "frame {i} is {}x{}, expected {}x{}",
                frame.width, frame.height, first.width, first.height
            )));
        }
    }

    let mut encoded = Vec::with_capacity(frames.len());
    for frame in frames {
        encoded.push(BASE64.encode(encode_still(frame)?));
    }
    Ok(VideoExportRequest {
        frames: encoded,
        frame_rate: frame_rate.max(1),
        filename: filename.to_string(),
    })
}

/// Muxes a frame sequence into a MOV by staging PNGs in a temp directory
/// and invoking the ffmpeg CLI.
pub struct MovMuxer {
    ffmpeg_path: String,
}

impl MovMuxer {
    pub fn new() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
        }
    }

    pub fn with_ffmpeg_path(path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: path.into(),
        }
    }

    /// True if the configured ffmpeg binary responds. Callers can probe
    /// before offering MOV export in the first place.
    pub fn is_available(&self) -> bool {
        Command::new(&self.ffmpeg_path)
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Write the request's frames to `output`. The staging directory is
    /// removed when this returns.
    pub fn mux(&self, request: &VideoExportRequest, output: &Path) -> Result<()> {
        let staging = tempfile::tempdir()?;
        tracing::debug!(
            frames = request.frames.len(),
            frame_rate = request.frame_rate,
            staging = %staging.path().display(),
            "staging video frames"
        );

        for (i, payload) in request.frames.iter().enumerate() {
            let png = BASE64
                .decode(payload)
                .map_err(|e| ExportError::Encoding(format!("frame {i} base64: {e}")))?;
            std::fs::write(staging.path().join(format!("frame_{i:05}.png")), png)?;
        }

        let pattern = staging.path().join("frame_%05d.png");
        let result = Command::new(&self.ffmpeg_path)
            .arg("-y")
            .args(["-framerate", &request.frame_rate.to_string()])
            .args(["-i", &pattern.to_string_lossy()])
            .args(["-c:v", "libx264", "-pix_fmt", "yuv420p"])
            .arg(output)
            .output();

        let out = result.map_err(|e| {
            ExportError::MuxerUnavailable(format!("failed to spawn {}: {e}", self.ffmpeg_path))
        })?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(ExportError::MuxerUnavailable(format!(
                "{} exited with {}: {stderr}",
                self.ffmpeg_path, out.status
            )));
        }
        tracing::debug!(output = %output.display(), "mov written");
        Ok(())
    }
}

impl Default for MovMuxer {
    fn default() -> Self {
        Self::new()
    }
}
