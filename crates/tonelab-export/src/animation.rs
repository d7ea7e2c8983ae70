//! Animated GIF export of a captured frame sequence.

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use tonelab_core::RasterBuffer;

use crate::error::{ExportError, Result};

/// GIF export settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GifConfig {
    /// Display time per frame.
    pub frame_delay_ms: u32,
    /// Number of loops; None plays forever.
    pub loop_count: Option<u16>,
    /// Encoder speed/quality trade-off, 1 (best) to 30 (fastest).
    pub speed: i32,
    /// Optional nearest-neighbor downscale, aspect preserved.
    pub output_width: Option<u32>,
}

impl Default for GifConfig {
    fn default() -> Self {
        Self {
            frame_delay_ms: 100,
            loop_count: None,
            speed: 10,
            output_width: None,
        }
    }
}

/// Encode a frame sequence as an animated GIF. All frames must share the
/// same dimensions.
pub fn encode_gif(frames: &[RasterBuffer], config: &GifConfig) -> Result<Vec<u8>> {
    let first = frames
        .first()
        .ok_or_else(|| ExportError::FrameSequence("no frames to encode".to_string()))?;
    for (i, frame) in frames.iter().enumerate() {
        if frame.width != first.width || frame.height != first.height {
            return Err(ExportError::FrameSequence(format!(
                "frame {i} is {}x{}, expected {}x{}",
                frame.width, frame.height, first.width, first.height
            )));
        }
    }

    let speed = config.speed.clamp(1, 30);
    let mut out = Vec::new();
    {
        let mut encoder = GifEncoder::new_with_speed(&mut out, speed);
        let repeat = match config.loop_count {
            None => Repeat::Infinite,
            Some(n) => Repeat::Finite(n),
        };
        encoder
            .set_repeat(repeat)
            .map_err(|e| ExportError::Encoding(format!("gif repeat: {e}")))?;

        for frame in frames {
            let scaled;
            let frame = match config.output_width {
                Some(target) if target < frame.width => {
                    scaled = downscale(frame, target);
                    &scaled
                }
                _ => frame,
            };
            let img = RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
                .ok_or_else(|| ExportError::Encoding("frame buffer size mismatch".to_string()))?;
            let delay = Delay::from_numer_denom_ms(config.frame_delay_ms, 1);
            encoder
                .encode_frame(Frame::from_parts(img, 0, 0, delay))
                .map_err(|e| ExportError::Encoding(format!("gif frame: {e}")))?;
        }
    }
    Ok(out)
}

/// Nearest-neighbor downscale to a target width, preserving aspect ratio.
fn downscale(src: &RasterBuffer, target_width: u32) -> RasterBuffer {
    let target_width = target_width.max(1);
    let target_height =
        ((src.height as u64 * target_width as u64) / src.width as u64).max(1) as u32;
    let mut dst = RasterBuffer::new(target_width, target_height);

    for dy in 0..target_height {
        let sy = ((dy as u64 * src.height as u64) / target_height as u64)
            .min(src.height as u64 - 1) as u32;
        for dx in 0..target_width {
            let sx = ((dx as u64 * src.width as u64) / target_width as u64)
                .min(src.width as u64 - 1) as u32;
            dst.pixel_mut(dx, dy).copy_from_slice(src.pixel(sx, sy));
        }
    }
    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: usize, width: u32, height: u32) -> Vec<RasterBuffer> {
        (0..n)
            .map(|i| RasterBuffer::filled(width, height, [(i * 40) as u8, 80, 160]))
            .collect()
    }

    #[test]
    fn test_gif_header_written() {
        let gif = encode_gif(&frames(3, 8, 8), &GifConfig::default()).unwrap();
        assert_eq!(&gif[..6], b"GIF89a");
    }

    #[test]
    fn test_empty_sequence_is_error() {
        let err = encode_gif(&[], &GifConfig::default()).unwrap_err();
        assert!(matches!(err, ExportError::FrameSequence(_)));
    }

    #[test]
    fn test_mismatched_dimensions_is_error() {
        let mut seq = frames(2, 8, 8);
        seq.push(RasterBuffer::filled(4, 8, [0, 0, 0]));
        let err = encode_gif(&seq, &GifConfig::default()).unwrap_err();
        assert!(matches!(err, ExportError::FrameSequence(msg) if msg.contains("frame 2")));
    }

    #[test]
    fn test_downscale_halves_dimensions() {
        let src = RasterBuffer::filled(16, 8, [50, 100, 150]);
        let dst = downscale(&src, 8);
        assert_eq!(dst.width, 8);
        assert_eq!(dst.height, 4);
        assert_eq!(dst.pixel(0, 0), &[50, 100, 150, 255]);
    }

    #[test]
    fn test_downscale_preserves_content_placement() {
        let mut src = RasterBuffer::filled(16, 16, [0, 0, 0]);
        // Right half white.
        for y in 0..16 {
            for x in 8..16 {
                src.pixel_mut(x, y).copy_from_slice(&[255, 255, 255, 255]);
            }
        }
        let dst = downscale(&src, 8);
        assert_eq!(dst.pixel(1, 4)[0], 0);
        assert_eq!(dst.pixel(6, 4)[0], 255);
    }

    #[test]
    fn test_output_width_applies() {
        let config = GifConfig {
            output_width: Some(8),
            ..GifConfig::default()
        };
        let gif = encode_gif(&frames(2, 32, 32), &config).unwrap();
        // Logical screen width lives at bytes 6-7, little endian.
        assert_eq!(u16::from_le_bytes([gif[6], gif[7]]), 8);
    }
}
