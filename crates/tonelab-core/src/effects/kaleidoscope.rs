use std::f32::consts::TAU;

use rayon::prelude::*;

use crate::buffer::RasterBuffer;
use crate::effect::{EffectCategory, PixelEffect};
use crate::error::Result;
use crate::params::{ParameterSpec, ResolvedParams};

/// Folds the image into angular wedges around the center and mirrors
/// alternate wedges, so the base wedge tiles the full circle. Source
/// samples falling off the canvas become transparent black, so this
/// effect may write alpha.
pub struct Kaleidoscope;

impl PixelEffect for Kaleidoscope {
    fn id(&self) -> &str {
        "kaleidoscope"
    }

    fn display_name(&self) -> &str {
        "Kaleidoscope"
    }

    fn category(&self) -> EffectCategory {
        EffectCategory::Creative
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::slider("segments", "Segments", 2.0, 16.0, 1.0, 6.0),
            ParameterSpec::slider("rotation", "Rotation", 0.0, 360.0, 1.0, 0.0),
        ]
    }

    fn apply(&self, input: RasterBuffer, params: &ResolvedParams) -> Result<RasterBuffer> {
        let segments = params.number("segments").round().max(2.0) as u32;
        let rotation = (params.number("rotation") as f32).to_radians();
        let wedge = TAU / segments as f32;

        let (width, height) = (input.width, input.height);
        let cx = width as f32 / 2.0;
        let cy = height as f32 / 2.0;

        let mut output = RasterBuffer::new(width, height);
        let row_bytes = output.row_bytes();
        output
            .data
            .par_chunks_exact_mut(row_bytes)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let dx = x as f32 + 0.5 - cx;
                    let dy = y as f32 + 0.5 - cy;
                    let radius = (dx * dx + dy * dy).sqrt();

                    // Fold the angle into the base wedge, mirroring every
                    // other wedge so seams line up.
                    let theta = (dy.atan2(dx) - rotation).rem_euclid(TAU);
                    let index = (theta / wedge).floor();
                    let mut folded = theta - index * wedge;
                    if index as u32 % 2 == 1 {
                        folded = wedge - folded;
                    }
                    let source_angle = folded + rotation;

                    let src_x = cx + radius * source_angle.cos() - 0.5;
                    let src_y = cy + radius * source_angle.sin() - 0.5;

                    if src_x < 0.0
                        || src_y < 0.0
                        || src_x > width as f32 - 1.0
                        || src_y > height as f32 - 1.0
                    {
                        pixel.copy_from_slice(&[0, 0, 0, 0]);
                        continue;
                    }

                    let sample = input.sample_bilinear(src_x, src_y);
                    for c in 0..4 {
                        pixel[c] = sample[c].round().clamp(0.0, 255.0) as u8;
                    }
                }
            });
        Ok(output)
    }
}
