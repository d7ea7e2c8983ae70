use rayon::prelude::*;

use crate::buffer::RasterBuffer;
use crate::colorspace::{hsl_to_rgb, rgb_to_hsl};
use crate::effect::{EffectCategory, PixelEffect};
use crate::error::Result;
use crate::params::{ParameterSpec, ResolvedParams};

/// Additive brightness shift plus contrast scaling about the 128 midpoint.
/// Preserves alpha.
pub struct BrightnessContrast;

impl PixelEffect for BrightnessContrast {
    fn id(&self) -> &str {
        "brightness_contrast"
    }

    fn display_name(&self) -> &str {
        "Brightness / Contrast"
    }

    fn category(&self) -> EffectCategory {
        EffectCategory::Basic
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::slider("brightness", "Brightness", -100.0, 100.0, 1.0, 0.0),
            ParameterSpec::slider("contrast", "Contrast", -100.0, 100.0, 1.0, 0.0),
        ]
    }

    fn apply(&self, mut input: RasterBuffer, params: &ResolvedParams) -> Result<RasterBuffer> {
        let shift = (params.number("brightness") / 100.0 * 255.0) as f32;
        let factor = (1.0 + params.number("contrast") / 100.0) as f32;

        // In-place: row-based parallelism to avoid rayon micro-task overhead
        let row_bytes = input.row_bytes();
        input.data.par_chunks_exact_mut(row_bytes).for_each(|row| {
            for pixel in row.chunks_exact_mut(4) {
                for c in 0..3 {
                    let v = pixel[c] as f32 + shift;
                    pixel[c] = ((v - 128.0) * factor + 128.0).round().clamp(0.0, 255.0) as u8;
                }
                // alpha unchanged
            }
        });
        Ok(input)
    }

    fn is_identity(&self, params: &ResolvedParams) -> bool {
        params.number("brightness") == 0.0 && params.number("contrast") == 0.0
    }
}

/// Uniform saturation scaling plus vibrance, which boosts muted colors
/// harder than already-saturated ones. Preserves alpha.
pub struct SaturationVibrance;

impl PixelEffect for SaturationVibrance {
    fn id(&self) -> &str {
        "saturation_vibrance"
    }

    fn display_name(&self) -> &str {
        "Saturation / Vibrance"
    }

    fn category(&self) -> EffectCategory {
        EffectCategory::Basic
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::slider("saturation", "Saturation", -100.0, 100.0, 1.0, 0.0),
            ParameterSpec::slider("vibrance", "Vibrance", 0.0, 100.0, 1.0, 0.0),
        ]
    }

    fn apply(&self, mut input: RasterBuffer, params: &ResolvedParams) -> Result<RasterBuffer> {
        let sat_scale = (1.0 + params.number("saturation") / 100.0) as f32;
        let vibrance = (params.number("vibrance") / 100.0) as f32;

        let row_bytes = input.row_bytes();
        input.data.par_chunks_exact_mut(row_bytes).for_each(|row| {
            for pixel in row.chunks_exact_mut(4) {
                let (h, s, l) = rgb_to_hsl(
                    pixel[0] as f32 / 255.0,
                    pixel[1] as f32 / 255.0,
                    pixel[2] as f32 / 255.0,
                );
                let mut s = (s * sat_scale).clamp(0.0, 1.0);
                s = (s * (1.0 + vibrance * (1.0 - s))).clamp(0.0, 1.0);
                let (r, g, b) = hsl_to_rgb(h, s, l);
                pixel[0] = (r * 255.0).round().clamp(0.0, 255.0) as u8;
                pixel[1] = (g * 255.0).round().clamp(0.0, 255.0) as u8;
                pixel[2] = (b * 255.0).round().clamp(0.0, 255.0) as u8;
            }
        });
        Ok(input)
    }

    fn is_identity(&self, params: &ResolvedParams) -> bool {
        params.number("saturation") == 0.0 && params.number("vibrance") == 0.0
    }
}
