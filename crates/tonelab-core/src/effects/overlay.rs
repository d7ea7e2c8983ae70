//! Gradient and border compositing effects: vignette (multiply), light
//! leak (screen), and a solid frame.

use rayon::prelude::*;

use crate::buffer::RasterBuffer;
use crate::effect::{EffectCategory, PixelEffect};
use crate::error::Result;
use crate::params::{ParameterSpec, ResolvedParams};

fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Darkens toward the corners with a radial multiply mask. Feather sets
/// how early the falloff starts, intensity how dark the corners get.
/// Preserves alpha.
pub struct Vignette;

impl PixelEffect for Vignette {
    fn id(&self) -> &str {
        "vignette"
    }

    fn display_name(&self) -> &str {
        "Vignette"
    }

    fn category(&self) -> EffectCategory {
        EffectCategory::Basic
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::slider("intensity", "Intensity", 0.0, 100.0, 1.0, 50.0),
            ParameterSpec::slider("feather", "Feather", 0.0, 100.0, 1.0, 50.0),
        ]
    }

    fn apply(&self, mut input: RasterBuffer, params: &ResolvedParams) -> Result<RasterBuffer> {
        let intensity = (params.number("intensity") / 100.0) as f32;
        let feather = (params.number("feather") / 100.0).max(0.01) as f32;

        let cx = input.width as f32 / 2.0;
        let cy = input.height as f32 / 2.0;
        let max_dist = (cx * cx + cy * cy).sqrt().max(1.0);
        let start = 1.0 - feather;

        let row_bytes = input.row_bytes();
        input
            .data
            .par_chunks_exact_mut(row_bytes)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let dx = x as f32 + 0.5 - cx;
                    let dy = y as f32 + 0.5 - cy;
                    let d = (dx * dx + dy * dy).sqrt() / max_dist;
                    let mask = 1.0 - smoothstep((d - start) / feather) * intensity;
                    for c in 0..3 {
                        pixel[c] = (pixel[c] as f32 * mask).round().clamp(0.0, 255.0) as u8;
                    }
                }
            });
        Ok(input)
    }

    fn is_identity(&self, params: &ResolvedParams) -> bool {
        params.number("intensity") == 0.0
    }
}

/// Screens a directional color gradient over the base: brightest at the
/// edge the light enters, fading along the leak direction. Never darkens.
/// Preserves alpha.
pub struct LightLeak;

impl PixelEffect for LightLeak {
    fn id(&self) -> &str {
        "light_leak"
    }

    fn display_name(&self) -> &str {
        "Light Leak"
    }

    fn category(&self) -> EffectCategory {
        EffectCategory::Creative
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::slider("intensity", "Intensity", 0.0, 100.0, 1.0, 50.0),
            ParameterSpec::slider("angle", "Angle", 0.0, 360.0, 1.0, 45.0),
            ParameterSpec::slider("feather", "Feather", 0.0, 100.0, 1.0, 60.0),
            ParameterSpec::color("color", "Color", [255, 120, 40]),
        ]
    }

    fn apply(&self, mut input: RasterBuffer, params: &ResolvedParams) -> Result<RasterBuffer> {
        let intensity = (params.number("intensity") / 100.0) as f32;
        let angle = (params.number("angle") as f32).to_radians();
        let feather = (params.number("feather") / 100.0).max(0.01) as f32;
        let color = params.color("color");

        let cx = input.width as f32 / 2.0;
        let cy = input.height as f32 / 2.0;
        let half_diag = (cx * cx + cy * cy).sqrt().max(1.0);
        let (sin_a, cos_a) = angle.sin_cos();

        let row_bytes = input.row_bytes();
        input
            .data
            .par_chunks_exact_mut(row_bytes)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let dx = x as f32 + 0.5 - cx;
                    let dy = y as f32 + 0.5 - cy;
                    // Signed distance along the leak direction, normalized
                    // so the entering edge sits at 0.
                    let t = (dx * cos_a + dy * sin_a) / half_diag;
                    let s = (t + 1.0) / 2.0;
                    let weight = smoothstep(1.0 - s / feather) * intensity;

                    for c in 0..3 {
                        let base = pixel[c] as f32;
                        let leak = color[c] as f32 * weight;
                        let screened = 255.0 - (255.0 - base) * (255.0 - leak) / 255.0;
                        pixel[c] = screened.round().clamp(0.0, 255.0) as u8;
                    }
                }
            });
        Ok(input)
    }

    fn is_identity(&self, params: &ResolvedParams) -> bool {
        params.number("intensity") == 0.0
    }
}

/// Paints a solid opaque border of the given thickness over the image
/// edges. Interior pixels are untouched.
pub struct FrameBorder;

impl PixelEffect for FrameBorder {
    fn id(&self) -> &str {
        "frame"
    }

    fn display_name(&self) -> &str {
        "Frame"
    }

    fn category(&self) -> EffectCategory {
        EffectCategory::Creative
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::slider("thickness", "Thickness", 1.0, 200.0, 1.0, 24.0),
            ParameterSpec::color("color", "Color", [255, 255, 255]),
        ]
    }

    fn apply(&self, mut input: RasterBuffer, params: &ResolvedParams) -> Result<RasterBuffer> {
        let thickness = params.number("thickness").round() as u32;
        let color = params.color("color");
        let (width, height) = (input.width, input.height);

        for y in 0..height {
            for x in 0..width {
                let in_border = x < thickness
                    || y < thickness
                    || x >= width.saturating_sub(thickness)
                    || y >= height.saturating_sub(thickness);
                if in_border {
                    input
                        .pixel_mut(x, y)
                        .copy_from_slice(&[color[0], color[1], color[2], 255]);
                }
            }
        }
        Ok(input)
    }
}
