//! Neighborhood filters: unsharp-mask sharpening and bilateral noise
//! reduction. Both clamp out-of-canvas sampling to the nearest edge pixel.

use rayon::prelude::*;

use crate::buffer::RasterBuffer;
use crate::effect::{EffectCategory, PixelEffect};
use crate::error::Result;
use crate::params::{ParameterSpec, ResolvedParams};

/// Unsharp mask: amplify the difference between each pixel and its box
/// local average. Uniform regions are untouched. Preserves alpha.
pub struct Sharpen;

impl PixelEffect for Sharpen {
    fn id(&self) -> &str {
        "sharpen"
    }

    fn display_name(&self) -> &str {
        "Sharpen"
    }

    fn category(&self) -> EffectCategory {
        EffectCategory::Technical
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::slider("amount", "Amount", 0.0, 100.0, 1.0, 50.0),
            ParameterSpec::slider("radius", "Radius", 1.0, 10.0, 1.0, 2.0),
        ]
    }

    fn apply(&self, input: RasterBuffer, params: &ResolvedParams) -> Result<RasterBuffer> {
        let strength = (params.number("amount") / 100.0 * 1.5) as f32;
        let radius = params.number("radius").round() as i32;

        let mut output = input.clone();
        let row_bytes = output.row_bytes();
        output
            .data
            .par_chunks_exact_mut(row_bytes)
            .enumerate()
            .for_each(|(y, row)| {
                let y = y as i32;
                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let x = x as i32;
                    let mut avg = [0.0f32; 3];
                    let mut count = 0.0f32;
                    for dy in -radius..=radius {
                        for dx in -radius..=radius {
                            let p = input.sample_clamped(x + dx, y + dy);
                            for c in 0..3 {
                                avg[c] += p[c] as f32;
                            }
                            count += 1.0;
                        }
                    }
                    for c in 0..3 {
                        let base = pixel[c] as f32;
                        let sharpened = base + (base - avg[c] / count) * strength;
                        pixel[c] = sharpened.round().clamp(0.0, 255.0) as u8;
                    }
                }
            });
        Ok(output)
    }

    fn is_identity(&self, params: &ResolvedParams) -> bool {
        params.number("amount") == 0.0
    }
}

/// Bilateral smoothing: neighbors are averaged with weights that fall off
/// both with spatial distance and with color difference, so flat noise
/// averages out while edges survive. Preserves alpha.
pub struct NoiseReduction;

impl PixelEffect for NoiseReduction {
    fn id(&self) -> &str {
        "noise_reduction"
    }

    fn display_name(&self) -> &str {
        "Noise Reduction"
    }

    fn category(&self) -> EffectCategory {
        EffectCategory::Technical
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::slider("strength", "Strength", 0.0, 100.0, 1.0, 30.0),
            ParameterSpec::slider("radius", "Radius", 1.0, 5.0, 1.0, 2.0),
        ]
    }

    fn apply(&self, input: RasterBuffer, params: &ResolvedParams) -> Result<RasterBuffer> {
        let strength = params.number("strength") as f32;
        let radius = params.number("radius").round() as i32;

        let sigma_spatial = radius as f32;
        let sigma_range = strength / 100.0 * 75.0 + 5.0;
        let spatial_norm = -1.0 / (2.0 * sigma_spatial * sigma_spatial);
        let range_norm = -1.0 / (2.0 * sigma_range * sigma_range);

        let mut output = input.clone();
        let row_bytes = output.row_bytes();
        output
            .data
            .par_chunks_exact_mut(row_bytes)
            .enumerate()
            .for_each(|(y, row)| {
                let y = y as i32;
                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let x = x as i32;
                    let center = [pixel[0] as f32, pixel[1] as f32, pixel[2] as f32];
                    let mut acc = [0.0f32; 3];
                    let mut total_weight = 0.0f32;

                    for dy in -radius..=radius {
                        for dx in -radius..=radius {
                            let p = input.sample_clamped(x + dx, y + dy);
                            let mut color_dist2 = 0.0f32;
                            for c in 0..3 {
                                let d = p[c] as f32 - center[c];
                                color_dist2 += d * d;
                            }
                            let spatial2 = (dx * dx + dy * dy) as f32;
                            let weight =
                                (spatial2 * spatial_norm + color_dist2 * range_norm).exp();
                            for c in 0..3 {
                                acc[c] += p[c] as f32 * weight;
                            }
                            total_weight += weight;
                        }
                    }
                    for c in 0..3 {
                        pixel[c] = (acc[c] / total_weight).round().clamp(0.0, 255.0) as u8;
                    }
                }
            });
        Ok(output)
    }

    fn is_identity(&self, params: &ResolvedParams) -> bool {
        params.number("strength") == 0.0
    }
}
