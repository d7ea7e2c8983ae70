use rayon::prelude::*;

use crate::buffer::RasterBuffer;
use crate::effect::{EffectCategory, PixelEffect};
use crate::error::Result;
use crate::params::{ParameterSpec, ResolvedParams};

/// Neighborhood radius for the dark-channel estimate.
const PATCH_RADIUS: i32 = 3;

/// Transmission never drops below this, so dense haze regions cannot blow
/// out to pure noise.
const TRANSMISSION_FLOOR: f32 = 0.1;

/// Dark-channel-prior haze removal. Atmospheric light is the per-channel
/// image maximum; strength scales how much of the estimated haze veil is
/// subtracted. Preserves alpha.
pub struct Dehaze;

impl PixelEffect for Dehaze {
    fn id(&self) -> &str {
        "dehaze"
    }

    fn display_name(&self) -> &str {
        "Dehaze"
    }

    fn category(&self) -> EffectCategory {
        EffectCategory::Technical
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![ParameterSpec::slider(
            "strength", "Strength", 0.0, 100.0, 1.0, 50.0,
        )]
    }

    fn apply(&self, input: RasterBuffer, params: &ResolvedParams) -> Result<RasterBuffer> {
        let omega = (params.number("strength") / 100.0 * 0.95) as f32;

        // Atmospheric light: per-channel maximum over the whole image.
        let mut atmosphere = [1.0f32; 3];
        for p in input.data.chunks_exact(4) {
            for c in 0..3 {
                atmosphere[c] = atmosphere[c].max(p[c] as f32);
            }
        }

        // Dark channel: minimum normalized channel value over a patch.
        let dark_at = |x: i32, y: i32| -> f32 {
            let mut dark = f32::MAX;
            for dy in -PATCH_RADIUS..=PATCH_RADIUS {
                for dx in -PATCH_RADIUS..=PATCH_RADIUS {
                    let p = input.sample_clamped(x + dx, y + dy);
                    for c in 0..3 {
                        dark = dark.min(p[c] as f32 / atmosphere[c]);
                    }
                }
            }
            dark
        };

        let mut output = input.clone();
        let row_bytes = output.row_bytes();
        output
            .data
            .par_chunks_exact_mut(row_bytes)
            .enumerate()
            .for_each(|(y, row)| {
                let y = y as i32;
                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let transmission =
                        (1.0 - omega * dark_at(x as i32, y)).max(TRANSMISSION_FLOOR);
                    for c in 0..3 {
                        let observed = pixel[c] as f32;
                        let recovered =
                            (observed - atmosphere[c]) / transmission + atmosphere[c];
                        pixel[c] = recovered.round().clamp(0.0, 255.0) as u8;
                    }
                }
            });
        Ok(output)
    }

    fn is_identity(&self, params: &ResolvedParams) -> bool {
        params.number("strength") == 0.0
    }
}
