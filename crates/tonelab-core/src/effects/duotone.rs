use rayon::prelude::*;

use crate::buffer::RasterBuffer;
use crate::colorspace::luminance;
use crate::effect::{EffectCategory, PixelEffect};
use crate::error::Result;
use crate::params::{ParameterSpec, ResolvedParams};

/// Maps luminance onto a two-color gradient between a shadow and a
/// highlight color. Intensity shapes the gradient exponent; 50 is the
/// straight linear mapping. Preserves alpha.
pub struct Duotone;

impl PixelEffect for Duotone {
    fn id(&self) -> &str {
        "duotone"
    }

    fn display_name(&self) -> &str {
        "Duotone"
    }

    fn category(&self) -> EffectCategory {
        EffectCategory::Artistic
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::color("shadow_color", "Shadows", [25, 25, 112]),
            ParameterSpec::color("highlight_color", "Highlights", [255, 245, 200]),
            ParameterSpec::slider("intensity", "Intensity", 0.0, 100.0, 1.0, 50.0),
        ]
    }

    fn apply(&self, mut input: RasterBuffer, params: &ResolvedParams) -> Result<RasterBuffer> {
        let shadow = params.color("shadow_color");
        let highlight = params.color("highlight_color");
        let exponent = (params.number("intensity") / 50.0 * 0.8 + 0.6) as f32;

        let row_bytes = input.row_bytes();
        input.data.par_chunks_exact_mut(row_bytes).for_each(|row| {
            for pixel in row.chunks_exact_mut(4) {
                let g = luminance(pixel[0], pixel[1], pixel[2]) / 255.0;
                let g = g.powf(exponent);
                for c in 0..3 {
                    let mixed = (1.0 - g) * shadow[c] as f32 + g * highlight[c] as f32;
                    pixel[c] = mixed.round().clamp(0.0, 255.0) as u8;
                }
            }
        });
        Ok(input)
    }
}
