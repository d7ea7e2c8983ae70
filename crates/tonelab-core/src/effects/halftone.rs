use rayon::prelude::*;

use crate::buffer::RasterBuffer;
use crate::colorspace::luminance;
use crate::effect::{EffectCategory, PixelEffect};
use crate::error::Result;
use crate::params::{ParameterSpec, ResolvedParams};

/// 4x4 Bayer threshold matrix, divided by 17 at use.
const BAYER_4X4: [[f32; 4]; 4] = [
    [1.0, 9.0, 3.0, 11.0],
    [13.0, 5.0, 15.0, 7.0],
    [4.0, 12.0, 2.0, 10.0],
    [16.0, 8.0, 14.0, 6.0],
];

/// Print-style halftoning: dark marks on a white page, one mark per grid
/// cell, sized by the cell's average darkness. Marks rotate about their
/// own cell centers, never the image origin. Preserves alpha.
pub struct Halftone;

impl PixelEffect for Halftone {
    fn id(&self) -> &str {
        "halftone"
    }

    fn display_name(&self) -> &str {
        "Halftone"
    }

    fn category(&self) -> EffectCategory {
        EffectCategory::Artistic
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::slider("spacing", "Spacing", 2.0, 64.0, 1.0, 8.0),
            ParameterSpec::slider("dot_size", "Dot Size", 1.0, 64.0, 1.0, 6.0),
            ParameterSpec::select(
                "shape",
                "Shape",
                &[("dot", "Dot"), ("square", "Square"), ("line", "Line")],
                "dot",
            ),
            ParameterSpec::slider("angle", "Angle", 0.0, 180.0, 1.0, 0.0),
            ParameterSpec::checkbox("ordered_dither", "Ordered Dither", false),
        ]
    }

    fn apply(&self, input: RasterBuffer, params: &ResolvedParams) -> Result<RasterBuffer> {
        let spacing = params.number("spacing").round().max(2.0) as u32;
        let dot_size = params.number("dot_size") as f32;
        let shape = params.choice("shape").to_string();
        let angle = (params.number("angle") as f32).to_radians();
        let dither = params.flag("ordered_dither");

        let (width, height) = (input.width, input.height);
        let cells_x = width.div_ceil(spacing) as usize;
        let cells_y = height.div_ceil(spacing) as usize;

        // Pass 1: average gray per grid cell, partial edge cells included.
        let mut sums = vec![0.0f32; cells_x * cells_y];
        let mut counts = vec![0u32; cells_x * cells_y];
        for y in 0..height {
            for x in 0..width {
                let p = input.pixel(x, y);
                let cell = (y / spacing) as usize * cells_x + (x / spacing) as usize;
                sums[cell] += luminance(p[0], p[1], p[2]) / 255.0;
                counts[cell] += 1;
            }
        }
        let grays: Vec<f32> = sums
            .iter()
            .zip(&counts)
            .map(|(s, c)| {
                let g = s / (*c).max(1) as f32;
                g.clamp(0.0, 1.0)
            })
            .collect();

        // Pass 2: mark test per output pixel.
        let mut output = RasterBuffer::new(width, height);
        let row_bytes = output.row_bytes();
        let (sin_a, cos_a) = angle.sin_cos();
        output
            .data
            .par_chunks_exact_mut(row_bytes)
            .enumerate()
            .for_each(|(y, row)| {
                let y = y as u32;
                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let x = x as u32;
                    let cell_x = x / spacing;
                    let cell_y = y / spacing;
                    let mut gray = grays[cell_y as usize * cells_x + cell_x as usize];
                    if dither {
                        let threshold =
                            BAYER_4X4[(cell_y % 4) as usize][(cell_x % 4) as usize] / 17.0;
                        gray = if gray <= threshold { 0.0 } else { 1.0 };
                    }
                    let size = dot_size * (1.0 - gray);

                    // Local coordinates rotated about the cell center.
                    let center_x = (cell_x * spacing) as f32 + spacing as f32 / 2.0;
                    let center_y = (cell_y * spacing) as f32 + spacing as f32 / 2.0;
                    let dx = x as f32 + 0.5 - center_x;
                    let dy = y as f32 + 0.5 - center_y;
                    let rx = dx * cos_a + dy * sin_a;
                    let ry = -dx * sin_a + dy * cos_a;

                    // size 0 draws nothing, so a zero offset at a cell
                    // center must not mark.
                    let marked = size > 0.0
                        && match shape.as_str() {
                            "square" => rx.abs() <= size && ry.abs() <= size,
                            "line" => ry.abs() <= size / 2.0,
                            _ => rx * rx + ry * ry <= size * size,
                        };

                    let v = if marked { 0 } else { 255 };
                    pixel[0] = v;
                    pixel[1] = v;
                    pixel[2] = v;
                    pixel[3] = input.pixel(x, y)[3];
                }
            });
        Ok(output)
    }
}
