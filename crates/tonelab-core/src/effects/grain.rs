//! Seeded procedural perturbation effects: film grain and row-band glitch.
//! Both are pure functions of (buffer, params), so a fixed seed replays to
//! the exact same bytes.

use rayon::prelude::*;

use crate::buffer::RasterBuffer;
use crate::effect::{EffectCategory, PixelEffect};
use crate::effects::noise::{hash_f32, value_noise};
use crate::error::Result;
use crate::params::{ParameterSpec, ResolvedParams};

/// Additive noise, either hard per-block hash grain or smooth value noise.
/// Monochrome mode applies one offset to all three channels. Preserves
/// alpha.
pub struct FilmGrain;

impl PixelEffect for FilmGrain {
    fn id(&self) -> &str {
        "film_grain"
    }

    fn display_name(&self) -> &str {
        "Film Grain"
    }

    fn category(&self) -> EffectCategory {
        EffectCategory::Artistic
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::slider("amount", "Amount", 0.0, 100.0, 1.0, 30.0),
            ParameterSpec::slider("size", "Size", 1.0, 8.0, 1.0, 1.0),
            ParameterSpec::checkbox("smooth", "Smooth", false),
            ParameterSpec::checkbox("monochrome", "Monochrome", true),
            ParameterSpec::slider("seed", "Seed", 0.0, 9999.0, 1.0, 0.0),
        ]
    }

    fn apply(&self, mut input: RasterBuffer, params: &ResolvedParams) -> Result<RasterBuffer> {
        let amplitude = (params.number("amount") / 100.0 * 64.0) as f32;
        let size = params.number("size").round().max(1.0) as u32;
        let smooth = params.flag("smooth");
        let monochrome = params.flag("monochrome");
        let seed = params.number("seed") as u32;

        let grain_at = move |x: u32, y: u32, channel: u32| -> f32 {
            let channel_seed = seed.wrapping_add(channel.wrapping_mul(0x5151_7d3b));
            let n = if smooth {
                value_noise(x as f32 / size as f32, y as f32 / size as f32, channel_seed)
            } else {
                hash_f32(x / size, y / size, channel_seed)
            };
            (n - 0.5) * 2.0 * amplitude
        };

        let row_bytes = input.row_bytes();
        input
            .data
            .par_chunks_exact_mut(row_bytes)
            .enumerate()
            .for_each(|(y, row)| {
                let y = y as u32;
                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let x = x as u32;
                    for c in 0..3u32 {
                        let offset = if monochrome {
                            grain_at(x, y, 0)
                        } else {
                            grain_at(x, y, c)
                        };
                        let v = pixel[c as usize] as f32 + offset;
                        pixel[c as usize] = v.round().clamp(0.0, 255.0) as u8;
                    }
                }
            });
        Ok(input)
    }

    fn is_identity(&self, params: &ResolvedParams) -> bool {
        params.number("amount") == 0.0
    }
}

/// Horizontal per-channel offsets applied to random row bands, the classic
/// RGB-split glitch. Band selection and offsets come from the seed.
pub struct Glitch;

impl PixelEffect for Glitch {
    fn id(&self) -> &str {
        "glitch"
    }

    fn display_name(&self) -> &str {
        "Glitch"
    }

    fn category(&self) -> EffectCategory {
        EffectCategory::Creative
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::slider("amount", "Amount", 0.0, 100.0, 1.0, 40.0),
            ParameterSpec::slider("band_height", "Band Height", 2.0, 64.0, 1.0, 12.0),
            ParameterSpec::slider("seed", "Seed", 0.0, 9999.0, 1.0, 0.0),
        ]
    }

    fn apply(&self, input: RasterBuffer, params: &ResolvedParams) -> Result<RasterBuffer> {
        let amount = (params.number("amount") / 100.0) as f32;
        let band_height = params.number("band_height").round().max(2.0) as u32;
        let seed = params.number("seed") as u32;

        let width = input.width;
        let max_shift = (amount * width as f32 * 0.1).max(1.0);

        let mut output = input.clone();
        let row_bytes = output.row_bytes();
        output
            .data
            .par_chunks_exact_mut(row_bytes)
            .enumerate()
            .for_each(|(y, row)| {
                let band = y as u32 / band_height;
                // Only a fraction of bands glitch, scaling with amount.
                if hash_f32(band, 0, seed) >= amount {
                    return;
                }
                let shifts: [i32; 3] = std::array::from_fn(|c| {
                    ((hash_f32(band, c as u32 + 1, seed) - 0.5) * 2.0 * max_shift).round() as i32
                });
                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    for c in 0..3 {
                        let src = input.sample_clamped(x as i32 + shifts[c], y as i32);
                        pixel[c] = src[c];
                    }
                }
            });
        Ok(output)
    }

    fn is_identity(&self, params: &ResolvedParams) -> bool {
        params.number("amount") == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{resolve_params, ParamValue};

    fn grain_params(supplied: &[(&str, ParamValue)]) -> ResolvedParams {
        let supplied: Vec<(String, ParamValue)> = supplied
            .iter()
            .map(|(id, v)| (id.to_string(), v.clone()))
            .collect();
        resolve_params(&FilmGrain.parameters(), &supplied)
    }

    fn glitch_params(supplied: &[(&str, f64)]) -> ResolvedParams {
        let supplied: Vec<(String, ParamValue)> = supplied
            .iter()
            .map(|(id, v)| (id.to_string(), ParamValue::Number(*v)))
            .collect();
        resolve_params(&Glitch.parameters(), &supplied)
    }

    #[test]
    fn test_grain_same_seed_same_output() {
        let buf = RasterBuffer::filled(16, 16, [128, 128, 128]);
        let params = grain_params(&[("seed", ParamValue::Number(7.0))]);
        let a = FilmGrain.apply(buf.clone(), &params).unwrap();
        let b = FilmGrain.apply(buf, &params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_grain_different_seed_different_output() {
        let buf = RasterBuffer::filled(16, 16, [128, 128, 128]);
        let a = FilmGrain
            .apply(buf.clone(), &grain_params(&[("seed", ParamValue::Number(1.0))]))
            .unwrap();
        let b = FilmGrain
            .apply(buf, &grain_params(&[("seed", ParamValue::Number(2.0))]))
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_grain_monochrome_shifts_channels_together() {
        let buf = RasterBuffer::filled(8, 8, [128, 128, 128]);
        let out = FilmGrain.apply(buf, &grain_params(&[])).unwrap();
        for p in out.data.chunks_exact(4) {
            assert_eq!(p[0], p[1]);
            assert_eq!(p[1], p[2]);
        }
    }

    #[test]
    fn test_grain_color_mode_decouples_channels() {
        let buf = RasterBuffer::filled(16, 16, [128, 128, 128]);
        let out = FilmGrain
            .apply(
                buf,
                &grain_params(&[("monochrome", ParamValue::Bool(false))]),
            )
            .unwrap();
        assert!(out
            .data
            .chunks_exact(4)
            .any(|p| p[0] != p[1] || p[1] != p[2]));
    }

    #[test]
    fn test_grain_amount_scales_deviation() {
        let buf = RasterBuffer::filled(16, 16, [128, 128, 128]);
        let deviation = |amount: f64| {
            let out = FilmGrain
                .apply(
                    buf.clone(),
                    &grain_params(&[("amount", ParamValue::Number(amount))]),
                )
                .unwrap();
            out.data
                .chunks_exact(4)
                .map(|p| (p[0] as i32 - 128).unsigned_abs())
                .sum::<u32>()
        };
        assert!(deviation(80.0) > deviation(10.0));
    }

    #[test]
    fn test_grain_block_size_groups_pixels() {
        let buf = RasterBuffer::filled(16, 16, [128, 128, 128]);
        let out = FilmGrain
            .apply(buf, &grain_params(&[("size", ParamValue::Number(4.0))]))
            .unwrap();
        // Pixels within one 4x4 block share a hash, so they match.
        let anchor = out.pixel(0, 0)[0];
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(out.pixel(x, y)[0], anchor);
            }
        }
    }

    #[test]
    fn test_grain_preserves_alpha() {
        let buf = RasterBuffer::from_rgba_vec(2, 2, vec![128; 16]);
        let out = FilmGrain
            .apply(buf, &grain_params(&[("amount", ParamValue::Number(100.0))]))
            .unwrap();
        assert!(out.data.chunks_exact(4).all(|p| p[3] == 128));
    }

    #[test]
    fn test_glitch_same_seed_same_output() {
        let mut buf = RasterBuffer::new(32, 32);
        for y in 0..32 {
            for x in 0..32 {
                buf.pixel_mut(x, y)
                    .copy_from_slice(&[(x * 8) as u8, (y * 8) as u8, 100, 255]);
            }
        }
        let params = glitch_params(&[("seed", 3.0)]);
        let a = Glitch.apply(buf.clone(), &params).unwrap();
        let b = Glitch.apply(buf, &params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_glitch_displaces_some_band() {
        let mut buf = RasterBuffer::new(64, 64);
        for y in 0..64 {
            for x in 0..64 {
                buf.pixel_mut(x, y)
                    .copy_from_slice(&[(x * 4) as u8, 0, 0, 255]);
            }
        }
        let out = Glitch
            .apply(buf.clone(), &glitch_params(&[("amount", 100.0)]))
            .unwrap();
        assert_ne!(out.data, buf.data);
    }

    #[test]
    fn test_glitch_respects_band_boundaries() {
        // Rows inside one band share their channel shifts, so two rows of
        // the same band transform identically on uniform-per-row input.
        let mut buf = RasterBuffer::new(32, 32);
        for y in 0..32 {
            for x in 0..32 {
                buf.pixel_mut(x, y)
                    .copy_from_slice(&[(x * 8) as u8, (x * 8) as u8, (x * 8) as u8, 255]);
            }
        }
        let out = Glitch
            .apply(buf, &glitch_params(&[("amount", 100.0), ("band_height", 8.0)]))
            .unwrap();
        for band in 0..4u32 {
            let top = band * 8;
            for y in top..top + 8 {
                for x in 0..32 {
                    assert_eq!(out.pixel(x, y), out.pixel(x, top), "band {band} row {y}");
                }
            }
        }
    }

    #[test]
    fn test_glitch_preserves_alpha() {
        let buf = RasterBuffer::filled(16, 16, [200, 100, 50]);
        let out = Glitch
            .apply(buf, &glitch_params(&[("amount", 100.0)]))
            .unwrap();
        assert!(out.data.chunks_exact(4).all(|p| p[3] == 255));
    }
}
