//! RGB/HSL conversions and luminance, shared by the color effects.

/// Rec. 601 luma from 8-bit channels, in 0.0..=255.0.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

/// Convert RGB (0.0-1.0) to HSL. Hue in degrees 0-360, s and l in 0.0-1.0.
#[inline]
pub fn rgb_to_hsl(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if (max - min).abs() < 1e-6 {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if (max - r).abs() < 1e-6 {
        let mut h = (g - b) / d;
        if g < b {
            h += 6.0;
        }
        h * 60.0
    } else if (max - g).abs() < 1e-6 {
        ((b - r) / d + 2.0) * 60.0
    } else {
        ((r - g) / d + 4.0) * 60.0
    };

    (h, s, l)
}

/// Convert HSL back to RGB (all components 0.0-1.0, hue in degrees).
#[inline]
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    if s.abs() < 1e-6 {
        return (l, l, l);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;
    let h_norm = h / 360.0;

    fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 0.5 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    (
        hue_to_rgb(p, q, h_norm + 1.0 / 3.0),
        hue_to_rgb(p, q, h_norm),
        hue_to_rgb(p, q, h_norm - 1.0 / 3.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(r: f32, g: f32, b: f32) {
        let (h, s, l) = rgb_to_hsl(r, g, b);
        let (r2, g2, b2) = hsl_to_rgb(h, s, l);
        assert!((r - r2).abs() < 1e-4, "r {r} != {r2}");
        assert!((g - g2).abs() < 1e-4, "g {g} != {g2}");
        assert!((b - b2).abs() < 1e-4, "b {b} != {b2}");
    }

    #[test]
    fn test_hsl_roundtrip() {
        roundtrip(1.0, 0.0, 0.0);
        roundtrip(0.0, 1.0, 0.0);
        roundtrip(0.0, 0.0, 1.0);
        roundtrip(0.5, 0.25, 0.75);
        roundtrip(0.2, 0.2, 0.2);
    }

    #[test]
    fn test_gray_has_zero_saturation() {
        let (_, s, l) = rgb_to_hsl(0.5, 0.5, 0.5);
        assert!(s.abs() < 1e-6);
        assert!((l - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_luminance_rec601() {
        // 0.299 * 255 = 76.245
        assert!((luminance(255, 0, 0) - 76.245).abs() < 0.01);
        assert!((luminance(0, 255, 0) - 149.685).abs() < 0.01);
        assert!((luminance(255, 255, 255) - 255.0).abs() < 0.01);
    }
}
