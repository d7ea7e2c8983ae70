//! Seeded hash noise shared by the randomized effects. Everything here is
//! a pure function of its arguments, so identical seeds reproduce
//! identical images across runs and platforms.

/// 32-bit integer hash (Wang-style avalanche).
pub fn hash_u32(mut x: u32) -> u32 {
    x = (x ^ 61) ^ (x >> 16);
    x = x.wrapping_mul(9);
    x ^= x >> 4;
    x = x.wrapping_mul(0x27d4_eb2d);
    x ^= x >> 15;
    x
}

/// Hash of a 2D coordinate plus seed, mapped to [0, 1).
pub fn hash_f32(x: u32, y: u32, seed: u32) -> f32 {
    let h = hash_u32(
        x.wrapping_mul(0x9e37_79b9)
            ^ y.wrapping_mul(0x85eb_ca6b)
            ^ seed.wrapping_mul(0xc2b2_ae35),
    );
    (h >> 8) as f32 / (1u32 << 24) as f32
}

fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Value noise at fractional coordinates: lattice hashes blended with a
/// quintic fade. Output in [0, 1).
pub fn value_noise(fx: f32, fy: f32, seed: u32) -> f32 {
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fade(fx - x0);
    let ty = fade(fy - y0);
    let xi = x0 as i64 as u32;
    let yi = y0 as i64 as u32;

    let n00 = hash_f32(xi, yi, seed);
    let n10 = hash_f32(xi.wrapping_add(1), yi, seed);
    let n01 = hash_f32(xi, yi.wrapping_add(1), seed);
    let n11 = hash_f32(xi.wrapping_add(1), yi.wrapping_add(1), seed);

    let top = n00 + (n10 - n00) * tx;
    let bottom = n01 + (n11 - n01) * tx;
    top + (bottom - top) * ty
}
