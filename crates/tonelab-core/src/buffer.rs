use serde::{Deserialize, Serialize};

/// An owned RGBA pixel buffer. 4 bytes per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RasterBuffer {
    /// Create a new transparent black buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width * height * 4) as usize],
        }
    }

    /// Create a buffer filled with a single opaque color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let mut buf = Self::new(width, height);
        for pixel in buf.data.chunks_exact_mut(4) {
            pixel[0] = rgb[0];
            pixel[1] = rgb[1];
            pixel[2] = rgb[2];
            pixel[3] = 255;
        }
        buf
    }

    /// Create from existing RGBA data. Panics if data length doesn't match dimensions.
    pub fn from_rgba_vec(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 4) as usize,
            "RGBA data length {} doesn't match {}x{}x4={}",
            data.len(),
            width,
            height,
            width * height * 4
        );
        Self {
            width,
            height,
            data,
        }
    }

    /// Get pixel RGBA at (x, y). Panics if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let idx = ((y * self.width + x) * 4) as usize;
        &self.data[idx..idx + 4]
    }

    /// Get mutable pixel RGBA at (x, y). Panics if out of bounds.
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let idx = ((y * self.width + x) * 4) as usize;
        &mut self.data[idx..idx + 4]
    }

    /// Edge-clamped pixel read: out-of-canvas coordinates snap to the
    /// nearest valid pixel, never wrap.
    pub fn sample_clamped(&self, x: i32, y: i32) -> [u8; 4] {
        let cx = x.clamp(0, self.width as i32 - 1) as u32;
        let cy = y.clamp(0, self.height as i32 - 1) as u32;
        let p = self.pixel(cx, cy);
        [p[0], p[1], p[2], p[3]]
    }

    /// Bilinear sample at fractional coordinates, edge-clamped.
    pub fn sample_bilinear(&self, fx: f32, fy: f32) -> [f32; 4] {
        let x0 = fx.floor() as i32;
        let y0 = fy.floor() as i32;
        let dx = fx - x0 as f32;
        let dy = fy - y0 as f32;

        let p00 = self.sample_clamped(x0, y0);
        let p10 = self.sample_clamped(x0 + 1, y0);
        let p01 = self.sample_clamped(x0, y0 + 1);
        let p11 = self.sample_clamped(x0 + 1, y0 + 1);

        let mut out = [0.0f32; 4];
        for c in 0..4 {
            out[c] = p00[c] as f32 * (1.0 - dx) * (1.0 - dy)
                + p10[c] as f32 * dx * (1.0 - dy)
                + p01[c] as f32 * (1.0 - dx) * dy
                + p11[c] as f32 * dx * dy;
        }
        out
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// Bytes per row.
    pub fn row_bytes(&self) -> usize {
        self.width as usize * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_transparent_black() {
        let buf = RasterBuffer::new(4, 3);
        assert_eq!(buf.width, 4);
        assert_eq!(buf.height, 3);
        assert_eq!(buf.data.len(), 4 * 3 * 4);
        assert!(buf.data.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_filled() {
        let buf = RasterBuffer::filled(2, 2, [10, 20, 30]);
        assert_eq!(buf.pixel(1, 1), &[10, 20, 30, 255]);
    }

    #[test]
    fn test_pixel_access() {
        let mut buf = RasterBuffer::new(4, 4);
        buf.pixel_mut(2, 1).copy_from_slice(&[255, 128, 64, 255]);
        assert_eq!(buf.pixel(2, 1), &[255, 128, 64, 255]);
    }

    #[test]
    fn test_from_rgba_vec() {
        let data = vec![255, 0, 0, 255, 0, 255, 0, 255];
        let buf = RasterBuffer::from_rgba_vec(2, 1, data);
        assert_eq!(buf.pixel(0, 0), &[255, 0, 0, 255]);
        assert_eq!(buf.pixel(1, 0), &[0, 255, 0, 255]);
    }

    #[test]
    #[should_panic(expected = "RGBA data length")]
    fn test_from_rgba_vec_wrong_size() {
        RasterBuffer::from_rgba_vec(2, 2, vec![0; 10]);
    }

    #[test]
    fn test_sample_clamped_edges() {
        let mut buf = RasterBuffer::new(2, 2);
        buf.pixel_mut(0, 0).copy_from_slice(&[9, 8, 7, 255]);
        buf.pixel_mut(1, 1).copy_from_slice(&[1, 2, 3, 255]);
        assert_eq!(buf.sample_clamped(-5, -5), [9, 8, 7, 255]);
        assert_eq!(buf.sample_clamped(10, 10), [1, 2, 3, 255]);
    }

    #[test]
    fn test_sample_bilinear_midpoint() {
        let mut buf = RasterBuffer::new(2, 1);
        buf.pixel_mut(0, 0).copy_from_slice(&[0, 0, 0, 255]);
        buf.pixel_mut(1, 0).copy_from_slice(&[100, 0, 0, 255]);
        let s = buf.sample_bilinear(0.5, 0.0);
        assert!((s[0] - 50.0).abs() < 0.01);
        assert!((s[3] - 255.0).abs() < 0.01);
    }
}
