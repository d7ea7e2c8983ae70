//! Deterministic test images. Every fixture is a pure function of its
//! arguments, so tests comparing exact bytes stay stable.

use tonelab_core::RasterBuffer;

/// Horizontal red / vertical green gradient over a fixed blue, opaque.
pub fn gradient(width: u32, height: u32) -> RasterBuffer {
    let mut buf = RasterBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            buf.pixel_mut(x, y).copy_from_slice(&[r, g, 100, 255]);
        }
    }
    buf
}

/// Black/white checkerboard with the given cell size.
pub fn checkerboard(width: u32, height: u32, cell: u32) -> RasterBuffer {
    let cell = cell.max(1);
    let mut buf = RasterBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let v = if ((x / cell) + (y / cell)) % 2 == 0 { 255 } else { 0 };
            buf.pixel_mut(x, y).copy_from_slice(&[v, v, v, 255]);
        }
    }
    buf
}

/// Single opaque color.
pub fn uniform(width: u32, height: u32, rgb: [u8; 3]) -> RasterBuffer {
    RasterBuffer::filled(width, height, rgb)
}

/// Opaque 50% gray, the neutral input for tonal tests.
pub fn midgray(width: u32, height: u32) -> RasterBuffer {
    uniform(width, height, [128, 128, 128])
}

/// Get a temporary directory for test artifacts that persists for the test run.
pub fn fixture_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().expect("failed to create temp dir for fixtures")
}
