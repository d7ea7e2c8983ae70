use tonelab_core::RasterBuffer;

/// Assert two buffers match exactly, reporting the first differing pixel.
pub fn assert_buffers_equal(actual: &RasterBuffer, expected: &RasterBuffer) {
    assert_dims(actual, expected.width, expected.height);
    for y in 0..expected.height {
        for x in 0..expected.width {
            assert_eq!(
                actual.pixel(x, y),
                expected.pixel(x, y),
                "first mismatch at ({x}, {y})"
            );
        }
    }
}

/// Assert a buffer has the expected dimensions.
pub fn assert_dims(buffer: &RasterBuffer, width: u32, height: u32) {
    assert_eq!(
        (buffer.width, buffer.height),
        (width, height),
        "buffer is {}x{}, expected {width}x{height}",
        buffer.width,
        buffer.height
    );
}

/// Assert no channel differs by more than `tolerance` between two buffers.
pub fn assert_max_channel_delta(actual: &RasterBuffer, expected: &RasterBuffer, tolerance: u8) {
    assert_dims(actual, expected.width, expected.height);
    for (i, (a, e)) in actual.data.iter().zip(&expected.data).enumerate() {
        let delta = (*a as i16 - *e as i16).unsigned_abs();
        assert!(
            delta <= tolerance as u16,
            "byte {i} differs by {delta} (got {a}, expected {e}, tolerance {tolerance})"
        );
    }
}

/// Assert an effect left the alpha channel exactly as it was.
pub fn assert_alpha_preserved(output: &RasterBuffer, input: &RasterBuffer) {
    assert_dims(output, input.width, input.height);
    for y in 0..input.height {
        for x in 0..input.width {
            assert_eq!(
                output.pixel(x, y)[3],
                input.pixel(x, y)[3],
                "alpha changed at ({x}, {y})"
            );
        }
    }
}
