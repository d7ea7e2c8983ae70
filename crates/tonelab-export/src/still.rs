//! Still-image boundary: PNG encoding of a finished buffer and decoding
//! source images into raster buffers.

use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::ImageEncoder;
use tonelab_core::RasterBuffer;

use crate::error::{ExportError, Result};

/// Encode a buffer as PNG bytes. Fast compression profile; export speed
/// matters more than a few percent of file size here.
pub fn encode_still(buffer: &RasterBuffer) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut out, CompressionType::Fast, FilterType::NoFilter);
    encoder
        .write_image(
            &buffer.data,
            buffer.width,
            buffer.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| ExportError::Encoding(format!("png encode failed: {e}")))?;
    Ok(out)
}

/// Load an image file into an RGBA buffer. A failure here is fatal to
/// session start, so it surfaces as an error rather than a placeholder.
pub fn decode_image(path: &Path) -> Result<RasterBuffer> {
    let img = image::open(path)
        .map_err(|e| ExportError::Encoding(format!("failed to decode {}: {e}", path.display())))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(RasterBuffer::from_rgba_vec(width, height, img.into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_roundtrip_through_disk() {
        let mut buffer = RasterBuffer::filled(8, 6, [200, 40, 90]);
        buffer.pixel_mut(3, 2).copy_from_slice(&[0, 255, 0, 255]);

        let png = encode_still(&buffer).unwrap();
        // PNG signature
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        std::fs::write(&path, &png).unwrap();

        let decoded = decode_image(&path).unwrap();
        assert_eq!(decoded, buffer);
    }

    #[test]
    fn test_decode_missing_file_is_error() {
        let err = decode_image(Path::new("/nonexistent/picture.png")).unwrap_err();
        assert!(matches!(err, ExportError::Encoding(_)));
    }
}
