use image::{ImageError, ImageReader};
use std::path::Path;

use crate::config::VerifyDepth;

/// Check that the file at `path` is a decodable image.
///
/// The format is guessed from the file contents first and from the extension
/// second. With [`VerifyDepth::Header`] only the header and dimensions are
/// read; with [`VerifyDepth::Full`] the whole pixel stream is decoded.
pub fn verify_image(path: &Path, depth: VerifyDepth) -> Result<(), ImageError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    match depth {
        VerifyDepth::Header => {
            reader.into_dimensions()?;
        }
        VerifyDepth::Full => {
            reader.decode()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::fs;

    fn write_png(path: &Path) {
        RgbImage::from_pixel(4, 4, image::Rgb([200, 10, 10]))
            .save_with_format(path, ImageFormat::Png)
            .unwrap();
    }

    #[test]
    fn test_valid_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.png");
        write_png(&path);

        assert!(verify_image(&path, VerifyDepth::Header).is_ok());
        assert!(verify_image(&path, VerifyDepth::Full).is_ok());
    }

    #[test]
    fn test_garbage_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jpg");
        fs::write(&path, b"definitely not a jpeg").unwrap();

        assert!(verify_image(&path, VerifyDepth::Header).is_err());
        assert!(verify_image(&path, VerifyDepth::Full).is_err());
    }

    #[test]
    fn test_truncated_png_only_fails_full_decode() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.png");
        RgbImage::from_fn(64, 64, |x, y| {
            image::Rgb([(x * 7 + y * 13) as u8, (x * y) as u8, (x ^ y) as u8])
        })
        .save_with_format(&source, ImageFormat::Png)
        .unwrap();
        let bytes = fs::read(&source).unwrap();

        // Header chunks survive, the pixel stream is cut in half
        let truncated = dir.path().join("truncated.png");
        fs::write(&truncated, &bytes[..bytes.len() / 2]).unwrap();

        assert!(verify_image(&truncated, VerifyDepth::Header).is_ok());
        assert!(verify_image(&truncated, VerifyDepth::Full).is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(verify_image(&dir.path().join("gone.png"), VerifyDepth::Full).is_err());
    }
}
