//! Writing watermarked images to disk
//!
//! The format follows the destination's extension. JPEG drops the alpha
//! channel the rotated path may have added and is written at quality 95.
//! Extensions this build cannot encode fall back to PNG bytes.

use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

use image::{codecs::jpeg::JpegEncoder, DynamicImage, ImageFormat};
use wmark_core::error::{ExportError, Result};

pub mod naming;

pub use naming::{output_path, NamingRule, OutputFormat, DEFAULT_PREFIX, DEFAULT_SUFFIX};

/// JPEG quality used for every export
pub const JPEG_QUALITY: u8 = 95;

/// Format written for `path`
pub fn target_format(path: &Path) -> ImageFormat {
    match ImageFormat::from_path(path) {
        Ok(format @ (ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Bmp | ImageFormat::Tiff)) => {
            format
        },
        _ => ImageFormat::Png,
    }
}

/// Encodes `image` as `format` into `writer`
pub fn encode<W: Write + Seek>(image: &DynamicImage, format: ImageFormat, writer: &mut W) -> Result<()> {
    let result = match format {
        ImageFormat::Jpeg => {
            let flat = DynamicImage::ImageRgb8(image.to_rgb8());
            flat.write_with_encoder(JpegEncoder::new_with_quality(writer, JPEG_QUALITY))
        },
        other => image.write_to(writer, other),
    };
    result.map_err(|e| ExportError::EncodingFailed(format!("{:?}: {}", format, e)).into())
}

/// Encodes into memory
pub fn encode_to_vec(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    encode(image, format, &mut cursor)?;
    Ok(cursor.into_inner())
}

/// Writes `image` to `path`, replacing any existing file
pub fn save(image: &DynamicImage, path: &Path) -> Result<()> {
    let format = target_format(path);
    let write_failed = |e: std::io::Error| ExportError::WriteFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let file = File::create(path).map_err(write_failed)?;
    let mut writer = BufWriter::new(file);
    encode(image, format, &mut writer)?;
    writer.flush().map_err(write_failed)?;

    log::debug!("Wrote {} as {:?}", path.display(), format);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_format_by_extension() {
        assert_eq!(target_format(Path::new("a.JPG")), ImageFormat::Jpeg);
        assert_eq!(target_format(Path::new("a.jpeg")), ImageFormat::Jpeg);
        assert_eq!(target_format(Path::new("a.tif")), ImageFormat::Tiff);
        assert_eq!(target_format(Path::new("a.bmp")), ImageFormat::Bmp);
        assert_eq!(target_format(Path::new("a.webp")), ImageFormat::Png);
        assert_eq!(target_format(Path::new("a")), ImageFormat::Png);
    }

    #[test]
    fn test_jpeg_flattens_alpha() {
        let rgba = DynamicImage::new_rgba8(8, 8);
        let bytes = encode_to_vec(&rgba, ImageFormat::Jpeg).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap();
        assert!(!decoded.color().has_alpha());
    }

    #[test]
    fn test_png_keeps_alpha() {
        let rgba = DynamicImage::new_rgba8(3, 2);
        let bytes = encode_to_vec(&rgba, ImageFormat::Png).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(decoded.color().has_alpha());
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }
}
