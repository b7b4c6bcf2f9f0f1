//! What gets watermarked, and which date goes on it
//!
//! The first stage of a batch: turn the user's path into a list of image
//! files, and look up the capture date when the watermark text is the date.

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};
use wmark_core::error::{Result, WmarkError};

pub mod capture_date;

pub use capture_date::capture_date;

/// Extensions picked up when scanning a directory, lowercase, no dot
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff", "tif"];

/// Whether `path` has one of [`SUPPORTED_EXTENSIONS`], ignoring case
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Images to process for `path`
///
/// A file is returned as is, whatever its extension; the user named it.
/// A directory yields its supported regular files, not recursing, sorted by
/// name so runs are repeatable.
pub fn discover_images(path: &Path) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(path)?;
    if metadata.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut images = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let candidate = entry.path();
        if !is_supported(&candidate) {
            continue;
        }
        match entry.file_type() {
            Ok(kind) if kind.is_file() => images.push(candidate),
            // Follow symlinks to files
            Ok(kind) if kind.is_symlink() && candidate.is_file() => images.push(candidate),
            Ok(_) => {},
            Err(e) => log::warn!("Skipping {}: {}", candidate.display(), e),
        }
    }
    images.sort();

    log::info!("Found {} images in {}", images.len(), path.display());
    Ok(images)
}

/// Decodes the image at `path`, trusting its content over its extension
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    let decode_failed = |reason: String| WmarkError::Decode {
        path: path.to_path_buf(),
        reason,
    };

    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| decode_failed(e.to_string()))
}
