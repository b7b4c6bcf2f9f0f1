// this_file: crates/wmark-input/tests/discovery.rs

use std::fs;
use std::path::{Path, PathBuf};

use wmark_input::{capture_date, discover_images};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("wmark-input-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// A JPEG stream holding only an EXIF block with DateTimeOriginal
fn jpeg_with_capture_date(stamp: &[u8; 19]) -> Vec<u8> {
    let mut tiff = Vec::new();
    // Big-endian header, IFD0 at offset 8
    tiff.extend_from_slice(&[0x4D, 0x4D, 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08]);
    // IFD0: one entry pointing at the Exif IFD (offset 26)
    tiff.extend_from_slice(&[0x00, 0x01]);
    tiff.extend_from_slice(&[0x87, 0x69, 0x00, 0x04, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x1A]);
    tiff.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    // Exif IFD: DateTimeOriginal, ASCII, 20 bytes at offset 44
    tiff.extend_from_slice(&[0x00, 0x01]);
    tiff.extend_from_slice(&[0x90, 0x03, 0x00, 0x02, 0x00, 0x00, 0x00, 0x14, 0x00, 0x00, 0x00, 0x2C]);
    tiff.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    tiff.extend_from_slice(stamp);
    tiff.push(0);
    assert_eq!(tiff.len(), 64);

    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    let segment_len = (2 + 6 + tiff.len()) as u16;
    jpeg.extend_from_slice(&segment_len.to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(&tiff);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}

#[test]
fn test_discover_when_directory_then_supported_files_sorted() {
    let dir = scratch_dir("dir");
    for name in ["b.jpg", "a.PNG", "c.txt", "d.tiff", "e.jpeg.bak"] {
        fs::write(dir.join(name), b"x").unwrap();
    }
    // Directories are skipped even with an image-like name
    fs::create_dir_all(dir.join("nested.png")).unwrap();
    fs::write(dir.join("nested.png").join("deep.png"), b"x").unwrap();

    let found = discover_images(&dir).unwrap();
    let names: Vec<_> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["a.PNG", "b.jpg", "d.tiff"]);
}

#[test]
fn test_discover_when_file_then_itself() {
    let dir = scratch_dir("file");
    let file = dir.join("whatever.dat");
    fs::write(&file, b"x").unwrap();

    assert_eq!(discover_images(&file).unwrap(), vec![file]);
}

#[test]
fn test_discover_when_missing_then_error() {
    assert!(discover_images(Path::new("/definitely/not/here")).is_err());
}

#[test]
fn test_capture_date_when_exif_present_then_exif_wins() {
    let dir = scratch_dir("exif");
    let file = dir.join("photo.jpg");
    fs::write(&file, jpeg_with_capture_date(b"2021:03:04 05:06:07")).unwrap();

    assert_eq!(capture_date(&file), "2021-03-04");
}

#[test]
fn test_capture_date_when_no_exif_then_modification_time() {
    let dir = scratch_dir("mtime");
    let file = dir.join("plain.png");
    fs::write(&file, b"not really a png").unwrap();

    let modified = fs::metadata(&file).unwrap().modified().unwrap();
    let expected = chrono::DateTime::<chrono::Local>::from(modified)
        .format("%Y-%m-%d")
        .to_string();
    assert_eq!(capture_date(&file), expected);
}

#[test]
fn test_open_image_when_corrupt_then_decode_error() {
    let dir = scratch_dir("corrupt");
    let file = dir.join("broken.jpg");
    fs::write(&file, b"\xFF\xD8\xFF\xE0 this is not a jpeg").unwrap();

    let err = wmark_input::open_image(&file).unwrap_err();
    assert!(matches!(err, wmark_core::WmarkError::Decode { .. }), "{}", err);
}

#[test]
fn test_open_image_when_png_then_decoded() {
    let dir = scratch_dir("png");
    let file = dir.join("tiny.png");
    image::RgbImage::new(3, 2).save(&file).unwrap();

    let img = wmark_input::open_image(&file).unwrap();
    assert_eq!((img.width(), img.height()), (3, 2));
}
