// this_file: crates/wmark-export/tests/save.rs

use std::path::PathBuf;

use image::{DynamicImage, Rgba, RgbaImage};
use wmark_export::{output_path, save, NamingRule, OutputFormat};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("wmark-export-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn sample() -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(12, 9, Rgba([200, 40, 40, 128])))
}

#[test]
fn test_save_when_jpeg_then_rgb_on_disk() {
    let dir = scratch_dir("jpeg");
    let path = output_path(
        &dir.join("in.png"),
        &dir,
        &NamingRule::Suffix("_watermark".into()),
        OutputFormat::Jpeg,
    );
    assert_eq!(path.file_name().unwrap(), "in_watermark.jpg");

    save(&sample(), &path).unwrap();

    let back = image::open(&path).unwrap();
    assert_eq!((back.width(), back.height()), (12, 9));
    assert!(!back.color().has_alpha());
}

#[test]
fn test_save_when_png_then_pixels_round_trip() {
    let dir = scratch_dir("png");
    let path = dir.join("out.png");
    save(&sample(), &path).unwrap();

    let back = image::open(&path).unwrap().to_rgba8();
    assert_eq!(back.get_pixel(5, 5).0, [200, 40, 40, 128]);
}

#[test]
fn test_save_when_unknown_extension_then_png_bytes() {
    let dir = scratch_dir("unknown");
    let path = dir.join("out.xyz");
    save(&sample(), &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
}

#[test]
fn test_save_when_directory_missing_then_error() {
    let path = PathBuf::from("/definitely/not/here/out.png");
    assert!(save(&sample(), &path).is_err());
}
