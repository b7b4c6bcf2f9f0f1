// this_file: crates/wmark-batch/tests/batch.rs

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{Rgb, RgbImage};
use wmark_batch::{BatchConfig, BatchRunner, CancelToken, StyleDescriptor};
use wmark_core::{ConfigError, WmarkError};
use wmark_export::{NamingRule, OutputFormat};
use wmark_render::WatermarkEngine;

struct Scratch {
    input: PathBuf,
    output: PathBuf,
}

fn scratch(name: &str) -> Scratch {
    let root = std::env::temp_dir().join(format!("wmark-batch-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&root);
    let input = root.join("in");
    let output = root.join("out");
    fs::create_dir_all(&input).unwrap();
    Scratch { input, output }
}

/// Three decodable images and one that is not
fn three_good_one_bad(dir: &PathBuf) -> Vec<PathBuf> {
    let mut inputs = Vec::new();
    for (i, name) in ["a.png", "b.jpg", "c.bmp"].iter().enumerate() {
        let path = dir.join(name);
        RgbImage::from_pixel(64 + i as u32 * 10, 48, Rgb([90, 120, 150]))
            .save(&path)
            .unwrap();
        inputs.push(path);
    }
    let broken = dir.join("d.jpg");
    fs::write(&broken, b"definitely not a jpeg").unwrap();
    inputs.push(broken);
    inputs
}

fn config(output: &PathBuf) -> BatchConfig {
    BatchConfig {
        output_dir: Some(output.clone()),
        naming: NamingRule::Suffix("_watermark".into()),
        format: OutputFormat::KeepOriginal,
    }
}

#[test]
fn test_run_when_one_input_is_corrupt_then_others_still_written() {
    let dirs = scratch("mixed");
    let inputs = three_good_one_bad(&dirs.input);
    let engine = WatermarkEngine::builtin();

    let report = BatchRunner::new(&engine, StyleDescriptor::default(), config(&dirs.output))
        .run(&inputs)
        .unwrap();

    assert_eq!(report.processed, 4);
    assert_eq!(report.succeeded, 3);
    assert_eq!(report.failed, 1);
    assert_eq!(report.cancelled, 0);
    assert_eq!(report.failures[0].input, inputs[3]);

    for name in ["a_watermark.png", "b_watermark.jpg", "c_watermark.bmp"] {
        let written = image::open(dirs.output.join(name)).unwrap();
        assert!(written.width() >= 64, "{}", name);
    }
    assert!(!dirs.output.join("d_watermark.jpg").exists());
}

#[test]
fn test_run_when_output_dir_missing_then_config_error_and_nothing_written() {
    let dirs = scratch("noout");
    let inputs = three_good_one_bad(&dirs.input);
    let engine = WatermarkEngine::builtin();

    let err = BatchRunner::new(&engine, StyleDescriptor::default(), BatchConfig::default())
        .run(&inputs)
        .unwrap_err();
    assert!(matches!(err, WmarkError::Config(ConfigError::MissingOutputDir)));
}

#[test]
fn test_run_when_output_is_input_dir_then_refused() {
    let dirs = scratch("same");
    let inputs = three_good_one_bad(&dirs.input);
    let engine = WatermarkEngine::builtin();

    let err = BatchRunner::new(&engine, StyleDescriptor::default(), config(&dirs.input))
        .run(&inputs)
        .unwrap_err();
    assert!(matches!(err, WmarkError::Config(ConfigError::OutputDirIsInputDir(_))));
    assert_eq!(fs::read_dir(&dirs.input).unwrap().count(), 4);
}

#[test]
fn test_run_when_cancelled_up_front_then_nothing_processed() {
    let dirs = scratch("cancel-early");
    let inputs = three_good_one_bad(&dirs.input);
    let engine = WatermarkEngine::builtin();
    let token = CancelToken::new();
    token.cancel();

    let report = BatchRunner::new(&engine, StyleDescriptor::default(), config(&dirs.output))
        .with_cancel_token(token)
        .run(&inputs)
        .unwrap();

    assert_eq!(report.processed, 0);
    assert_eq!(report.cancelled, 4);
    assert!(!report.all_failed());
}

#[test]
fn test_run_when_cancelled_midway_then_counts_add_up() {
    let dirs = scratch("cancel-mid");
    let inputs = three_good_one_bad(&dirs.input);
    let engine = WatermarkEngine::builtin();
    let token = CancelToken::new();
    let seen = AtomicUsize::new(0);

    let stopper = token.clone();
    let report = BatchRunner::new(&engine, StyleDescriptor::default(), config(&dirs.output))
        .with_cancel_token(token)
        .on_progress(|progress| {
            seen.fetch_add(1, Ordering::SeqCst);
            assert_eq!(progress.total, 4);
            stopper.cancel();
        })
        .run(&inputs)
        .unwrap();

    assert!(report.processed >= 1);
    assert_eq!(report.processed + report.cancelled, 4);
    assert_eq!(seen.load(Ordering::SeqCst), report.processed);
}

#[test]
fn test_run_when_use_date_then_stamps_each_file() {
    let dirs = scratch("date");
    let path = dirs.input.join("plain.png");
    RgbImage::from_pixel(200, 60, Rgb([0, 0, 0])).save(&path).unwrap();
    let engine = WatermarkEngine::builtin();

    let descriptor = StyleDescriptor {
        use_date: true,
        opacity: 100,
        ..StyleDescriptor::default()
    };
    let report = BatchRunner::new(&engine, descriptor, config(&dirs.output))
        .run(&[path.clone()])
        .unwrap();
    assert_eq!(report.succeeded, 1);

    // A ten character date in the builtin face spans 118 px, anchored bottom right
    let out = image::open(&report.outputs[0]).unwrap().to_rgb8();
    let lit: Vec<(u32, u32)> = out
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0[0] == 255)
        .map(|(x, y, _)| (x, y))
        .collect();
    assert!(!lit.is_empty());
    for (x, y) in lit {
        assert!((72..190).contains(&x), "x {}", x);
        assert!((36..50).contains(&y), "y {}", y);
    }
}
