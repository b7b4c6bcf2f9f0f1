// this_file: crates/wmark-batch/src/lib.rs

#![deny(missing_docs)]

//! Batch watermarking for wmark.
//!
//! A batch checks its configuration once, then runs every image through
//! open, text lookup, render and save. One image failing is logged and
//! counted; it never stops the others. Cancellation is checked between
//! images, never inside one.

pub mod settings;
pub mod template;
pub mod types;

pub use settings::{config_dir, default_settings_path, default_templates_path, LastSettings};
pub use template::{Template, TemplateStore};
pub use types::*;

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use wmark_core::error::{ConfigError, Result};
use wmark_export::{output_path, NamingRule, OutputFormat};
use wmark_render::WatermarkEngine;

/// Where and how a batch writes its outputs
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    /// Destination directory; required
    pub output_dir: Option<PathBuf>,
    /// Output file naming
    pub naming: NamingRule,
    /// Output container
    pub format: OutputFormat,
}

impl BatchConfig {
    /// Checks the configuration against `inputs` before anything is written.
    ///
    /// Returns the output directory. Writing into a directory that holds one
    /// of the inputs is refused, since outputs could replace originals.
    pub fn validate(&self, inputs: &[PathBuf]) -> std::result::Result<&Path, ConfigError> {
        let output_dir = self
            .output_dir
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or(ConfigError::MissingOutputDir)?;

        for input in inputs {
            let input_dir = match input.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            if same_dir(input_dir, output_dir) {
                return Err(ConfigError::OutputDirIsInputDir(output_dir.to_path_buf()));
            }
        }
        Ok(output_dir)
    }
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Shared stop flag, checked once per image
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the batch to stop before its next image
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether [`CancelToken::cancel`] was called
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Reported after each finished image
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// Images finished so far, this one included
    pub done: usize,
    /// Images in the batch
    pub total: usize,
    /// The image just finished
    pub input: &'a Path,
    /// Whether it was written
    pub ok: bool,
}

/// One image that could not be watermarked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// The input image
    pub input: PathBuf,
    /// What went wrong
    pub reason: String,
}

/// Outcome of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Images attempted
    pub processed: usize,
    /// Images written
    pub succeeded: usize,
    /// Images attempted but not written
    pub failed: usize,
    /// Images skipped because the batch was cancelled
    pub cancelled: usize,
    /// Details for every failed image, in input order
    pub failures: Vec<BatchFailure>,
    /// Files written, in input order
    pub outputs: Vec<PathBuf>,
}

impl BatchReport {
    /// True when images were attempted and none succeeded
    pub fn all_failed(&self) -> bool {
        self.processed > 0 && self.succeeded == 0
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed {}: {} succeeded, {} failed",
            self.processed, self.succeeded, self.failed
        )?;
        if self.cancelled > 0 {
            write!(f, ", {} cancelled", self.cancelled)?;
        }
        Ok(())
    }
}

type ProgressFn<'a> = Box<dyn Fn(&Progress<'_>) + Send + Sync + 'a>;

/// What happened to one input
enum Outcome {
    Written(PathBuf),
    Failed(String),
    Skipped,
}

/// Runs one style over many images
pub struct BatchRunner<'a> {
    engine: &'a WatermarkEngine,
    descriptor: StyleDescriptor,
    config: BatchConfig,
    cancel: CancelToken,
    progress: Option<ProgressFn<'a>>,
}

impl<'a> BatchRunner<'a> {
    /// A runner drawing with `engine`
    pub fn new(engine: &'a WatermarkEngine, descriptor: StyleDescriptor, config: BatchConfig) -> Self {
        Self {
            engine,
            descriptor,
            config,
            cancel: CancelToken::new(),
            progress: None,
        }
    }

    /// Uses `token` instead of the runner's own
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Calls `callback` after every image
    pub fn on_progress(mut self, callback: impl Fn(&Progress<'_>) + Send + Sync + 'a) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Handle for cancelling from elsewhere
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Validates the configuration, then watermarks every input.
    ///
    /// Only configuration problems and an uncreatable output directory are
    /// errors; per-image problems end up in the report.
    pub fn run(&self, inputs: &[PathBuf]) -> Result<BatchReport> {
        let output_dir = self.config.validate(inputs)?;
        std::fs::create_dir_all(output_dir)?;

        let targets = self.plan_outputs(inputs, output_dir);
        log::info!("Watermarking {} images into {}", inputs.len(), output_dir.display());

        let outcomes = self.process_all(inputs, &targets);

        let mut report = BatchReport::default();
        for (input, outcome) in inputs.iter().zip(outcomes) {
            match outcome {
                Outcome::Written(path) => {
                    report.processed += 1;
                    report.succeeded += 1;
                    report.outputs.push(path);
                },
                Outcome::Failed(reason) => {
                    report.processed += 1;
                    report.failed += 1;
                    report.failures.push(BatchFailure {
                        input: input.clone(),
                        reason,
                    });
                },
                Outcome::Skipped => report.cancelled += 1,
            }
        }

        log::info!("{}", report);
        Ok(report)
    }

    /// Output path per input, made unique so no two images share a file
    fn plan_outputs(&self, inputs: &[PathBuf], output_dir: &Path) -> Vec<PathBuf> {
        let mut taken = HashSet::new();
        inputs
            .iter()
            .map(|input| {
                let planned = output_path(input, output_dir, &self.config.naming, self.config.format);
                let mut candidate = planned.clone();
                let mut n = 2;
                while !taken.insert(candidate.clone()) {
                    candidate = numbered(&planned, n);
                    n += 1;
                }
                if candidate != planned {
                    log::warn!(
                        "{} would overwrite another output, writing {} instead",
                        input.display(),
                        candidate.display()
                    );
                }
                candidate
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn process_all(&self, inputs: &[PathBuf], targets: &[PathBuf]) -> Vec<Outcome> {
        let total = inputs.len();
        let mut done = 0;
        inputs
            .iter()
            .zip(targets)
            .map(|(input, target)| {
                if self.cancel.is_cancelled() {
                    return Outcome::Skipped;
                }
                done += 1;
                self.finish(input, target, done, total)
            })
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn process_all(&self, inputs: &[PathBuf], targets: &[PathBuf]) -> Vec<Outcome> {
        use rayon::prelude::*;
        use std::sync::atomic::AtomicUsize;

        let total = inputs.len();
        let done = AtomicUsize::new(0);
        inputs
            .par_iter()
            .zip(targets.par_iter())
            .map(|(input, target)| {
                if self.cancel.is_cancelled() {
                    return Outcome::Skipped;
                }
                let count = done.fetch_add(1, Ordering::SeqCst) + 1;
                self.finish(input, target, count, total)
            })
            .collect()
    }

    /// Processes one image, logs the result and reports progress
    fn finish(&self, input: &Path, target: &Path, done: usize, total: usize) -> Outcome {
        let outcome = match self.process_one(input, target) {
            Ok(()) => {
                log::info!("[{}/{}] {} -> {}", done, total, input.display(), target.display());
                Outcome::Written(target.to_path_buf())
            },
            Err(e) => {
                log::warn!("[{}/{}] {} failed: {}", done, total, input.display(), e);
                Outcome::Failed(e.to_string())
            },
        };

        if let Some(callback) = &self.progress {
            callback(&Progress {
                done,
                total,
                input,
                ok: matches!(outcome, Outcome::Written(_)),
            });
        }
        outcome
    }

    fn process_one(&self, input: &Path, target: &Path) -> Result<()> {
        let image = wmark_input::open_image(input)?;
        let text = self.descriptor.text_for(input);
        let style = self.descriptor.to_style(&text);
        let rendered = self.engine.render(image, &style, &self.descriptor.placement());
        wmark_export::save(&rendered, target)
    }
}

/// `dir/stem_N.ext`
fn numbered(path: &Path, n: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, n, ext.to_string_lossy()),
        None => format!("{}_{}", stem, n),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_output_dir() {
        let config = BatchConfig::default();
        assert!(matches!(
            config.validate(&[PathBuf::from("a.png")]),
            Err(ConfigError::MissingOutputDir)
        ));
    }

    #[test]
    fn test_validate_rejects_input_dir() {
        let dir = std::env::temp_dir();
        let config = BatchConfig {
            output_dir: Some(dir.clone()),
            ..BatchConfig::default()
        };
        assert!(matches!(
            config.validate(&[dir.join("photo.jpg")]),
            Err(ConfigError::OutputDirIsInputDir(_))
        ));
        assert!(config.validate(&[PathBuf::from("/elsewhere/photo.jpg")]).is_ok());
    }

    #[test]
    fn test_bare_file_name_lives_in_current_dir() {
        let config = BatchConfig {
            output_dir: Some(PathBuf::from(".")),
            ..BatchConfig::default()
        };
        assert!(config.validate(&[PathBuf::from("photo.jpg")]).is_err());
    }

    #[test]
    fn test_numbered() {
        assert_eq!(numbered(Path::new("/o/a.jpg"), 2), Path::new("/o/a_2.jpg"));
        assert_eq!(numbered(Path::new("/o/a"), 3), Path::new("/o/a_3"));
    }

    #[test]
    fn test_plan_outputs_never_collides() {
        let engine = WatermarkEngine::builtin();
        let config = BatchConfig {
            output_dir: Some(PathBuf::from("/out")),
            naming: NamingRule::KeepOriginal,
            format: OutputFormat::Jpeg,
        };
        let runner = BatchRunner::new(&engine, StyleDescriptor::default(), config);
        let inputs = [PathBuf::from("/in/a.png"), PathBuf::from("/in/a.bmp"), PathBuf::from("/in/b.png")];

        let planned = runner.plan_outputs(&inputs, Path::new("/out"));
        assert_eq!(
            planned,
            [
                PathBuf::from("/out/a.jpg"),
                PathBuf::from("/out/a_2.jpg"),
                PathBuf::from("/out/b.jpg")
            ]
        );
    }

    #[test]
    fn test_report_display() {
        let report = BatchReport {
            processed: 4,
            succeeded: 3,
            failed: 1,
            ..BatchReport::default()
        };
        assert_eq!(report.to_string(), "processed 4: 3 succeeded, 1 failed");
        assert!(!report.all_failed());
    }
}
