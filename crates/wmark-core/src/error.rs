//! Error types for wmark

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WmarkError>;

/// Main error type for wmark
#[derive(Debug, Error)]
pub enum WmarkError {
    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("Rendering failed: {0}")]
    RenderingFailed(#[from] RenderError),

    #[error("Export failed: {0}")]
    ExportFailed(#[from] ExportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cannot decode image {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

/// Font loading errors
///
/// These never escape the font chain: a candidate that fails is skipped.
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid font data")]
    InvalidData,

    #[error("System font not found: {0}")]
    SystemFontNotFound(String),
}

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Pixmap creation failed")]
    PixmapCreationFailed,

    #[error("Outline extraction failed for glyph {0}")]
    OutlineExtractionFailed(u32),

    #[error("Path building failed")]
    PathBuildingFailed,
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Write failed: {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },
}

/// Problems that stop a batch before any image is processed
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No output directory set")]
    MissingOutputDir,

    #[error("Output directory {0} is also an input directory")]
    OutputDirIsInputDir(PathBuf),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Cannot use {path}: {reason}")]
    Store { path: PathBuf, reason: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}
