//! Where a watermarked copy is written

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use wmark_core::error::ConfigError;

/// Prefix offered by default for [`NamingRule::Prefix`]
pub const DEFAULT_PREFIX: &str = "wm_";
/// Suffix offered by default for [`NamingRule::Suffix`]
pub const DEFAULT_SUFFIX: &str = "_watermarked";

/// How the output file name derives from the input's
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case", tag = "rule", content = "value"))]
pub enum NamingRule {
    KeepOriginal,
    Prefix(String),
    Suffix(String),
}

impl NamingRule {
    pub fn prefix() -> Self {
        Self::Prefix(DEFAULT_PREFIX.to_string())
    }

    pub fn suffix() -> Self {
        Self::Suffix(DEFAULT_SUFFIX.to_string())
    }

    /// New file stem for `stem`
    pub fn apply(&self, stem: &str) -> String {
        match self {
            Self::KeepOriginal => stem.to_string(),
            Self::Prefix(prefix) => format!("{}{}", prefix, stem),
            Self::Suffix(suffix) => format!("{}{}", stem, suffix),
        }
    }
}

impl Default for NamingRule {
    fn default() -> Self {
        Self::suffix()
    }
}

/// Container the output is written as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OutputFormat {
    Jpeg,
    Png,
    /// Whatever the input file was
    #[default]
    KeepOriginal,
}

impl OutputFormat {
    /// Extension for an output made from `input`, without the dot
    pub fn extension_for(&self, input: &Path) -> String {
        match self {
            Self::Jpeg => "jpg".to_string(),
            Self::Png => "png".to_string(),
            Self::KeepOriginal => input
                .extension()
                .and_then(|ext| ext.to_str())
                .filter(|ext| !ext.is_empty())
                .unwrap_or("png")
                .to_string(),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::KeepOriginal => "keep",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "keep" | "original" => Ok(Self::KeepOriginal),
            _ => Err(ConfigError::InvalidValue {
                field: "format",
                value: s.to_string(),
            }),
        }
    }
}

/// Destination in `dir` for a watermarked copy of `input`
pub fn output_path(input: &Path, dir: &Path, rule: &NamingRule, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let name = format!("{}.{}", rule.apply(&stem), format.extension_for(input));
    dir.join(name)
}
