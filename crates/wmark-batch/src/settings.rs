// this_file: crates/wmark-batch/src/settings.rs

//! The style used last time, restored on the next run.

use std::fs;
use std::path::{Path, PathBuf};

use wmark_core::error::{ConfigError, Result};

use crate::types::StyleDescriptor;

/// File name of the last-settings store inside the config directory
pub const SETTINGS_FILE: &str = "last_settings.json";
/// File name of the template store inside the config directory
pub const TEMPLATES_FILE: &str = "templates.json";

/// `<user config dir>/wmark`, when the platform has one
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("wmark"))
}

/// Default location of the last-settings file
pub fn default_settings_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(SETTINGS_FILE))
}

/// Default location of the template store
pub fn default_templates_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(TEMPLATES_FILE))
}

/// Reads and writes the last-used style
pub struct LastSettings;

impl LastSettings {
    /// The saved style, or `None` when there is none or it cannot be read
    pub fn load(path: &Path) -> Option<StyleDescriptor> {
        let text = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&text) {
            Ok(style) => Some(style),
            Err(e) => {
                log::warn!("Ignoring unreadable settings {}: {}", path.display(), e);
                None
            },
        }
    }

    /// Saves `style`, creating the parent directory when needed
    pub fn save(path: &Path, style: &StyleDescriptor) -> Result<()> {
        let failed = |reason: String| ConfigError::Store {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| failed(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(style).map_err(|e| failed(e.to_string()))?;
        fs::write(path, json).map_err(|e| failed(e.to_string()))?;
        Ok(())
    }
}
