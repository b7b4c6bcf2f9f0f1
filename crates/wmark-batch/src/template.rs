// this_file: crates/wmark-batch/src/template.rs

//! Named style snapshots, persisted as a JSON array.
//!
//! Records keep keys this version does not know about, so a store written by
//! another tool round-trips without losing anything.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use wmark_core::error::{ConfigError, Result};

use crate::types::StyleDescriptor;

/// One named style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Unique within a store
    pub name: String,
    /// The saved style
    #[serde(flatten)]
    pub style: StyleDescriptor,
    /// Unrecognized keys, written back unchanged
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Template {
    /// A template with no extra keys
    pub fn new(name: impl Into<String>, style: StyleDescriptor) -> Self {
        Self {
            name: name.into(),
            style,
            extra: serde_json::Map::new(),
        }
    }
}

/// Ordered templates backed by one JSON file
#[derive(Debug, Clone)]
pub struct TemplateStore {
    path: PathBuf,
    templates: Vec<Template>,
}

fn store_error(path: &Path, reason: impl ToString) -> ConfigError {
    ConfigError::Store {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

impl TemplateStore {
    /// Reads the store at `path`; a missing file is an empty store
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let templates = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Vec::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|e| store_error(&path, e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(store_error(&path, e).into()),
        };

        log::debug!("Loaded {} templates from {}", templates.len(), path.display());
        Ok(Self { path, templates })
    }

    /// Writes every template back to the store's file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| store_error(parent, e))?;
        }
        let json =
            serde_json::to_string_pretty(&self.templates).map_err(|e| store_error(&self.path, e))?;
        fs::write(&self.path, json).map_err(|e| store_error(&self.path, e))?;
        Ok(())
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Template names in store order
    pub fn names(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.name.as_str()).collect()
    }

    /// The template called `name`
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Like [`TemplateStore::get`], but a missing name is an error
    pub fn require(&self, name: &str) -> Result<&Template> {
        self.get(name)
            .ok_or_else(|| ConfigError::TemplateNotFound(name.to_string()).into())
    }

    /// Replaces the template with the same name in place, or appends
    pub fn upsert(&mut self, template: Template) {
        match self.templates.iter_mut().find(|t| t.name == template.name) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }

    /// Deletes `name`; false when there was no such template
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.templates.len();
        self.templates.retain(|t| t.name != name);
        self.templates.len() != before
    }

    /// Number of templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the store holds no templates
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wmark_core::Anchor;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("wmark-templates-{}-{}", name, std::process::id()))
            .join("templates.json")
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let store = TemplateStore::load(scratch("missing")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_upsert_replaces_in_place_and_appends() {
        let mut store = TemplateStore::load(scratch("upsert")).unwrap();
        store.upsert(Template::new("a", StyleDescriptor::default()));
        store.upsert(Template::new("b", StyleDescriptor::default()));

        let mut bigger = StyleDescriptor::default();
        bigger.font_size = 60;
        store.upsert(Template::new("a", bigger));

        assert_eq!(store.names(), ["a", "b"]);
        assert_eq!(store.get("a").unwrap().style.font_size, 60);

        assert!(store.remove("a"));
        assert!(!store.remove("a"));
        assert_eq!(store.names(), ["b"]);
        assert!(store.require("a").is_err());
    }

    #[test]
    fn test_round_trip_keeps_unknown_keys() {
        let path = scratch("roundtrip");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            r#"[{"name": "night", "text": "2024", "use_date": true, "font_size": "40",
                "position": 0, "color": "yellow", "opacity": "50%", "rotation": -15,
                "author": "kim", "favorite": true}]"#,
        )
        .unwrap();

        let store = TemplateStore::load(&path).unwrap();
        let night = store.get("night").unwrap();
        assert_eq!(night.style.position, Anchor::TopLeft);
        assert_eq!(night.style.font_size, 40);
        assert_eq!(night.extra["author"], "kim");
        store.save().unwrap();

        let again = TemplateStore::load(&path).unwrap();
        assert_eq!(again.get("night"), store.get("night"));
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[0]["favorite"], true);
        assert_eq!(raw[0]["position"], "top_left");
    }

    #[test]
    fn test_legacy_record_is_rewritten_in_current_shape() {
        let path = scratch("legacy");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            r#"[{"name": "old", "font_size": "30", "opacity": "80%", "position": 8}]"#,
        )
        .unwrap();

        TemplateStore::load(&path).unwrap().save().unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[0]["font_size"], 30);
        assert_eq!(raw[0]["opacity"], 80);
        assert_eq!(raw[0]["position"], "bottom_right");
        assert!(raw[0].get("extra").is_none());

        let again = TemplateStore::load(&path).unwrap();
        assert_eq!(again.get("old").unwrap().style.position, Anchor::BottomRight);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let path = scratch("malformed");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert!(TemplateStore::load(&path).is_err());
    }
}
