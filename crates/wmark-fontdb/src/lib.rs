//! Fonts for wmark: find one that loads, or fall back to one that always does
//!
//! A render asks the [`FontChain`] for a face at the requested pixel size.
//! The chain tries its candidates in order (a system family by name, a
//! platform font file, then the compiled-in bitmap face) and hands back the
//! first that loads. A candidate that fails is logged and skipped; the chain
//! itself never fails.
//!
//! ## Memory Management
//!
//! Font bytes are read once per source and shared through `Arc`. Parsers
//! borrow the bytes on demand, which keeps TTC collections working with
//! their face index.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use read_fonts::{FontRef as ReadFontRef, TableProvider};
use wmark_core::{
    error::{FontLoadError, Result},
    traits::GlyphFace,
};

pub mod builtin;
pub mod outline;

pub use builtin::BuiltinFace;
pub use outline::OutlineFace;

/// Raw font bytes, validated once at load time
pub struct FontData {
    data: Vec<u8>,
    face_index: u32,
}

impl FontData {
    /// Reads a font file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_index(path, 0)
    }

    /// Reads one face of a font file (for TTC collections)
    pub fn from_file_index(path: impl AsRef<Path>, face_index: u32) -> Result<Self> {
        let data = fs::read(path.as_ref())
            .map_err(|_| FontLoadError::FileNotFound(path.as_ref().display().to_string()))?;

        Self::from_data_index(data, face_index)
    }

    /// Validates in-memory font bytes
    ///
    /// A face without a character map or a `head` table cannot draw text and
    /// is rejected here, so later lookups only fail on broken glyph data.
    pub fn from_data_index(data: Vec<u8>, face_index: u32) -> Result<Self> {
        let font =
            ReadFontRef::from_index(&data, face_index).map_err(|_| FontLoadError::InvalidData)?;
        font.cmap().map_err(|_| FontLoadError::InvalidData)?;
        font.head().map_err(|_| FontLoadError::InvalidData)?;

        Ok(Self { data, face_index })
    }

    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Parses the face for skrifa; cheap, nothing is copied
    pub fn font_ref(&self) -> Result<skrifa::FontRef<'_>> {
        skrifa::FontRef::from_index(&self.data, self.face_index)
            .map_err(|_| FontLoadError::InvalidData.into())
    }
}

/// One place a font may come from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FontCandidate {
    /// An installed family, looked up by name
    Family(String),
    /// A font file on disk
    File(PathBuf),
    /// The compiled-in bitmap face
    Builtin,
}

impl std::fmt::Display for FontCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Family(name) => write!(f, "family '{}'", name),
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::Builtin => f.write_str("builtin"),
        }
    }
}

/// The per-platform font file tried after the preferred family
pub fn platform_font_file() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        PathBuf::from("/System/Library/Fonts/PingFang.ttc")
    }
    #[cfg(target_os = "windows")]
    {
        PathBuf::from(r"C:\Windows\Fonts\msyh.ttc")
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf")
    }
}

/// Installed fonts, scanned once on first use
fn system_fonts() -> &'static fontdb::Database {
    static SYSTEM: OnceLock<fontdb::Database> = OnceLock::new();
    SYSTEM.get_or_init(|| {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        log::debug!("Scanned {} system font faces", db.len());
        db
    })
}

/// Ordered font candidates ending in a face that cannot fail
pub struct FontChain {
    candidates: Vec<FontCandidate>,
    /// Loaded font bytes per candidate; failures are remembered too
    loaded: Mutex<HashMap<FontCandidate, Option<Arc<FontData>>>>,
}

impl FontChain {
    /// A chain over `candidates`; the builtin face is appended if missing
    pub fn new(candidates: impl IntoIterator<Item = FontCandidate>) -> Self {
        let mut candidates: Vec<FontCandidate> = candidates.into_iter().collect();
        if candidates.last() != Some(&FontCandidate::Builtin) {
            candidates.retain(|c| *c != FontCandidate::Builtin);
            candidates.push(FontCandidate::Builtin);
        }
        Self {
            candidates,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Arial, then the platform font file, then the builtin face
    pub fn platform_default() -> Self {
        Self::new([
            FontCandidate::Family("Arial".to_string()),
            FontCandidate::File(platform_font_file()),
            FontCandidate::Builtin,
        ])
    }

    /// Only the builtin face; renders are identical on every machine
    pub fn builtin_only() -> Self {
        Self::new([FontCandidate::Builtin])
    }

    /// Puts a user-supplied font file in front of the existing candidates
    pub fn with_preferred_file(self, path: impl Into<PathBuf>) -> Self {
        let mut candidates = vec![FontCandidate::File(path.into())];
        candidates.extend(self.candidates);
        Self::new(candidates)
    }

    pub fn candidates(&self) -> &[FontCandidate] {
        &self.candidates
    }

    /// The first face that loads, at `font_size` pixels
    pub fn resolve(&self, font_size: u32) -> Arc<dyn GlyphFace> {
        for candidate in &self.candidates {
            if *candidate == FontCandidate::Builtin {
                break;
            }
            if let Some(font) = self.load(candidate) {
                log::debug!("Using {} at {}px", candidate, font_size);
                return Arc::new(OutlineFace::new(
                    font,
                    font_size as f32,
                    candidate.to_string(),
                ));
            }
        }

        log::debug!("Using builtin face");
        Arc::new(BuiltinFace::new())
    }

    fn load(&self, candidate: &FontCandidate) -> Option<Arc<FontData>> {
        let mut loaded = self.loaded.lock();
        if let Some(hit) = loaded.get(candidate) {
            return hit.clone();
        }

        let result = match candidate {
            FontCandidate::Family(name) => load_family(name),
            FontCandidate::File(path) => FontData::from_file(path),
            FontCandidate::Builtin => return None,
        };

        let font = match result {
            Ok(font) => Some(Arc::new(font)),
            Err(e) => {
                log::warn!("Skipping {}: {}", candidate, e);
                None
            },
        };
        loaded.insert(candidate.clone(), font.clone());
        font
    }
}

impl Default for FontChain {
    fn default() -> Self {
        Self::platform_default()
    }
}

fn load_family(name: &str) -> Result<FontData> {
    let db = system_fonts();
    let query = fontdb::Query {
        families: &[fontdb::Family::Name(name)],
        ..fontdb::Query::default()
    };
    let id = db
        .query(&query)
        .ok_or_else(|| FontLoadError::SystemFontNotFound(name.to_string()))?;
    let (data, index) = db
        .with_face_data(id, |data, index| (data.to_vec(), index))
        .ok_or_else(|| FontLoadError::SystemFontNotFound(name.to_string()))?;

    FontData::from_data_index(data, index)
}
