//! Rasterized text masks, kept per (face, size, text)
//!
//! Batch runs stamp the same text at the same size on every image, so the
//! mask is worth keeping. The cache only saves time: a hit returns exactly
//! the mask a fresh rasterization would.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use wmark_core::{traits::GlyphFace, types::TextMask};

/// Default number of masks kept
const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(64) {
    Some(v) => v,
    None => unreachable!(),
};

/// Identifies one rasterized line of text
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct MaskKey {
    pub face: String,
    /// `f32::to_bits` of the face's pixel size
    pub size_bits: u32,
    pub text: String,
}

impl MaskKey {
    pub fn new(face: &dyn GlyphFace, text: &str) -> Self {
        Self {
            face: face.name().to_string(),
            size_bits: face.pixel_size().to_bits(),
            text: text.to_string(),
        }
    }
}

/// Snapshot of cache usage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Thread-safe LRU of text masks
pub struct MaskCache {
    cache: Mutex<LruCache<MaskKey, Arc<TextMask>>>,
    capacity: NonZeroUsize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MaskCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(DEFAULT_CAPACITY);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &MaskKey) -> Option<Arc<TextMask>> {
        let found = self.cache.lock().get(key).cloned();
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    pub fn insert(&self, key: MaskKey, mask: Arc<TextMask>) {
        self.cache.lock().put(key, mask);
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.cache.lock().len(),
            capacity: self.capacity.get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for MaskCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY.get())
    }
}
