//! The font seam
//!
//! Measurement and drawing must use the very same face, or the computed
//! origin and the drawn pixels drift apart. [`GlyphFace`] bundles both so a
//! render resolves one face and asks it everything.

use crate::error::Result;
use crate::types::{TextExtent, TextMask};

/// A font resolved at a concrete pixel size
///
/// ```ignore
/// struct Boxes;
///
/// impl GlyphFace for Boxes {
///     fn name(&self) -> &str {
///         "boxes"
///     }
///
///     fn pixel_size(&self) -> f32 {
///         10.0
///     }
///
///     fn rasterize(&self, text: &str) -> Result<TextMask> {
///         let mut mask = TextMask::new(10 * text.chars().count() as u32, 10);
///         mask.coverage.fill(255);
///         Ok(mask)
///     }
/// }
/// ```
pub trait GlyphFace: Send + Sync {
    /// Human-readable identity, used in logs and cache keys
    fn name(&self) -> &str;

    /// Size the face actually renders at
    fn pixel_size(&self) -> f32;

    /// Draw one line of text into a tight coverage mask
    fn rasterize(&self, text: &str) -> Result<TextMask>;

    /// Size of the block [`GlyphFace::rasterize`] would produce
    ///
    /// Faces that can measure without drawing should override this, keeping
    /// the result identical to the rasterized mask's extent.
    fn measure(&self, text: &str) -> Result<TextExtent> {
        self.rasterize(text).map(|mask| mask.extent())
    }
}
