//! The watermark engine: text in, watermarked image out
//!
//! [`WatermarkEngine::render`] is the single drawing routine behind both the
//! live preview and the final export:
//!
//! 1. resolve one face from the font chain and rasterize the text with it,
//!    so measuring and drawing can never disagree
//! 2. turn the anchor (or the manual point) into a top-left origin
//! 3. hand the mask to the [`DirectGlyphCompositor`] when the rotation is
//!    zero, to the [`RotatedGlyphCompositor`] otherwise
//!
//! Rendering never fails for a decoded image. Font problems fall back to the
//! builtin face; a rotated draw that cannot allocate its buffers falls back
//! to an unrotated one.

use std::sync::Arc;

use image::{DynamicImage, GenericImageView};
use wmark_core::{
    cache_config,
    error::Result,
    traits::GlyphFace,
    types::{Point, TextExtent, TextMask},
    AnchorResolver, Placement, WatermarkStyle,
};
use wmark_fontdb::{BuiltinFace, FontChain};

pub mod blend;
pub mod cache;
pub mod direct;
pub mod preview;
pub mod rotated;

pub use cache::{CacheStats, MaskCache};
pub use direct::DirectGlyphCompositor;
pub use preview::{render_preview, PreviewMapping};
pub use rotated::RotatedGlyphCompositor;

/// Burns a rasterized text mask into an image
pub trait Compositor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Draws shadow and text with the mask's top-left at `origin`
    ///
    /// The image may change pixel layout but never its dimensions.
    fn composite(
        &self,
        image: &mut DynamicImage,
        mask: &TextMask,
        origin: Point,
        style: &WatermarkStyle,
    ) -> Result<()>;
}

/// Font chain, anchor rules and mask cache, shared by every render
pub struct WatermarkEngine {
    fonts: FontChain,
    resolver: AnchorResolver,
    masks: MaskCache,
}

impl WatermarkEngine {
    pub fn new(fonts: FontChain) -> Self {
        Self {
            fonts,
            resolver: AnchorResolver::default(),
            masks: MaskCache::default(),
        }
    }

    /// An engine that only draws with the builtin face
    pub fn builtin() -> Self {
        Self::new(FontChain::builtin_only())
    }

    pub fn with_resolver(mut self, resolver: AnchorResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn fonts(&self) -> &FontChain {
        &self.fonts
    }

    pub fn resolver(&self) -> &AnchorResolver {
        &self.resolver
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.masks.stats()
    }

    /// Pixel size of `text` as [`WatermarkEngine::render`] would draw it
    pub fn measure(&self, text: &str, font_size: u32) -> TextExtent {
        self.text_mask(text, font_size).extent()
    }

    /// Draws `style` onto `image` at `placement`
    ///
    /// The returned image has the input's dimensions. RGB and RGBA images
    /// keep their layout on the direct path; the rotated path always returns
    /// RGBA. Other layouts are converted to 8-bit RGB or RGBA first.
    pub fn render(
        &self,
        image: DynamicImage,
        style: &WatermarkStyle,
        placement: &Placement,
    ) -> DynamicImage {
        let text = style.effective_text();
        let mask = self.text_mask(text, style.font_size);
        let (width, height) = image.dimensions();
        let origin = self.resolver.resolve(placement, mask.extent(), width, height);

        let mut image = normalize(image);
        let compositor: &dyn Compositor = if style.rotation != 0 {
            &RotatedGlyphCompositor
        } else {
            &DirectGlyphCompositor
        };

        log::debug!(
            "{:?}: {}x{} text at ({}, {}) on {}x{}, {} path",
            text,
            mask.width,
            mask.height,
            origin.x,
            origin.y,
            width,
            height,
            compositor.name()
        );

        if let Err(e) = compositor.composite(&mut image, &mask, origin, style) {
            log::warn!("{} compositor failed ({}), drawing unrotated", compositor.name(), e);
            if let Err(e) = DirectGlyphCompositor.composite(&mut image, &mask, origin, style) {
                log::warn!("direct compositor failed: {}", e);
            }
        }
        image
    }

    /// The face chosen for `font_size` draws `text`; the builtin face covers failures
    fn text_mask(&self, text: &str, font_size: u32) -> Arc<TextMask> {
        let face = self.fonts.resolve(font_size);
        match self.rasterize(face.as_ref(), text) {
            Ok(mask) => mask,
            Err(e) => {
                log::warn!("{} could not draw {:?} ({}), using builtin face", face.name(), text, e);
                self.rasterize(&BuiltinFace::new(), text)
                    .unwrap_or_else(|_| Arc::new(TextMask::new(0, 0)))
            },
        }
    }

    fn rasterize(&self, face: &dyn GlyphFace, text: &str) -> Result<Arc<TextMask>> {
        if !cache_config::is_caching_enabled() {
            return face.rasterize(text).map(Arc::new);
        }

        let key = cache::MaskKey::new(face, text);
        if let Some(mask) = self.masks.get(&key) {
            return Ok(mask);
        }
        let mask = Arc::new(face.rasterize(text)?);
        self.masks.insert(key, mask.clone());
        Ok(mask)
    }
}

impl Default for WatermarkEngine {
    fn default() -> Self {
        Self::new(FontChain::default())
    }
}

/// 8-bit RGB or RGBA, whichever keeps the image's alpha
fn normalize(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => image,
        other if other.color().has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}
