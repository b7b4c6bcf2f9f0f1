//! wmark - burn text watermarks into photos
//!
//! The render path is four steps:
//! 1. Open the image ([`input`])
//! 2. Resolve a font and rasterize the text ([`fontdb`])
//! 3. Composite the text at its anchor, rotated if asked ([`render`])
//! 4. Write the result ([`export`])
//!
//! [`batch`] runs that path over many images with one style, and keeps
//! named templates and the last-used settings.
//!
//! # Example
//!
//! ```
//! use wmark::prelude::*;
//!
//! let engine = WatermarkEngine::builtin();
//! let image = image::DynamicImage::new_rgb8(200, 100);
//! let style = WatermarkStyle::from_tokens("© 2024", 30, "white", 80, 0);
//!
//! let out = engine.render(image, &style, &Placement::anchored(Anchor::BottomRight));
//! assert_eq!((out.width(), out.height()), (200, 100));
//! ```
//!
//! # Feature Flags
//!
//! - `batch` (default): descriptors, templates, saved settings, batch runner
//! - `parallel`: process batch images on a rayon pool

pub use wmark_core::{
    error, types, Anchor, AnchorResolver, Color, ColorSpec, Placement, WatermarkStyle, DEFAULT_TEXT,
};

pub use wmark_export as export;
pub use wmark_fontdb as fontdb;
pub use wmark_input as input;
pub use wmark_render as render;

#[cfg(feature = "batch")]
pub use wmark_batch as batch;

/// Opens `input`, watermarks it and writes the result to `output`.
///
/// The output container follows the extension of `output`.
pub fn watermark_file(
    engine: &render::WatermarkEngine,
    input: &std::path::Path,
    output: &std::path::Path,
    style: &WatermarkStyle,
    placement: &Placement,
) -> error::Result<()> {
    let image = input::open_image(input)?;
    let rendered = engine.render(image, style, placement);
    export::save(&rendered, output)?;
    log::debug!("Watermarked {} -> {}", input.display(), output.display());
    Ok(())
}

/// Common imports for typical usage
pub mod prelude {
    pub use wmark_core::{
        error::{Result, WmarkError},
        traits::GlyphFace,
        types::{Point, TextExtent, TextMask},
        Anchor, Color, ColorSpec, Placement, WatermarkStyle,
    };
    pub use wmark_fontdb::FontChain;
    pub use wmark_render::{Compositor, WatermarkEngine};

    #[cfg(feature = "batch")]
    pub use wmark_batch::{BatchConfig, BatchReport, BatchRunner, StyleDescriptor};
}
