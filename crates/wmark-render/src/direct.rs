//! The zero-rotation path: draw straight onto the target

use image::DynamicImage;
use wmark_core::{
    error::Result,
    types::{Point, TextMask},
    Color, WatermarkStyle, SHADOW_OFFSET,
};

use crate::{blend, Compositor};

/// Shadow then foreground, in place, no intermediate surface
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectGlyphCompositor;

impl Compositor for DirectGlyphCompositor {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn composite(
        &self,
        image: &mut DynamicImage,
        mask: &TextMask,
        origin: Point,
        style: &WatermarkStyle,
    ) -> Result<()> {
        blend::draw_mask(
            image,
            mask,
            origin.offset(SHADOW_OFFSET, SHADOW_OFFSET),
            Color::shadow(),
        );
        blend::draw_mask(image, mask, origin, style.color);
        Ok(())
    }
}
