//! Outline faces: TrueType/OpenType text via skrifa and tiny-skia
//!
//! A line of text is laid out left to right with plain advance widths,
//! every glyph outline is traced into one kurbo path, and the path is filled
//! with anti-aliasing into a pixmap exactly as large as the ink box. The
//! alpha channel of that pixmap is the coverage mask.

use std::sync::Arc;

use kurbo::{BezPath, PathEl, Shape};
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::DrawSettings;
use skrifa::{GlyphId, MetadataProvider};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};
use wmark_core::{
    error::{RenderError, Result},
    traits::GlyphFace,
    types::{TextExtent, TextMask},
};

use crate::FontData;

/// Largest mask side we are willing to allocate
const MAX_MASK_SIDE: u32 = 16_384;

/// A loaded font bound to one pixel size
pub struct OutlineFace {
    font: Arc<FontData>,
    size: f32,
    name: String,
}

/// Pixel-aligned bounds of the traced text
#[derive(Debug, Clone, Copy, PartialEq)]
struct InkBox {
    x0: f64,
    y0: f64,
    width: u32,
    height: u32,
}

impl OutlineFace {
    pub fn new(font: Arc<FontData>, size: f32, name: impl Into<String>) -> Self {
        Self {
            font,
            size: size.max(1.0),
            name: name.into(),
        }
    }

    /// Traces the whole line into a y-down path with the baseline at y = 0
    fn trace(&self, text: &str) -> Result<(BezPath, f32)> {
        let font = self.font.font_ref()?;
        let size = Size::new(self.size);
        let location = LocationRef::default();
        let charmap = font.charmap();
        let metrics = font.glyph_metrics(size, location);
        let outlines = font.outline_glyphs();

        let mut path = BezPath::new();
        let mut pen_x = 0.0f32;

        for ch in text.chars() {
            let glyph_id = charmap.map(ch).unwrap_or(GlyphId::new(0));

            if let Some(glyph) = outlines.get(glyph_id) {
                let mut pen = PathPen {
                    path: &mut path,
                    offset_x: pen_x as f64,
                };
                glyph
                    .draw(DrawSettings::unhinted(size, location), &mut pen)
                    .map_err(|_| RenderError::OutlineExtractionFailed(glyph_id.to_u32()))?;
            }

            pen_x += metrics.advance_width(glyph_id).unwrap_or(0.0);
        }

        Ok((path, pen_x))
    }

    fn ink_box(path: &BezPath) -> Result<Option<InkBox>> {
        if path.elements().is_empty() {
            return Ok(None);
        }

        let bbox = path.bounding_box();
        if !(bbox.x0.is_finite() && bbox.y0.is_finite() && bbox.x1.is_finite() && bbox.y1.is_finite())
        {
            return Err(RenderError::PathBuildingFailed.into());
        }
        if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
            return Ok(None);
        }

        let x0 = bbox.x0.floor();
        let y0 = bbox.y0.floor();
        let width = (bbox.x1.ceil() - x0) as u32;
        let height = (bbox.y1.ceil() - y0) as u32;

        if width > MAX_MASK_SIDE || height > MAX_MASK_SIDE {
            return Err(RenderError::InvalidDimensions { width, height }.into());
        }

        Ok(Some(InkBox {
            x0,
            y0,
            width,
            height,
        }))
    }

    /// Block size for text that has no ink at all (spaces)
    fn blank_extent(&self, advance: f32) -> Result<TextExtent> {
        let font = self.font.font_ref()?;
        let metrics = font.metrics(Size::new(self.size), LocationRef::default());
        Ok(TextExtent {
            width: advance.ceil().max(1.0) as u32,
            height: (metrics.ascent - metrics.descent).ceil().max(1.0) as u32,
        })
    }
}

impl GlyphFace for OutlineFace {
    fn name(&self) -> &str {
        &self.name
    }

    fn pixel_size(&self) -> f32 {
        self.size
    }

    fn rasterize(&self, text: &str) -> Result<TextMask> {
        let (path, advance) = self.trace(text)?;

        let Some(ink) = Self::ink_box(&path)? else {
            let extent = self.blank_extent(advance)?;
            return Ok(TextMask::new(extent.width, extent.height));
        };

        let mut builder = PathBuilder::new();
        for element in path.elements() {
            match *element {
                PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
                PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
                PathEl::QuadTo(ctrl, end) => {
                    builder.quad_to(ctrl.x as f32, ctrl.y as f32, end.x as f32, end.y as f32)
                },
                PathEl::CurveTo(c1, c2, end) => builder.cubic_to(
                    c1.x as f32,
                    c1.y as f32,
                    c2.x as f32,
                    c2.y as f32,
                    end.x as f32,
                    end.y as f32,
                ),
                PathEl::ClosePath => builder.close(),
            }
        }
        let skia_path = builder.finish().ok_or(RenderError::PathBuildingFailed)?;

        let mut pixmap =
            Pixmap::new(ink.width, ink.height).ok_or(RenderError::PixmapCreationFailed)?;
        let paint = Paint {
            anti_alias: true,
            ..Default::default()
        };
        // Shift the ink box so its top-left lands on pixel (0, 0)
        let transform = Transform::from_translate(-ink.x0 as f32, -ink.y0 as f32);
        pixmap.fill_path(&skia_path, &paint, FillRule::Winding, transform, None);

        log::debug!(
            "{}: {:?} at {}px -> {}x{} mask",
            self.name,
            text,
            self.size,
            ink.width,
            ink.height
        );

        let coverage = pixmap.pixels().iter().map(|px| px.alpha()).collect();
        Ok(TextMask {
            width: ink.width,
            height: ink.height,
            coverage,
        })
    }

    fn measure(&self, text: &str) -> Result<TextExtent> {
        let (path, advance) = self.trace(text)?;
        match Self::ink_box(&path)? {
            Some(ink) => Ok(TextExtent {
                width: ink.width,
                height: ink.height,
            }),
            None => self.blank_extent(advance),
        }
    }
}

/// Receives skrifa outline commands and writes them into a kurbo path
///
/// Font outlines are y-up; the path is y-down like the image, so every y
/// is negated. `offset_x` places the glyph at its pen position in the line.
struct PathPen<'a> {
    path: &'a mut BezPath,
    offset_x: f64,
}

impl PathPen<'_> {
    fn point(&self, x: f32, y: f32) -> (f64, f64) {
        (x as f64 + self.offset_x, -(y as f64))
    }
}

impl skrifa::outline::OutlinePen for PathPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        let c = self.point(cx0, cy0);
        let p = self.point(x, y);
        self.path.quad_to(c, p);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let c0 = self.point(cx0, cy0);
        let c1 = self.point(cx1, cy1);
        let p = self.point(x, y);
        self.path.curve_to(c0, c1, p);
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}
