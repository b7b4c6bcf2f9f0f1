//! The rotated path: draw into a glyph buffer, turn it, paste it back
//!
//! Only the small glyph buffer is rotated, never the target image. The
//! buffer is padded so the shadow and the anti-aliased rim survive the
//! turn, the rotated canvas grows to hold every corner, and the paste
//! origin is shifted so the glyph block stays centered where the anchor
//! put the unrotated text.

use image::{imageops, DynamicImage, RgbaImage};
use tiny_skia::{FilterQuality, IntSize, Pixmap, PixmapPaint, Transform};
use wmark_core::{
    error::{RenderError, Result},
    types::{Point, TextMask},
    Color, WatermarkStyle, SHADOW_OFFSET,
};

use crate::{blend, Compositor};

/// Transparent border around the text in the glyph buffer
pub const GLYPH_PAD: u32 = 10;

/// Positive degrees turn counter-clockwise
#[derive(Debug, Clone, Copy, Default)]
pub struct RotatedGlyphCompositor;

impl RotatedGlyphCompositor {
    /// Text and shadow on a transparent buffer, text top-left at (pad, pad)
    pub fn glyph_buffer(mask: &TextMask, color: Color) -> RgbaImage {
        let mut buffer = RgbaImage::new(mask.width + 2 * GLYPH_PAD, mask.height + 2 * GLYPH_PAD);
        let at = Point::new(GLYPH_PAD as i32, GLYPH_PAD as i32);
        blend::draw_mask_rgba(
            &mut buffer,
            mask,
            at.offset(SHADOW_OFFSET, SHADOW_OFFSET),
            Color::shadow(),
        );
        blend::draw_mask_rgba(&mut buffer, mask, at, color);
        buffer
    }

    /// Where the rotated buffer goes so its center sits on the text center
    pub fn paste_origin(origin: Point, text_w: u32, text_h: u32, rotated_w: u32, rotated_h: u32) -> Point {
        Point::new(
            origin.x - (rotated_w as i32 - text_w as i32) / 2,
            origin.y - (rotated_h as i32 - text_h as i32) / 2,
        )
    }
}

/// Canvas size that holds a `width` x `height` buffer turned by `degrees`
pub fn expanded_size(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    let radians = degrees.to_radians();
    let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
    let (w, h) = (width as f64, height as f64);
    // The epsilon keeps 90/180 degree turns from growing a pixel on float noise
    let rw = (w * cos + h * sin - 1e-6).ceil().max(1.0);
    let rh = (w * sin + h * cos - 1e-6).ceil().max(1.0);
    (rw as u32, rh as u32)
}

/// Turns `buffer` about its center with bilinear sampling, expanding the canvas
pub fn rotate_expand(buffer: &RgbaImage, degrees: f64) -> Result<RgbaImage> {
    let (sw, sh) = buffer.dimensions();
    let (rw, rh) = expanded_size(sw, sh, degrees);

    let size = IntSize::from_wh(sw, sh).ok_or(RenderError::InvalidDimensions {
        width: sw,
        height: sh,
    })?;
    let source = Pixmap::from_vec(premultiply(buffer), size).ok_or(RenderError::PixmapCreationFailed)?;
    let mut target = Pixmap::new(rw, rh).ok_or(RenderError::PixmapCreationFailed)?;

    // Image space is y-down, so a visual counter-clockwise turn is a negative angle
    let transform = Transform::from_translate(rw as f32 / 2.0, rh as f32 / 2.0)
        .pre_concat(Transform::from_rotate(-degrees as f32))
        .pre_concat(Transform::from_translate(-(sw as f32) / 2.0, -(sh as f32) / 2.0));
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    target.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);

    let mut data = Vec::with_capacity((rw * rh * 4) as usize);
    for px in target.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(rw, rh, data).ok_or_else(|| {
        RenderError::InvalidDimensions {
            width: rw,
            height: rh,
        }
        .into()
    })
}

fn premultiply(buffer: &RgbaImage) -> Vec<u8> {
    let mut data = Vec::with_capacity(buffer.as_raw().len());
    for px in buffer.pixels() {
        let [r, g, b, a] = px.0;
        let scale = |c: u8| ((c as u32 * a as u32 + 127) / 255) as u8;
        data.extend_from_slice(&[scale(r), scale(g), scale(b), a]);
    }
    data
}

impl Compositor for RotatedGlyphCompositor {
    fn name(&self) -> &'static str {
        "rotated"
    }

    fn composite(
        &self,
        image: &mut DynamicImage,
        mask: &TextMask,
        origin: Point,
        style: &WatermarkStyle,
    ) -> Result<()> {
        let buffer = Self::glyph_buffer(mask, style.color);
        let rotated = rotate_expand(&buffer, style.rotation as f64)?;
        let (rw, rh) = rotated.dimensions();
        let paste = Self::paste_origin(origin, mask.width, mask.height, rw, rh);

        log::debug!(
            "rotated {}x{} glyph buffer by {} deg to {}x{}, paste at ({}, {})",
            buffer.width(),
            buffer.height(),
            style.rotation,
            rw,
            rh,
            paste.x,
            paste.y
        );

        if !matches!(image, DynamicImage::ImageRgba8(_)) {
            *image = DynamicImage::ImageRgba8(image.to_rgba8());
        }
        if let DynamicImage::ImageRgba8(target) = image {
            imageops::overlay(target, &rotated, paste.x as i64, paste.y as i64);
        }
        Ok(())
    }
}
