//! Source-over blending of a coverage mask into 8-bit buffers

use image::{DynamicImage, RgbImage, RgbaImage};
use wmark_core::{types::Point, types::TextMask, Color};

/// Color alpha scaled by mask coverage, rounded
#[inline]
fn effective_alpha(color_alpha: u8, coverage: u8) -> u8 {
    ((color_alpha as u32 * coverage as u32 + 127) / 255) as u8
}

/// `src` over an opaque pixel
#[inline]
pub(crate) fn over_rgb(dst: [u8; 3], src: [u8; 3], alpha: u8) -> [u8; 3] {
    let a = alpha as u32;
    let mut out = [0u8; 3];
    for i in 0..3 {
        out[i] = ((src[i] as u32 * a + dst[i] as u32 * (255 - a) + 127) / 255) as u8;
    }
    out
}

/// `src` over a pixel with straight alpha
#[inline]
pub(crate) fn over_rgba(dst: [u8; 4], src: [u8; 3], alpha: u8) -> [u8; 4] {
    let a = alpha as u32;
    let da = dst[3] as u32;
    // Output alpha, scaled by 255
    let out_a = a * 255 + da * (255 - a);
    if out_a == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = src[i] as u32 * a * 255 + dst[i] as u32 * da * (255 - a);
        out[i] = ((c + out_a / 2) / out_a) as u8;
    }
    out[3] = ((out_a + 127) / 255) as u8;
    out
}

/// Mask pixels that land inside a `width` x `height` target
///
/// Yields (mask x, mask y, target x, target y). Off-canvas pixels are
/// dropped, which is how oversized or negative placements degrade.
fn visible(
    mask: &TextMask,
    origin: Point,
    width: u32,
    height: u32,
) -> impl Iterator<Item = (u32, u32, u32, u32)> + '_ {
    let (w, h) = (width as i64, height as i64);
    (0..mask.height).flat_map(move |my| {
        (0..mask.width).filter_map(move |mx| {
            let tx = origin.x as i64 + mx as i64;
            let ty = origin.y as i64 + my as i64;
            if tx < 0 || ty < 0 || tx >= w || ty >= h {
                None
            } else {
                Some((mx, my, tx as u32, ty as u32))
            }
        })
    })
}

pub fn draw_mask_rgb(image: &mut RgbImage, mask: &TextMask, origin: Point, color: Color) {
    let (width, height) = image.dimensions();
    let src = [color.r, color.g, color.b];
    for (mx, my, tx, ty) in visible(mask, origin, width, height) {
        let alpha = effective_alpha(color.a, mask.get(mx, my));
        if alpha == 0 {
            continue;
        }
        let px = image.get_pixel_mut(tx, ty);
        px.0 = over_rgb(px.0, src, alpha);
    }
}

pub fn draw_mask_rgba(image: &mut RgbaImage, mask: &TextMask, origin: Point, color: Color) {
    let (width, height) = image.dimensions();
    let src = [color.r, color.g, color.b];
    for (mx, my, tx, ty) in visible(mask, origin, width, height) {
        let alpha = effective_alpha(color.a, mask.get(mx, my));
        if alpha == 0 {
            continue;
        }
        let px = image.get_pixel_mut(tx, ty);
        px.0 = over_rgba(px.0, src, alpha);
    }
}

/// Draws into an 8-bit RGB or RGBA image; other layouts are left untouched
///
/// The engine normalizes images before they reach a compositor, so the
/// fallthrough only logs.
pub fn draw_mask(image: &mut DynamicImage, mask: &TextMask, origin: Point, color: Color) {
    match image {
        DynamicImage::ImageRgb8(buf) => draw_mask_rgb(buf, mask, origin, color),
        DynamicImage::ImageRgba8(buf) => draw_mask_rgba(buf, mask, origin, color),
        other => log::debug!("draw_mask: unsupported color type {:?}", other.color()),
    }
}
