//! Live preview: the export render, scaled to fit a view box
//!
//! The preview goes through [`WatermarkEngine::render`] like the export does,
//! so what the user drags around is what gets written.

use image::{imageops, imageops::FilterType, DynamicImage, RgbImage};
use wmark_core::{types::Point, Placement, WatermarkStyle};

use crate::WatermarkEngine;

/// Renders on a copy of `image` and shrinks the result to fit `max_w` x `max_h`
///
/// Images already inside the box are not enlarged.
pub fn render_preview(
    engine: &WatermarkEngine,
    image: &DynamicImage,
    style: &WatermarkStyle,
    placement: &Placement,
    max_w: u32,
    max_h: u32,
) -> RgbImage {
    let rendered = engine.render(image.clone(), style, placement).to_rgb8();
    let (w, h) = rendered.dimensions();
    let (tw, th) = fit_within(w, h, max_w, max_h);
    if (tw, th) == (w, h) {
        return rendered;
    }
    log::debug!("preview {}x{} -> {}x{}", w, h, tw, th);
    imageops::resize(&rendered, tw, th, FilterType::Triangle)
}

/// Largest size with the same aspect ratio that fits the box
pub fn fit_within(w: u32, h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if w <= max_w && h <= max_h {
        return (w, h);
    }
    let ratio = f64::min(max_w as f64 / w as f64, max_h as f64 / h as f64);
    (
        ((w as f64 * ratio) as u32).max(1),
        ((h as f64 * ratio) as u32).max(1),
    )
}

/// Maps pointer positions in a preview box back to image pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewMapping {
    scale: f64,
}

impl PreviewMapping {
    pub fn new(img_w: u32, img_h: u32, box_w: u32, box_h: u32) -> Self {
        let scale = f64::min(
            img_w as f64 / box_w.max(1) as f64,
            img_h as f64 / box_h.max(1) as f64,
        );
        Self { scale }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Image pixel under the pointer, truncated toward zero
    pub fn to_image(&self, x: i32, y: i32) -> Point {
        Point::new(
            (x as f64 * self.scale) as i32,
            (y as f64 * self.scale) as i32,
        )
    }

    /// A drag to (x, y) becomes the manual override point
    pub fn drag(&self, placement: &mut Placement, x: i32, y: i32) {
        placement.set_manual(self.to_image(x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wmark_core::Anchor;

    #[test]
    fn test_fit_within() {
        assert_eq!(fit_within(400, 300, 800, 600), (400, 300));
        assert_eq!(fit_within(1600, 1200, 800, 600), (800, 600));
        assert_eq!(fit_within(2000, 500, 800, 600), (800, 200));
        assert_eq!(fit_within(10_000, 1, 100, 100), (100, 1));
    }

    #[test]
    fn test_mapping_uses_smaller_ratio() {
        // 4000x3000 photo in an 800x700 box: min(5.0, 4.2857..)
        let mapping = PreviewMapping::new(4000, 3000, 800, 700);
        assert_eq!(mapping.to_image(100, 71), Point::new(428, 304));
    }

    #[test]
    fn test_drag_sets_manual_point() {
        let mapping = PreviewMapping::new(1000, 1000, 500, 500);
        let mut placement = Placement::anchored(Anchor::TopLeft);
        mapping.drag(&mut placement, 45, 45);
        assert_eq!(placement.manual_point(), Some(Point::new(90, 90)));

        placement.set_anchor(Anchor::Center);
        assert_eq!(placement.manual_point(), None);
    }
}
