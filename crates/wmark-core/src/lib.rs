//! wmark core: the data that flows into the watermark engine
//!
//! A watermark render takes an image, a [`WatermarkStyle`] and a
//! [`Placement`], and burns the text into the pixels. This crate holds the
//! pieces every other crate agrees on:
//!
//! - [`ColorSpec`] - color tokens and opacity become an RGBA value
//! - [`AnchorResolver`] - named anchors or a manual point become a pixel origin
//! - [`traits::GlyphFace`] - the font seam: measure and rasterize a line of text
//! - [`types`] - extents, coverage masks and points
//!
//! ```
//! use wmark_core::{Anchor, AnchorResolver, ColorSpec, Placement};
//! use wmark_core::types::{Point, TextExtent};
//!
//! let color = ColorSpec::resolve("red", 50);
//! assert_eq!((color.r, color.g, color.b, color.a), (255, 0, 0, 128));
//!
//! let text = TextExtent { width: 50, height: 20 };
//! let origin = AnchorResolver::default().resolve(&Placement::anchored(Anchor::Center), text, 200, 100);
//! assert_eq!(origin, Point::new(75, 40));
//! ```

pub mod anchor;
pub mod cache_config;
pub mod color;
pub mod error;
pub mod traits;

pub use anchor::{Anchor, AnchorResolver, Placement, DEFAULT_MARGIN};
pub use color::ColorSpec;
pub use error::{ConfigError, Result, WmarkError};
pub use traits::GlyphFace;

/// Text used when the caller supplies an empty string
pub const DEFAULT_TEXT: &str = "Watermark";

/// Drop shadow offset in pixels, applied on both axes
pub const SHADOW_OFFSET: i32 = 1;

/// Values passed between the font layer and the compositors
pub mod types {
    /// An integer pixel position, origin at the top-left of the image
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Point {
        pub x: i32,
        pub y: i32,
    }

    impl Point {
        pub const fn new(x: i32, y: i32) -> Self {
            Self { x, y }
        }

        pub const fn offset(self, dx: i32, dy: i32) -> Self {
            Self::new(self.x + dx, self.y + dy)
        }
    }

    /// Measured size of a rendered line of text, in pixels
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextExtent {
        pub width: u32,
        pub height: u32,
    }

    /// A line of text rasterized to 8-bit coverage
    ///
    /// The mask is exactly as large as the text block, so its dimensions are
    /// the text extent. Drawing the mask at an origin puts its top-left pixel
    /// there.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct TextMask {
        pub width: u32,
        pub height: u32,
        /// Row-major coverage, one byte per pixel
        pub coverage: Vec<u8>,
    }

    impl TextMask {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                coverage: vec![0; (width as usize) * (height as usize)],
            }
        }

        pub fn extent(&self) -> TextExtent {
            TextExtent {
                width: self.width,
                height: self.height,
            }
        }

        pub fn is_empty(&self) -> bool {
            self.width == 0 || self.height == 0
        }

        /// Coverage at (x, y); zero outside the mask
        pub fn get(&self, x: u32, y: u32) -> u8 {
            if x >= self.width || y >= self.height {
                return 0;
            }
            self.coverage[(y * self.width + x) as usize]
        }
    }
}

/// Simple RGBA color, straight (not premultiplied) alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::rgba(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::rgba(255, 255, 255, 255)
    }

    /// The half-transparent black drawn one pixel behind the text
    pub const fn shadow() -> Self {
        Self::rgba(0, 0, 0, 128)
    }
}

/// What to write and how it should look
///
/// Built fresh for every render. The color's alpha already carries the
/// opacity; use [`WatermarkStyle::from_tokens`] to derive it from a
/// percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkStyle {
    pub text: String,
    /// Requested size in pixels; bitmap fallbacks may ignore it
    pub font_size: u32,
    pub color: Color,
    /// Counter-clockwise degrees, expected within [-180, 180]
    pub rotation: i32,
}

impl WatermarkStyle {
    pub fn new(text: impl Into<String>, font_size: u32, color: Color) -> Self {
        Self {
            text: text.into(),
            font_size: font_size.max(1),
            color,
            rotation: 0,
        }
    }

    /// Builds a style from user-facing tokens, resolving the color on the way
    pub fn from_tokens(
        text: impl Into<String>,
        font_size: u32,
        color_token: &str,
        opacity_percent: u8,
        rotation: i32,
    ) -> Self {
        Self::new(text, font_size, ColorSpec::resolve(color_token, opacity_percent))
            .with_rotation(rotation)
    }

    pub fn with_rotation(mut self, degrees: i32) -> Self {
        self.rotation = degrees;
        self
    }

    /// The text to draw, falling back to [`DEFAULT_TEXT`] when empty
    pub fn effective_text(&self) -> &str {
        if self.text.is_empty() {
            DEFAULT_TEXT
        } else {
            &self.text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::types::*;
    use super::*;

    #[test]
    fn test_empty_text_uses_default() {
        let style = WatermarkStyle::new("", 30, Color::white());
        assert_eq!(style.effective_text(), DEFAULT_TEXT);

        let style = WatermarkStyle::new("2024-05-01", 30, Color::white());
        assert_eq!(style.effective_text(), "2024-05-01");
    }

    #[test]
    fn test_font_size_is_at_least_one() {
        assert_eq!(WatermarkStyle::new("a", 0, Color::white()).font_size, 1);
    }

    #[test]
    fn test_from_tokens_resolves_color() {
        let style = WatermarkStyle::from_tokens("x", 30, "#0000ff", 50, -45);
        assert_eq!(style.color, Color::rgba(0, 0, 255, 128));
        assert_eq!(style.rotation, -45);
    }

    #[test]
    fn test_mask_get_outside_is_zero() {
        let mut mask = TextMask::new(2, 2);
        mask.coverage[3] = 200;
        assert_eq!(mask.get(1, 1), 200);
        assert_eq!(mask.get(2, 0), 0);
        assert_eq!(mask.extent(), TextExtent { width: 2, height: 2 });
    }
}
