//! Color tokens and opacity
//!
//! A watermark color arrives as a user token (a palette name or `#RRGGBB`)
//! plus an opacity percentage. Resolution never fails: anything that does not
//! parse becomes white, which is the most legible default on photos.

use crate::Color;

/// Named colors accepted in place of a hex code
const PALETTE: [(&str, Color); 8] = [
    ("black", Color::rgba(0, 0, 0, 255)),
    ("white", Color::rgba(255, 255, 255, 255)),
    ("red", Color::rgba(255, 0, 0, 255)),
    ("green", Color::rgba(0, 255, 0, 255)),
    ("blue", Color::rgba(0, 0, 255, 255)),
    ("yellow", Color::rgba(255, 255, 0, 255)),
    ("cyan", Color::rgba(0, 255, 255, 255)),
    ("magenta", Color::rgba(255, 0, 255, 255)),
];

/// Resolves color tokens into RGBA values
pub struct ColorSpec;

impl ColorSpec {
    /// Turns a token and an opacity percentage into a color.
    ///
    /// - Palette names match case-insensitively.
    /// - `#RRGGBB` needs exactly six hex digits after the `#`.
    /// - Anything else degrades to white.
    ///
    /// Alpha is `255 * opacity / 100` rounded half up, so 50% gives 128.
    /// Opacity above 100 is treated as 100.
    pub fn resolve(token: &str, opacity_percent: u8) -> Color {
        let rgb = Self::lookup_palette(token)
            .or_else(|| token.strip_prefix('#').and_then(Self::parse_hex))
            .unwrap_or_else(|| {
                log::debug!("Unrecognized color token {:?}, using white", token);
                Color::white()
            });

        Color::rgba(rgb.r, rgb.g, rgb.b, Self::opacity_to_alpha(opacity_percent))
    }

    /// Converts a 0-100 opacity percentage into an 8-bit alpha value
    pub fn opacity_to_alpha(opacity_percent: u8) -> u8 {
        let percent = u32::from(opacity_percent.min(100));
        ((255 * percent + 50) / 100) as u8
    }

    /// Names of all palette colors, in display order
    pub fn palette_names() -> impl Iterator<Item = &'static str> {
        PALETTE.iter().map(|(name, _)| *name)
    }

    fn lookup_palette(token: &str) -> Option<Color> {
        PALETTE
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|(_, color)| *color)
    }

    fn parse_hex(hex: &str) -> Option<Color> {
        // from_str_radix accepts a leading '+', so check the digits first
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::rgba(r, g, b, 255))
    }
}
