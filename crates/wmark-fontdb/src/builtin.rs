//! The face that always loads
//!
//! A 5x7 ASCII bitmap font compiled into the binary. It is the last link of
//! every font chain, so a render never fails for lack of fonts. It draws at
//! a fixed scale and ignores the requested size.

use wmark_core::{
    error::Result,
    traits::GlyphFace,
    types::{TextExtent, TextMask},
};

/// Glyph cell width in font pixels (5 columns plus 1 spacing)
const CELL_WIDTH: u32 = 6;
const GLYPH_COLUMNS: u32 = 5;
const GLYPH_ROWS: u32 = 7;

/// Each font pixel becomes a SCALE x SCALE block
pub const BUILTIN_SCALE: u32 = 2;

/// Drawn for characters outside the table
const NOTDEF: [u8; 5] = [0x7F, 0x41, 0x41, 0x41, 0x7F];

/// U+0020..=U+007E, one byte per column, bit 0 is the top row
const GLYPHS: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x14, 0x08, 0x3E, 0x08, 0x14], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x26, 0x49, 0x49, 0x49, 0x32], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x07, 0x08, 0x70, 0x08, 0x07], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x7F, 0x41, 0x41, 0x00], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // backslash
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x7F, 0x10, 0x28, 0x44, 0x00], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x08, 0x04, 0x08, 0x10, 0x08], // ~
];

fn glyph_columns(ch: char) -> &'static [u8; 5] {
    let code = ch as u32;
    if (0x20..=0x7E).contains(&code) {
        &GLYPHS[(code - 0x20) as usize]
    } else {
        &NOTDEF
    }
}

/// Fixed-size bitmap face
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFace;

impl BuiltinFace {
    pub fn new() -> Self {
        Self
    }

    fn extent_for(char_count: u32) -> TextExtent {
        let width = if char_count == 0 {
            0
        } else {
            // The trailing spacing column is not part of the text block
            (char_count * CELL_WIDTH - (CELL_WIDTH - GLYPH_COLUMNS)) * BUILTIN_SCALE
        };
        TextExtent {
            width,
            height: GLYPH_ROWS * BUILTIN_SCALE,
        }
    }
}

impl GlyphFace for BuiltinFace {
    fn name(&self) -> &str {
        "builtin-5x7"
    }

    fn pixel_size(&self) -> f32 {
        (GLYPH_ROWS * BUILTIN_SCALE) as f32
    }

    fn rasterize(&self, text: &str) -> Result<TextMask> {
        let extent = self.measure(text)?;
        let mut mask = TextMask::new(extent.width, extent.height);

        for (index, ch) in text.chars().enumerate() {
            let cell_x = index as u32 * CELL_WIDTH;
            for (col, bits) in glyph_columns(ch).iter().enumerate() {
                for row in 0..GLYPH_ROWS {
                    if bits & (1 << row) == 0 {
                        continue;
                    }
                    let x0 = (cell_x + col as u32) * BUILTIN_SCALE;
                    let y0 = row * BUILTIN_SCALE;
                    for dy in 0..BUILTIN_SCALE {
                        let start = ((y0 + dy) * mask.width + x0) as usize;
                        mask.coverage[start..start + BUILTIN_SCALE as usize].fill(255);
                    }
                }
            }
        }

        Ok(mask)
    }

    fn measure(&self, text: &str) -> Result<TextExtent> {
        Ok(Self::extent_for(text.chars().count() as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_ignores_requested_size() {
        let face = BuiltinFace::new();
        assert_eq!(face.measure("H").unwrap(), TextExtent { width: 10, height: 14 });
        assert_eq!(face.measure("HH").unwrap(), TextExtent { width: 22, height: 14 });
        assert_eq!(face.measure("").unwrap(), TextExtent { width: 0, height: 14 });
    }

    #[test]
    fn test_measure_matches_rasterize() {
        let face = BuiltinFace::new();
        for text in ["H", "2024-05-01", "Watermark", "é"] {
            let mask = face.rasterize(text).unwrap();
            assert_eq!(mask.extent(), face.measure(text).unwrap(), "text {:?}", text);
        }
    }

    #[test]
    fn test_h_glyph_pixels() {
        let mask = BuiltinFace::new().rasterize("H").unwrap();
        // Left stem, full height
        assert_eq!(mask.get(0, 0), 255);
        assert_eq!(mask.get(1, 13), 255);
        // Crossbar on font row 3
        assert_eq!(mask.get(4, 6), 255);
        assert_eq!(mask.get(4, 5), 0);
        // Right stem
        assert_eq!(mask.get(9, 0), 255);
    }

    #[test]
    fn test_space_is_blank() {
        let mask = BuiltinFace::new().rasterize(" ").unwrap();
        assert!(mask.coverage.iter().all(|&c| c == 0));
    }

    #[test]
    fn test_unknown_char_draws_box() {
        let mask = BuiltinFace::new().rasterize("水").unwrap();
        assert_eq!(mask.get(0, 0), 255);
        assert_eq!(mask.get(4, 6), 0);
        assert_eq!(mask.get(9, 13), 255);
    }
}
