// this_file: crates/wmark-batch/src/types.rs

//! The style descriptor shared by the CLI, templates and saved settings.
//!
//! Files written by older releases stored numbers as display strings
//! (`"30"`, `"80%"`) and the position as a list index. Those shapes are
//! still read, but the migration is one way: saving writes plain numbers
//! and anchor names, so an old record comes back in the current shape.
//! Values keep their meaning; only their spelling changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use wmark_core::{types::Point, Anchor, Placement, WatermarkStyle, DEFAULT_TEXT};

/// Font size used when nothing else is configured
pub const DEFAULT_FONT_SIZE: u32 = 30;
/// Color token used when nothing else is configured
pub const DEFAULT_COLOR: &str = "white";
/// Opacity percentage used when nothing else is configured
pub const DEFAULT_OPACITY: u8 = 80;

/// Everything needed to watermark one image, in user-facing units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleDescriptor {
    /// Literal watermark text; empty means the default text
    pub text: String,
    /// Use each image's capture date instead of `text`
    pub use_date: bool,
    /// Requested font size in pixels
    #[serde(deserialize_with = "legacy::font_size")]
    pub font_size: u32,
    /// Named anchor
    #[serde(deserialize_with = "legacy::anchor")]
    pub position: Anchor,
    /// Palette name or `#RRGGBB`
    pub color: String,
    /// 0 to 100
    #[serde(deserialize_with = "legacy::opacity")]
    pub opacity: u8,
    /// Counter-clockwise degrees, -180 to 180
    #[serde(deserialize_with = "legacy::rotation")]
    pub rotation: i32,
    /// Dragged position, overriding `position` while set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_position: Option<Point>,
}

impl Default for StyleDescriptor {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            use_date: false,
            font_size: DEFAULT_FONT_SIZE,
            position: Anchor::default(),
            color: DEFAULT_COLOR.to_string(),
            opacity: DEFAULT_OPACITY,
            rotation: 0,
            manual_position: None,
        }
    }
}

impl StyleDescriptor {
    /// Text to stamp on the image at `path`
    pub fn text_for(&self, path: &Path) -> String {
        if self.use_date {
            wmark_input::capture_date(path)
        } else {
            self.text.clone()
        }
    }

    /// Engine style for `text`, with the color resolved
    pub fn to_style(&self, text: &str) -> WatermarkStyle {
        WatermarkStyle::from_tokens(text, self.font_size, &self.color, self.opacity, self.rotation)
    }

    /// Anchor plus the manual override, if any
    pub fn placement(&self) -> Placement {
        match self.manual_position {
            Some(point) => Placement::manual(self.position, point),
            None => Placement::anchored(self.position),
        }
    }

    /// Changes the anchor and drops any manual position
    pub fn set_position(&mut self, anchor: Anchor) {
        self.position = anchor;
        self.manual_position = None;
    }
}

/// Lenient readers for fields older files stored as display strings
mod legacy {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use wmark_core::Anchor;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Int(i64),
        Float(f64),
        Text(String),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AnchorToken {
        Index(u64),
        Name(String),
    }

    fn number<'de, D: Deserializer<'de>>(deserializer: D, field: &str) -> Result<i64, D::Error> {
        match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Int(n) => Ok(n),
            NumberOrText::Float(f) => Ok(f.round() as i64),
            NumberOrText::Text(s) => s
                .trim()
                .trim_end_matches(['%', '°'])
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid {}: {:?}", field, s))),
        }
    }

    pub fn font_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        Ok(number(deserializer, "font_size")?.clamp(1, u32::MAX as i64) as u32)
    }

    pub fn opacity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
        Ok(number(deserializer, "opacity")?.clamp(0, 100) as u8)
    }

    pub fn rotation<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
        Ok(number(deserializer, "rotation")?.clamp(-180, 180) as i32)
    }

    pub fn anchor<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Anchor, D::Error> {
        match AnchorToken::deserialize(deserializer)? {
            AnchorToken::Index(i) => Anchor::ALL
                .get(i as usize)
                .copied()
                .ok_or_else(|| D::Error::custom(format!("invalid position index {}", i))),
            AnchorToken::Name(name) => name.parse().map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wmark_core::Color;

    #[test]
    fn test_defaults() {
        let d = StyleDescriptor::default();
        assert_eq!(d.font_size, 30);
        assert_eq!(d.position, Anchor::BottomRight);
        assert_eq!(d.to_style("x").color, Color::rgba(255, 255, 255, 204));
    }

    #[test]
    fn test_reads_legacy_shapes() {
        let json = r##"{"text": "hi", "use_date": false, "font_size": "45",
            "position": 4, "color": "#FF0000", "opacity": "60%", "rotation": 30}"##;
        let d: StyleDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.font_size, 45);
        assert_eq!(d.position, Anchor::Center);
        assert_eq!(d.opacity, 60);
        assert_eq!(d.rotation, 30);
    }

    #[test]
    fn test_reads_current_shapes_and_fills_defaults() {
        let json = r#"{"position": "top_left", "opacity": 150, "rotation": -400}"#;
        let d: StyleDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.position, Anchor::TopLeft);
        assert_eq!(d.opacity, 100);
        assert_eq!(d.rotation, -180);
        assert_eq!(d.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(d.text, DEFAULT_TEXT);
    }

    #[test]
    fn test_rejects_bad_position() {
        assert!(serde_json::from_str::<StyleDescriptor>(r#"{"position": 9}"#).is_err());
        assert!(serde_json::from_str::<StyleDescriptor>(r#"{"position": "middle"}"#).is_err());
    }

    #[test]
    fn test_manual_position_drives_placement() {
        let mut d = StyleDescriptor {
            manual_position: Some(Point::new(90, 90)),
            ..StyleDescriptor::default()
        };
        assert_eq!(d.placement().manual_point(), Some(Point::new(90, 90)));

        d.set_position(Anchor::TopLeft);
        assert_eq!(d.placement(), Placement::anchored(Anchor::TopLeft));
    }

    #[test]
    fn test_serializes_plain_values() {
        let json = serde_json::to_value(StyleDescriptor::default()).unwrap();
        assert_eq!(json["position"], "bottom_right");
        assert_eq!(json["opacity"], 80);
        assert!(json.get("manual_position").is_none());
    }
}
