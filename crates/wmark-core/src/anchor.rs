//! Where the watermark lands
//!
//! Nine named anchors cover the corners, edge midpoints and center of the
//! frame. A manual point, when set, replaces the anchor formulas entirely.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::types::{Point, TextExtent};

/// Distance kept between the watermark and the image edge
pub const DEFAULT_MARGIN: i32 = 10;

/// A named reference position on the image frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    LeftCenter,
    Center,
    RightCenter,
    BottomLeft,
    BottomCenter,
    #[default]
    BottomRight,
}

impl Anchor {
    /// All anchors, row by row from the top left
    pub const ALL: [Anchor; 9] = [
        Anchor::TopLeft,
        Anchor::TopCenter,
        Anchor::TopRight,
        Anchor::LeftCenter,
        Anchor::Center,
        Anchor::RightCenter,
        Anchor::BottomLeft,
        Anchor::BottomCenter,
        Anchor::BottomRight,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Anchor::TopLeft => "top_left",
            Anchor::TopCenter => "top_center",
            Anchor::TopRight => "top_right",
            Anchor::LeftCenter => "left_center",
            Anchor::Center => "center",
            Anchor::RightCenter => "right_center",
            Anchor::BottomLeft => "bottom_left",
            Anchor::BottomCenter => "bottom_center",
            Anchor::BottomRight => "bottom_right",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Anchor {
    type Err = ConfigError;

    /// Accepts `top_left` as well as `top-left`, in any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Anchor::ALL
            .into_iter()
            .find(|anchor| anchor.as_str() == normalized)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "anchor",
                value: s.to_string(),
            })
    }
}

/// Named anchor plus an optional manual override
///
/// The two are mutually exclusive per render: choosing a new anchor drops
/// the manual point, and a manual point, while present, always wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    anchor: Anchor,
    manual: Option<Point>,
}

impl Placement {
    pub const fn anchored(anchor: Anchor) -> Self {
        Self {
            anchor,
            manual: None,
        }
    }

    /// Anchor kept for when the override is cleared, point used meanwhile
    pub const fn manual(anchor: Anchor, point: Point) -> Self {
        Self {
            anchor,
            manual: Some(point),
        }
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn manual_point(&self) -> Option<Point> {
        self.manual
    }

    /// Selects a named anchor and clears any manual point
    pub fn set_anchor(&mut self, anchor: Anchor) {
        self.anchor = anchor;
        self.manual = None;
    }

    pub fn set_manual(&mut self, point: Point) {
        self.manual = Some(point);
    }

    pub fn clear_manual(&mut self) {
        self.manual = None;
    }
}

impl From<Anchor> for Placement {
    fn from(anchor: Anchor) -> Self {
        Placement::anchored(anchor)
    }
}

/// Maps a placement to the top-left pixel of the text block
///
/// Midpoints use integer division truncating toward zero. Nothing is
/// clamped: text wider than the image gets negative coordinates and is
/// partially drawn off-canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorResolver {
    margin: i32,
}

impl AnchorResolver {
    pub const fn new(margin: i32) -> Self {
        Self { margin }
    }

    pub fn margin(&self) -> i32 {
        self.margin
    }

    /// Resolves a placement, honoring the manual override first
    pub fn resolve(&self, placement: &Placement, text: TextExtent, img_w: u32, img_h: u32) -> Point {
        match placement.manual_point() {
            Some(point) => point,
            None => self.resolve_anchor(placement.anchor(), text, img_w, img_h),
        }
    }

    /// Applies the anchor formulas
    pub fn resolve_anchor(&self, anchor: Anchor, text: TextExtent, img_w: u32, img_h: u32) -> Point {
        let m = self.margin;
        let (iw, ih) = (img_w as i32, img_h as i32);
        let (tw, th) = (text.width as i32, text.height as i32);

        let left = m;
        let hcenter = (iw - tw) / 2;
        let right = iw - tw - m;
        let top = m;
        let vcenter = (ih - th) / 2;
        let bottom = ih - th - m;

        let (x, y) = match anchor {
            Anchor::TopLeft => (left, top),
            Anchor::TopCenter => (hcenter, top),
            Anchor::TopRight => (right, top),
            Anchor::LeftCenter => (left, vcenter),
            Anchor::Center => (hcenter, vcenter),
            Anchor::RightCenter => (right, vcenter),
            Anchor::BottomLeft => (left, bottom),
            Anchor::BottomCenter => (hcenter, bottom),
            Anchor::BottomRight => (right, bottom),
        };

        Point::new(x, y)
    }
}

impl Default for AnchorResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MARGIN)
    }
}
