//! Fractional coordinate geometry: points, bounding boxes, containment.
//!
//! All layout-derived coordinates are fractions of the page size in [0, 1],
//! measured from the top-left corner. Bounding boxes are canonicalized at
//! construction so `top_left` is never below or right of `bottom_right`,
//! even when a template author supplied the corners the other way around.

use serde::{Deserialize, Serialize};

use crate::model::Word;

/// Containment slack applied to both corners of the target box, in
/// fractional page units. Compensates for OCR and layout jitter.
pub const DEFAULT_CONTAINMENT_THRESHOLD: f64 = 0.005;

/// Round a layout-derived fractional value to 6 decimal places.
pub(crate) fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

/// Round a raw pixel-space value to 2 decimal places.
pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// A point in fractional page coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Corner pair as it appears on the wire, before canonicalization.
#[derive(Deserialize)]
struct BoxCorners {
    top_left: Point,
    bottom_right: Point,
}

impl From<BoxCorners> for BoundingBox {
    fn from(corners: BoxCorners) -> Self {
        BoundingBox::new(corners.top_left, corners.bottom_right)
    }
}

/// An axis-aligned box in fractional page coordinates.
///
/// Invariant: `top_left.x <= bottom_right.x` and `top_left.y <=
/// bottom_right.y`. Deserialization routes through [`BoxCorners`] so the
/// invariant also holds for boxes read from JSON.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "BoxCorners")]
pub struct BoundingBox {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl BoundingBox {
    /// Build a box from two corners, canonicalizing per axis.
    pub fn new(a: Point, b: Point) -> Self {
        BoundingBox {
            top_left: Point::new(a.x.min(b.x), a.y.min(b.y)),
            bottom_right: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Build a box directly from edge coordinates.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        BoundingBox::new(Point::new(left, top), Point::new(right, bottom))
    }

    pub fn width(&self) -> f64 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> f64 {
        self.bottom_right.y - self.top_left.y
    }

    /// Whether `inner` sits inside this box, allowing `threshold` slack on
    /// both corners. The slack expands this box, not `inner`.
    pub fn contains(&self, inner: &BoundingBox, threshold: f64) -> bool {
        inner.top_left.x >= self.top_left.x - threshold
            && inner.top_left.y >= self.top_left.y - threshold
            && inner.bottom_right.x <= self.bottom_right.x + threshold
            && inner.bottom_right.y <= self.bottom_right.y + threshold
    }

    /// Convert to a pixel rectangle against an image of `width` x `height`.
    ///
    /// Fractional values are truncated toward zero, then clamped to the
    /// image bounds; slack-expanded boxes can otherwise poke past an edge.
    pub fn to_pixel_rect(&self, width: u32, height: u32) -> PixelRect {
        let clamp = |v: f64, max: u32| -> u32 {
            let px = v as i64;
            px.clamp(0, i64::from(max)) as u32
        };
        PixelRect {
            x_min: clamp(self.top_left.x * f64::from(width), width),
            y_min: clamp(self.top_left.y * f64::from(height), height),
            x_max: clamp(self.bottom_right.x * f64::from(width), width),
            y_max: clamp(self.bottom_right.y * f64::from(height), height),
        }
    }
}

/// A rectangle in whole-pixel image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x_min: u32,
    pub y_min: u32,
    pub x_max: u32,
    pub y_max: u32,
}

impl PixelRect {
    pub fn width(&self) -> u32 {
        self.x_max.saturating_sub(self.x_min)
    }

    pub fn height(&self) -> u32 {
        self.y_max.saturating_sub(self.y_min)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Every word whose fractional bounding box falls inside `bbox`, in input
/// order.
pub fn words_in_box<'a>(words: &'a [Word], bbox: &BoundingBox, threshold: f64) -> Vec<&'a Word> {
    words
        .iter()
        .filter(|word| bbox.contains(&word.bounding_box.decimal_coordinates, threshold))
        .collect()
}
