//! Normalized per-page extraction data.
//!
//! Built once per input document by [`crate::normalize`], then consumed
//! read-only by the parser. The JSON field names match the artifacts the
//! engine has always produced, so saved documents remain loadable.

use serde::{Deserialize, Serialize};

use crate::geometry::BoundingBox;

/// Pixel-space and fractional bounding boxes for one word.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordBounds {
    /// Raw pixel-space box, rounded to 2 decimal places.
    pub coordinates: BoundingBox,
    /// Page-size-independent box in [0, 1], rounded to 6 decimal places.
    pub decimal_coordinates: BoundingBox,
}

/// One recognized word on a page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub bounding_box: WordBounds,
}

/// One drawn vector line on a page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub decimal_coordinates: BoundingBox,
    /// Average RGB sampled from the rendered page over the line's
    /// footprint.
    pub average_pixel_value: [u8; 3],
}

/// Words and lines of a single page, top-down fractional coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageData {
    /// 1-based position in the source document.
    pub page_number: usize,
    pub content: Vec<Word>,
    pub lines: Vec<LineSegment>,
}

/// First-page dimensions in PDF points, rounded to 2 decimal places.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// Everything the parser needs from one document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentData {
    pub number_of_pages: usize,
    pub dimensions: Dimensions,
    pub pages: Vec<PageData>,
}
