//! External collaborator contracts.
//!
//! The engine does not decode PDFs, render pages, or run OCR itself; those
//! jobs are behind the traits here. [`RawDocument`] is the wire contract
//! for page geometry, so upstream tooling in any language can hand the
//! engine its word and line boxes as JSON.

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::PixelRect;

/// One word as the upstream PDF extractor reports it: pixel-space
/// coordinates with a top-down y-axis (`top` is the distance from the top
/// edge of the page).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawWord {
    pub text: String,
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

/// One drawn vector line: pixel-space endpoints in the PDF's native
/// bottom-up y-axis (`y0`/`y1` measure up from the bottom edge).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawLine {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// Raw geometry of a single page, in PDF points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawPage {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub words: Vec<RawWord>,
    #[serde(default)]
    pub lines: Vec<RawLine>,
}

/// Raw geometry of a whole document, one entry per page in order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub pages: Vec<RawPage>,
}

/// Extracts word and line geometry from PDF bytes.
pub trait GeometrySource {
    fn document_geometry(&self, pdf: &[u8]) -> Result<RawDocument>;
}

/// Renders every page of a PDF to an RGB raster, one image per page.
pub trait PageRenderer {
    fn render_pages(&self, pdf: &[u8]) -> Result<Vec<RgbImage>>;
}

/// Reads text out of a rectangular region of a rendered page.
pub trait OcrEngine {
    /// Recognize the text inside `region` of `image`, trimmed of
    /// surrounding whitespace.
    fn read_region(&self, image: &RgbImage, region: PixelRect) -> Result<String>;

    /// Whether the engine can actually run in this environment.
    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_page_word_and_line_lists_default_to_empty() {
        let page: RawPage =
            serde_json::from_str(r#"{"width": 612.0, "height": 792.0}"#).unwrap();
        assert!(page.words.is_empty());
        assert!(page.lines.is_empty());
    }

    #[test]
    fn raw_document_round_trips() {
        let doc = RawDocument {
            pages: vec![RawPage {
                width: 612.0,
                height: 792.0,
                words: vec![RawWord {
                    text: "Saldo".to_string(),
                    x0: 61.2,
                    top: 79.2,
                    x1: 122.4,
                    bottom: 95.0,
                }],
                lines: vec![RawLine {
                    x0: 61.2,
                    y0: 396.0,
                    x1: 550.8,
                    y1: 396.0,
                }],
            }],
        };
        let json = serde_json::to_string(&doc).unwrap();
        let back: RawDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
