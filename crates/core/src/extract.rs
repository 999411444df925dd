//! Cell text extraction: positional, OCR, or regex.

use image::RgbImage;
use itertools::Itertools;
use regex::Regex;

use crate::error::{ParseError, Result};
use crate::geometry::{words_in_box, BoundingBox, DEFAULT_CONTAINMENT_THRESHOLD};
use crate::model::Word;
use crate::source::OcrEngine;
use crate::template::{ExtractionMethod, SearchType};

/// Resolves one bounding box (or a full-page regex) to a text value.
///
/// The extraction method is fixed per template, so one extractor serves a
/// whole parse. OCR extraction additionally needs an engine; positional
/// extraction works without one.
pub struct CellExtractor<'a> {
    method: ExtractionMethod,
    ocr: Option<&'a dyn OcrEngine>,
}

impl<'a> CellExtractor<'a> {
    pub fn new(method: ExtractionMethod) -> Self {
        CellExtractor { method, ocr: None }
    }

    pub fn with_ocr(method: ExtractionMethod, ocr: &'a dyn OcrEngine) -> Self {
        CellExtractor {
            method,
            ocr: Some(ocr),
        }
    }

    /// Extract one text value from a page.
    ///
    /// A regex search runs against the whole page text and wins over the
    /// box entirely; otherwise a missing box yields an empty string, and
    /// the box is resolved by the configured method.
    pub fn extract(
        &self,
        words: &[Word],
        bbox: Option<&BoundingBox>,
        image: Option<&RgbImage>,
        search_type: Option<SearchType>,
        pattern: Option<&str>,
    ) -> Result<String> {
        if search_type == Some(SearchType::Regex) {
            if let Some(pattern) = pattern.filter(|p| !p.is_empty()) {
                return Ok(regex_search(words, pattern));
            }
        }
        let Some(bbox) = bbox else {
            return Ok(String::new());
        };
        match self.method {
            ExtractionMethod::Extraction => Ok(join_words_in_box(words, bbox)),
            ExtractionMethod::Ocr => self.ocr_region(bbox, image),
        }
    }

    fn ocr_region(&self, bbox: &BoundingBox, image: Option<&RgbImage>) -> Result<String> {
        let engine = self.ocr.ok_or(ParseError::OcrUnavailable)?;
        let image = image.ok_or_else(|| ParseError::Ocr("no page image supplied".to_string()))?;
        let region = bbox.to_pixel_rect(image.width(), image.height());
        if region.is_empty() {
            return Ok(String::new());
        }
        engine.read_region(image, region)
    }
}

/// Space-joined text of the words inside `bbox`, in input order.
fn join_words_in_box(words: &[Word], bbox: &BoundingBox) -> String {
    words_in_box(words, bbox, DEFAULT_CONTAINMENT_THRESHOLD)
        .iter()
        .map(|word| word.text.as_str())
        .join(" ")
}

/// First match of `pattern` against the space-joined page text.
///
/// Patterns with capture groups yield the first group (empty if it did not
/// participate in the match), bare patterns the whole match. A pattern
/// that fails to compile is reported and treated as no match.
fn regex_search(words: &[Word], pattern: &str) -> String {
    let regex = match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => {
            tracing::warn!(pattern, %err, "invalid regex pattern, returning empty match");
            return String::new();
        }
    };
    let page_text = words.iter().map(|word| word.text.as_str()).join(" ");
    let Some(captures) = regex.captures(&page_text) else {
        return String::new();
    };
    let group = if regex.captures_len() > 1 {
        captures.get(1)
    } else {
        captures.get(0)
    };
    group.map(|m| m.as_str().to_string()).unwrap_or_default()
}
