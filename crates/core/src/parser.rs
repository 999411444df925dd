//! Template-driven document parsing.
//!
//! The parser walks the template's page rules in order, resolves each
//! `page_numbers` spec against the normalized document, and evaluates the
//! referenced form and table rules. A rule that cannot be evaluated for
//! data-specific reasons (dangling id, page out of range, missing raster,
//! wrong rule kind, unresolvable delimiter column) is logged and skipped;
//! template-level problems abort the parse before any rule runs.

use image::RgbImage;

use crate::error::{ParseError, Result};
use crate::extract::CellExtractor;
use crate::form::evaluate_form_rule;
use crate::model::{DocumentData, PageData};
use crate::output::{Metadata, OutputDocument, OutputPage, TableOutput};
use crate::source::OcrEngine;
use crate::table::evaluate_table_rule;
use crate::template::{ExtractionMethod, Template};

/// Resolve a `page_numbers` spec to 0-based page indices.
///
/// A single spec is 1-based (`"1"` is the first page) with negative
/// values counting from the end (`"-1"` is the last page). A `"L:R"`
/// range decrements strictly positive endpoints, maps negative endpoints
/// to `number_of_pages + value + 1`, then yields the half-open range
/// between them; equal endpoints yield that single index and an inverted
/// range yields nothing. Indices are not bounds-checked here; an
/// out-of-range index surfaces per rule during evaluation.
pub fn resolve_page_indices(spec: &str, number_of_pages: usize) -> Result<Vec<i64>> {
    let pages = number_of_pages as i64;
    let parse = |part: &str| -> Result<i64> {
        part.parse::<i64>()
            .map_err(|_| ParseError::PageRange(spec.to_string()))
    };

    let Some((left, right)) = spec.split_once(':') else {
        let n = parse(spec)?;
        let index = if n >= 0 { n - 1 } else { pages + n };
        return Ok(vec![index]);
    };

    let mut left = parse(left)?;
    let mut right = parse(right)?;
    if left > 0 {
        left -= 1;
    }
    if right > 0 {
        right -= 1;
    }
    if left < 0 {
        left = pages + left + 1;
    }
    if right < 0 {
        right = pages + right + 1;
    }

    if left == right {
        return Ok(vec![left]);
    }
    Ok((left..right).collect())
}

/// Rule-driven extraction over one normalized document.
pub struct Parser<'a> {
    ocr: Option<&'a dyn OcrEngine>,
}

impl<'a> Parser<'a> {
    /// A parser for positional extraction; OCR templates are rejected.
    pub fn new() -> Self {
        Parser { ocr: None }
    }

    /// A parser that can also serve OCR templates through `ocr`.
    pub fn with_ocr(ocr: &'a dyn OcrEngine) -> Self {
        Parser { ocr: Some(ocr) }
    }

    /// Parse one document with one template.
    ///
    /// `images` holds the rendered page rasters in page order; it may be
    /// empty for positional extraction. Returns the assembled output
    /// document, or a fatal error for template-level problems. Per-rule
    /// failures are logged and skipped (see module docs).
    pub fn parse(
        &self,
        template: &Template,
        data: &DocumentData,
        images: &[RgbImage],
    ) -> Result<OutputDocument> {
        template.validate()?;
        if template.extraction_method == ExtractionMethod::Ocr && self.ocr.is_none() {
            return Err(ParseError::OcrUnavailable);
        }
        let extractor = match self.ocr {
            Some(ocr) => CellExtractor::with_ocr(template.extraction_method, ocr),
            None => CellExtractor::new(template.extraction_method),
        };

        let number_of_pages = data.pages.len();
        let mut forms = Vec::new();
        let mut tables = Vec::new();

        for page_rule in &template.pages {
            let indices = resolve_page_indices(&page_rule.page_numbers, number_of_pages)?;
            for &page_index in &indices {
                for rule_id in &page_rule.forms {
                    let result = self
                        .locate(template, page_index, data, images)
                        .and_then(|(page, image)| {
                            evaluate_form_rule(template, rule_id, page, image, &extractor)
                        });
                    match result {
                        Ok(form) => forms.push(form),
                        Err(err) if err.is_rule_skip() => {
                            tracing::warn!(%rule_id, page_index, %err, "skipping form rule");
                        }
                        Err(err) => return Err(err),
                    }
                }
                for rule_id in &page_rule.tables {
                    let result = self
                        .locate(template, page_index, data, images)
                        .and_then(|(page, image)| {
                            evaluate_table_rule(template, rule_id, page, image, &extractor)
                        });
                    match result {
                        Ok(rows) => tables.push(TableOutput { data: rows }),
                        Err(err) if err.is_rule_skip() => {
                            tracing::warn!(%rule_id, page_index, %err, "skipping table rule");
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
        }

        Ok(OutputDocument {
            metadata: Metadata::fresh(number_of_pages),
            pages: vec![OutputPage { forms, tables }],
        })
    }

    /// Parse and serialize in one step.
    pub fn parse_to_json(
        &self,
        template: &Template,
        data: &DocumentData,
        images: &[RgbImage],
    ) -> Result<String> {
        self.parse(template, data, images)?.to_json()
    }

    /// Resolve one page index to its data and, when the method needs it,
    /// its rendered raster.
    fn locate<'d>(
        &self,
        template: &Template,
        page_index: i64,
        data: &'d DocumentData,
        images: &'d [RgbImage],
    ) -> Result<(&'d PageData, Option<&'d RgbImage>)> {
        let index = usize::try_from(page_index)
            .ok()
            .filter(|&i| i < data.pages.len())
            .ok_or(ParseError::PageOutOfRange {
                index: page_index,
                pages: data.pages.len(),
            })?;
        let page = &data.pages[index];
        let image = match template.extraction_method {
            ExtractionMethod::Ocr => Some(
                images
                    .get(index)
                    .ok_or(ParseError::MissingPageImage(page_index))?,
            ),
            ExtractionMethod::Extraction => images.get(index),
        };
        Ok((page, image))
    }
}

impl Default for Parser<'_> {
    fn default() -> Self {
        Parser::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_index_is_one_based() {
        assert_eq!(resolve_page_indices("1", 5).unwrap(), vec![0]);
        assert_eq!(resolve_page_indices("3", 3).unwrap(), vec![2]);
    }

    #[test]
    fn negative_index_counts_from_the_end() {
        assert_eq!(resolve_page_indices("-1", 5).unwrap(), vec![4]);
        assert_eq!(resolve_page_indices("-5", 5).unwrap(), vec![0]);
    }

    #[test]
    fn zero_resolves_out_of_range() {
        // There is no page "0"; the resolved index is invalid on purpose
        // and the parser skips the rule when it tries to use it.
        assert_eq!(resolve_page_indices("0", 5).unwrap(), vec![-1]);
    }

    #[test]
    fn range_is_half_open() {
        assert_eq!(resolve_page_indices("2:4", 5).unwrap(), vec![1, 2]);
        assert_eq!(resolve_page_indices("1:2", 5).unwrap(), vec![0]);
    }

    #[test]
    fn equal_endpoints_yield_one_index() {
        assert_eq!(resolve_page_indices("2:2", 5).unwrap(), vec![1]);
    }

    #[test]
    fn negative_range_endpoints() {
        // "-2:-1" on 5 pages: left = 5 + (-2) + 1 = 4, right = 5 + (-1) + 1
        // = 5, and the half-open range keeps only index 4.
        assert_eq!(resolve_page_indices("-2:-1", 5).unwrap(), vec![4]);
        assert_eq!(resolve_page_indices("2:-1", 5).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn inverted_range_is_empty() {
        assert_eq!(resolve_page_indices("4:2", 5).unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn out_of_bounds_indices_pass_through() {
        // Bounds are the evaluator's concern.
        assert_eq!(resolve_page_indices("7", 5).unwrap(), vec![6]);
        assert_eq!(resolve_page_indices("-9", 5).unwrap(), vec![-4]);
    }

    #[test]
    fn garbage_spec_is_a_range_error() {
        assert!(matches!(
            resolve_page_indices("x", 5),
            Err(ParseError::PageRange(_))
        ));
        assert!(matches!(
            resolve_page_indices("1:2:3", 5),
            Err(ParseError::PageRange(_))
        ));
    }
}
