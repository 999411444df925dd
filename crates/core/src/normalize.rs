//! Raw geometry to normalized page data.
//!
//! Upstream extractors report words in top-down pixel coordinates and
//! drawn lines in the PDF's native bottom-up system. Everything leaves
//! this module as top-down fractions of the page size, so downstream
//! containment queries never compare across conventions.

use image::RgbImage;

use crate::error::{ParseError, Result};
use crate::geometry::{round2, round6, BoundingBox, Point};
use crate::model::{Dimensions, DocumentData, LineSegment, PageData, Word, WordBounds};
use crate::source::{GeometrySource, PageRenderer, RawDocument, RawPage};

/// Vertical axis convention of a raw coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum YAxis {
    /// y grows downward from the top edge (words).
    TopDown,
    /// y grows upward from the bottom edge (drawn lines).
    BottomUp,
}

/// Convert a raw y value to a top-down fraction of the page height.
pub fn to_top_down_fraction(y: f64, height: f64, axis: YAxis) -> f64 {
    match axis {
        YAxis::TopDown => round6(y / height),
        YAxis::BottomUp => round6(1.0 - y / height),
    }
}

/// Convert a raw x value to a fraction of the page width.
fn to_fraction(v: f64, dim: f64) -> f64 {
    round6(v / dim)
}

fn normalize_words(page: &RawPage) -> Vec<Word> {
    page.words
        .iter()
        .map(|raw| {
            // Pixel values are rounded before the division, so the stored
            // fractions correspond exactly to the stored pixel box.
            let x0 = round2(raw.x0);
            let top = round2(raw.top);
            let x1 = round2(raw.x1);
            let bottom = round2(raw.bottom);
            Word {
                text: raw.text.clone(),
                bounding_box: WordBounds {
                    coordinates: BoundingBox::from_edges(x0, top, x1, bottom),
                    decimal_coordinates: BoundingBox::from_edges(
                        to_fraction(x0, page.width),
                        to_top_down_fraction(top, page.height, YAxis::TopDown),
                        to_fraction(x1, page.width),
                        to_top_down_fraction(bottom, page.height, YAxis::TopDown),
                    ),
                },
            }
        })
        .collect()
}

fn normalize_lines(page: &RawPage, image: &RgbImage) -> Vec<LineSegment> {
    page.lines
        .iter()
        .map(|raw| {
            let decimal_coordinates = BoundingBox::new(
                Point::new(
                    to_fraction(raw.x0, page.width),
                    to_top_down_fraction(raw.y0, page.height, YAxis::BottomUp),
                ),
                Point::new(
                    to_fraction(raw.x1, page.width),
                    to_top_down_fraction(raw.y1, page.height, YAxis::BottomUp),
                ),
            );
            LineSegment {
                average_pixel_value: average_pixel_value(image, &decimal_coordinates),
                decimal_coordinates,
            }
        })
        .collect()
}

/// Mean RGB over the pixel footprint of `bbox` in `image`.
///
/// A degenerate axis is widened to one pixel so perfectly horizontal or
/// vertical lines sample a 1-pixel slice; a region that is still empty
/// (zero-area box at the image edge, or both axes degenerate) yields
/// `[0, 0, 0]`.
fn average_pixel_value(image: &RgbImage, bbox: &BoundingBox) -> [u8; 3] {
    let (width, height) = image.dimensions();
    let rect = bbox.to_pixel_rect(width, height);
    let (x_min, mut x_max) = (rect.x_min, rect.x_max);
    let (y_min, mut y_max) = (rect.y_min, rect.y_max);

    if x_min == x_max {
        x_max = (x_min + 1).min(width);
    } else if y_min == y_max {
        y_max = (y_min + 1).min(height);
    }
    if x_min >= x_max || y_min >= y_max {
        return [0, 0, 0];
    }

    let mut sums = [0u64; 3];
    let mut count = 0u64;
    for y in y_min..y_max {
        for x in x_min..x_max {
            let pixel = image.get_pixel(x, y);
            sums[0] += u64::from(pixel[0]);
            sums[1] += u64::from(pixel[1]);
            sums[2] += u64::from(pixel[2]);
            count += 1;
        }
    }
    let mean = |sum: u64| (sum as f64 / count as f64).round() as u8;
    [mean(sums[0]), mean(sums[1]), mean(sums[2])]
}

/// Normalize raw document geometry against its rendered page images.
///
/// `images` must hold exactly one raster per page; line darkness is
/// sampled from them. Page dimensions come from the first page, rounded
/// to 2 decimal places.
pub fn normalize_document(raw: &RawDocument, images: &[RgbImage]) -> Result<DocumentData> {
    let first = raw.pages.first().ok_or(ParseError::EmptyDocument)?;
    if images.len() != raw.pages.len() {
        return Err(ParseError::ImageCountMismatch {
            pages: raw.pages.len(),
            images: images.len(),
        });
    }
    let dimensions = Dimensions {
        width: round2(first.width),
        height: round2(first.height),
    };
    let pages = raw
        .pages
        .iter()
        .zip(images)
        .enumerate()
        .map(|(index, (page, image))| PageData {
            page_number: index + 1,
            content: normalize_words(page),
            lines: normalize_lines(page, image),
        })
        .collect::<Vec<_>>();
    tracing::debug!(pages = pages.len(), "normalized document geometry");
    Ok(DocumentData {
        number_of_pages: raw.pages.len(),
        dimensions,
        pages,
    })
}

/// Run both collaborators over raw PDF bytes and normalize the result.
///
/// Returns the normalized data together with the rendered page images,
/// which the parser needs again for OCR extraction.
pub fn normalize_pdf(
    pdf: &[u8],
    source: &dyn GeometrySource,
    renderer: &dyn PageRenderer,
) -> Result<(DocumentData, Vec<RgbImage>)> {
    let images = renderer.render_pages(pdf)?;
    let raw = source.document_geometry(pdf)?;
    let data = normalize_document(&raw, &images)?;
    Ok((data, images))
}
