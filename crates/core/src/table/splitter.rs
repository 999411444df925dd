//! Row boundary detection and box splitting.
//!
//! A table on an un-gridded page has no cell borders to find. Row
//! boundaries are inferred either from drawn horizontal rule lines (kept
//! when dark enough) or from the baselines of the text in one designated
//! delimiter column, clustered to absorb baseline jitter.

use std::collections::BTreeSet;

use ordered_float::OrderedFloat;

use crate::geometry::{words_in_box, BoundingBox, DEFAULT_CONTAINMENT_THRESHOLD};
use crate::model::{LineSegment, Word};

/// Darkness ceiling that keeps every line.
pub(crate) const DEFAULT_MAX_PIXEL_VALUE: u8 = 255;

/// Two word baselines closer than this are the same table row,
/// in fractional page units.
pub(crate) const Y_CLUSTER_TOLERANCE: f64 = 0.01;

/// Lines whose average RGB is component-wise at or below the ceiling.
///
/// Lower ceilings select only darker ink lines, dropping faint rendering
/// artifacts.
pub fn filter_lines_by_pixel_value(
    lines: &[LineSegment],
    max_pixel_value: u8,
) -> Vec<&LineSegment> {
    lines
        .iter()
        .filter(|line| {
            line.average_pixel_value
                .iter()
                .all(|&channel| channel <= max_pixel_value)
        })
        .collect()
}

/// Row boundaries from drawn lines: filter by darkness, collect top-left
/// fractional y, deduplicate, sort ascending.
pub fn line_row_boundaries(lines: &[LineSegment], max_pixel_value: u8) -> Vec<f64> {
    let unique: BTreeSet<OrderedFloat<f64>> = filter_lines_by_pixel_value(lines, max_pixel_value)
        .into_iter()
        .map(|line| OrderedFloat(line.decimal_coordinates.top_left.y))
        .collect();
    unique.into_iter().map(OrderedFloat::into_inner).collect()
}

/// Row boundaries from the delimiter column's word baselines: containment
/// query, dedup + sort, then cluster near-duplicates into their means.
pub fn field_row_boundaries(words: &[Word], column: &BoundingBox) -> Vec<f64> {
    let unique: BTreeSet<OrderedFloat<f64>> =
        words_in_box(words, column, DEFAULT_CONTAINMENT_THRESHOLD)
            .into_iter()
            .map(|word| OrderedFloat(word.bounding_box.decimal_coordinates.top_left.y))
            .collect();
    cluster_positions(unique.into_iter().map(OrderedFloat::into_inner).collect())
}

/// Collapse near-duplicate positions into cluster means.
///
/// Repeatedly pops the first value, gathers every remaining value strictly
/// within [`Y_CLUSTER_TOLERANCE`] of it, and replaces the cluster with its
/// arithmetic mean. Means are returned sorted ascending. A list whose
/// gaps are all at least the tolerance maps to itself.
pub fn cluster_positions(mut values: Vec<f64>) -> Vec<f64> {
    let mut means = Vec::with_capacity(values.len());
    while !values.is_empty() {
        let seed = values.remove(0);
        let (close, rest): (Vec<f64>, Vec<f64>) = values
            .into_iter()
            .partition(|&v| (v - seed).abs() < Y_CLUSTER_TOLERANCE);
        values = rest;
        let total: f64 = seed + close.iter().sum::<f64>();
        means.push(total / (close.len() + 1) as f64);
    }
    means.sort_by(|a, b| a.total_cmp(b));
    means
}

/// Cut `bbox` into row boxes at every boundary strictly inside its
/// y-span.
///
/// Boundaries at or outside the edges are ignored, so `N` interior
/// boundaries yield `N + 1` boxes covering the original span exactly. A
/// zero-height box yields nothing.
pub fn split_box_by_boundaries(bbox: &BoundingBox, boundaries: &[f64]) -> Vec<BoundingBox> {
    let top = bbox.top_left.y;
    let bottom = bbox.bottom_right.y;
    let mut sorted = boundaries.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut boxes = Vec::new();
    let mut cursor = top;
    for &boundary in &sorted {
        if top < boundary && boundary < bottom {
            boxes.push(BoundingBox::from_edges(
                bbox.top_left.x,
                cursor,
                bbox.bottom_right.x,
                boundary,
            ));
            cursor = boundary;
        }
    }
    if cursor < bottom {
        boxes.push(BoundingBox::from_edges(
            bbox.top_left.x,
            cursor,
            bbox.bottom_right.x,
            bottom,
        ));
    }
    boxes
}
