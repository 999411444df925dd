//! Table rule evaluation.
//!
//! A table rule declares columns and a row delimiter. The delimiter fixes
//! one shared set of row boundaries for the whole table; every column is
//! split by that same set, so rows stay aligned across columns even when
//! their cell text sits at slightly different heights.

pub mod splitter;

use std::collections::BTreeMap;

use image::RgbImage;
use indexmap::IndexMap;

use crate::error::{ParseError, Result};
use crate::extract::CellExtractor;
use crate::model::PageData;
use crate::template::{DelimiterType, Rule, RuleConfig, TableConfig, Template};

use splitter::{
    field_row_boundaries, line_row_boundaries, split_box_by_boundaries, DEFAULT_MAX_PIXEL_VALUE,
};

/// Apply a table rule to one page, producing one map per row ordered by
/// row index, each map keyed by column field name in declaration order.
pub fn evaluate_table_rule(
    template: &Template,
    rule_id: &str,
    page: &PageData,
    image: Option<&RgbImage>,
    extractor: &CellExtractor<'_>,
) -> Result<Vec<IndexMap<String, String>>> {
    let rule = template.rule_by_id(rule_id)?;
    let config = table_config(rule)?;
    let boundaries = row_boundaries(rule, config, page)?;

    let mut rows: BTreeMap<usize, IndexMap<String, String>> = BTreeMap::new();
    for column in &config.columns {
        let cells = split_box_by_boundaries(&column.coordinates, &boundaries);
        for (row_index, cell) in cells.iter().enumerate() {
            let text = extractor.extract(&page.content, Some(cell), image, None, None)?;
            rows.entry(row_index)
                .or_default()
                .insert(column.field_name.clone(), text);
        }
    }
    Ok(rows.into_values().collect())
}

/// Row boundaries shared by every column of the table.
///
/// The delimiter column must exist among the rule's own columns for both
/// delimiter types; the line strategy never reads its coordinates but a
/// template naming a nonexistent column is misconfigured either way.
fn row_boundaries(rule: &Rule, config: &TableConfig, page: &PageData) -> Result<Vec<f64>> {
    let delimiter = &config.row_delimiter;
    let column = config
        .columns
        .iter()
        .find(|column| column.field_name == delimiter.field_name)
        .ok_or_else(|| {
            ParseError::DelimiterConfig(format!(
                "table rule {} has no column named {:?}",
                rule.rule_id, delimiter.field_name
            ))
        })?;

    let boundaries = match delimiter.kind {
        DelimiterType::Line => line_row_boundaries(
            &page.lines,
            delimiter.max_pixel_value.unwrap_or(DEFAULT_MAX_PIXEL_VALUE),
        ),
        DelimiterType::Field => field_row_boundaries(&page.content, &column.coordinates),
    };
    Ok(boundaries)
}

fn table_config(rule: &Rule) -> Result<&TableConfig> {
    match &rule.config {
        RuleConfig::Table(config) => Ok(config),
        RuleConfig::Form(_) => Err(ParseError::RuleKindMismatch {
            rule_id: rule.rule_id.clone(),
            expected: "table",
        }),
    }
}
