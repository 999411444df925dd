//! Form rule evaluation: one labeled field per rule.

use image::RgbImage;
use indexmap::IndexMap;

use crate::error::{ParseError, Result};
use crate::extract::CellExtractor;
use crate::model::PageData;
use crate::template::{FormConfig, Rule, RuleConfig, Template};

/// Apply a form rule to one page, producing a single `{field_name: text}`
/// entry.
pub fn evaluate_form_rule(
    template: &Template,
    rule_id: &str,
    page: &PageData,
    image: Option<&RgbImage>,
    extractor: &CellExtractor<'_>,
) -> Result<IndexMap<String, String>> {
    let rule = template.rule_by_id(rule_id)?;
    let config = form_config(rule)?;
    let text = extractor.extract(
        &page.content,
        config.coordinates.as_ref(),
        image,
        config.search_type,
        config.regex.as_deref(),
    )?;
    Ok(IndexMap::from([(config.field_name.clone(), text)]))
}

fn form_config(rule: &Rule) -> Result<&FormConfig> {
    match &rule.config {
        RuleConfig::Form(config) => Ok(config),
        RuleConfig::Table(_) => Err(ParseError::RuleKindMismatch {
            rule_id: rule.rule_id.clone(),
            expected: "form",
        }),
    }
}
