//! Declarative extraction templates.
//!
//! A template is authored externally as JSON and validated before use. It
//! names, per page range, the form and table rules to apply; each rule
//! carries a typed config. Rule `type`, extraction method, delimiter type
//! and search type are closed enums, so an unknown tag is a schema error at
//! load time rather than a silent no-op during evaluation.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};
use crate::geometry::BoundingBox;

/// Accepted `page_numbers` shapes: `"3"`, `"-1"`, `"2:4"`, `"2:-1"`.
static PAGE_NUMBERS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(:-?\d+)?$").expect("valid page numbers regex"));

/// How cell text is read off the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// Join the words the upstream PDF extractor placed inside the box.
    Extraction,
    /// Crop the rendered page image and OCR the region.
    Ocr,
}

/// Full-page search strategies for form rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Regex,
}

/// How a table's row boundaries are detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelimiterType {
    /// Drawn horizontal rule lines, filtered by darkness.
    Line,
    /// Clustered word baselines in a designated column.
    Field,
}

/// A single-value rule: one labeled field read from one box or regex.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    pub field_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_type: Option<SearchType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

/// One declared table column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub field_name: String,
    pub coordinates: BoundingBox,
}

/// Where row boundaries come from for a table rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RowDelimiter {
    /// Field name of the column whose contents delimit rows.
    pub field_name: String,
    #[serde(rename = "type")]
    pub kind: DelimiterType,
    /// Darkness ceiling for line delimiters; lines with any RGB channel
    /// above it are ignored. Defaults to 255 (keep every line).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pixel_value: Option<u8>,
}

/// A multi-row rule: columns split into cells by a shared row delimiter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    pub columns: Vec<Column>,
    pub row_delimiter: RowDelimiter,
}

/// Rule payload, tagged by the `type` field on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "lowercase")]
pub enum RuleConfig {
    Form(FormConfig),
    Table(TableConfig),
}

/// A named rule; `rule_id` is unique across the template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub rule_id: String,
    #[serde(flatten)]
    pub config: RuleConfig,
}

/// Rules to apply to one page or page range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageRule {
    /// Page selector: 1-based single index (negative counts from the end)
    /// or a half-open `"L:R"` range.
    pub page_numbers: String,
    #[serde(default)]
    pub forms: Vec<String>,
    #[serde(default)]
    pub tables: Vec<String>,
}

/// A complete extraction template for one document layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub extraction_method: ExtractionMethod,
    pub pages: Vec<PageRule>,
    pub rules: Vec<Rule>,
}

impl Template {
    /// Deserialize and validate a template from JSON.
    ///
    /// Any malformed shape, unknown tag, or structural violation is a
    /// [`ParseError::Schema`].
    pub fn from_json(json: &str) -> Result<Template> {
        let template: Template =
            serde_json::from_str(json).map_err(|e| ParseError::Schema(e.to_string()))?;
        template.validate()?;
        Ok(template)
    }

    /// Structural checks beyond what deserialization enforces.
    pub fn validate(&self) -> Result<()> {
        for page in &self.pages {
            if !PAGE_NUMBERS_RE.is_match(&page.page_numbers) {
                return Err(ParseError::Schema(format!(
                    "invalid page_numbers spec: {:?}",
                    page.page_numbers
                )));
            }
        }
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.rule_id.as_str()) {
                return Err(ParseError::Schema(format!(
                    "duplicate rule_id: {}",
                    rule.rule_id
                )));
            }
        }
        Ok(())
    }

    /// First rule whose `rule_id` matches.
    ///
    /// Rule references are not checked at validation time, so a dangling id
    /// surfaces here as a recoverable [`ParseError::RuleNotFound`].
    pub fn rule_by_id(&self, rule_id: &str) -> Result<&Rule> {
        self.rules
            .iter()
            .find(|rule| rule.rule_id == rule_id)
            .ok_or_else(|| ParseError::RuleNotFound(rule_id.to_string()))
    }
}
