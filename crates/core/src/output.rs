//! Assembled output document.
//!
//! One parse call produces one document with fresh metadata and a single
//! aggregate page collecting every evaluated form and table, however many
//! source pages the template touched.

use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Identity and provenance of one parse run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Fresh unique identifier for this run.
    pub document_id: String,
    /// UTC timestamp, `%Y-%m-%dT%H:%M:%S%.6fZ`.
    pub parsed_at: String,
    pub number_of_pages: usize,
}

impl Metadata {
    pub(crate) fn fresh(number_of_pages: usize) -> Self {
        Metadata {
            document_id: Uuid::new_v4().to_string(),
            parsed_at: Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            number_of_pages,
        }
    }
}

/// One extracted table: its row maps in row order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableOutput {
    pub data: Vec<IndexMap<String, String>>,
}

/// The aggregate output page.
///
/// `forms` keeps evaluation order (page-rule order, then rule-list
/// order); each table's rows keep row order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputPage {
    pub forms: Vec<IndexMap<String, String>>,
    pub tables: Vec<TableOutput>,
}

/// The fully assembled result of one parse call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputDocument {
    pub metadata: Metadata,
    pub pages: Vec<OutputPage>,
}

impl OutputDocument {
    /// Serialize to a single JSON value.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
