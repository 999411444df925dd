//! Error types for the plantilla extraction engine.

use thiserror::Error;

/// Primary error type for template-driven extraction.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("template schema error: {0}")]
    Schema(String),

    #[error("rule not found: {0}")]
    RuleNotFound(String),

    #[error("page index {index} out of range for {pages} pages")]
    PageOutOfRange { index: i64, pages: usize },

    #[error("no rendered image for page index {0}")]
    MissingPageImage(i64),

    #[error("rule {rule_id} is not a {expected} rule")]
    RuleKindMismatch {
        rule_id: String,
        expected: &'static str,
    },

    #[error("delimiter coordinates not found: {0}")]
    DelimiterConfig(String),

    #[error("invalid page number spec: {0}")]
    PageRange(String),

    #[error("document has no pages")]
    EmptyDocument,

    #[error("page count {pages} does not match image count {images}")]
    ImageCountMismatch { pages: usize, images: usize },

    #[error("template requires OCR but no OCR engine is configured")]
    OcrUnavailable,

    #[error("geometry source error: {0}")]
    Source(String),

    #[error("ocr error: {0}")]
    Ocr(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Whether this failure is confined to a single rule evaluation.
    ///
    /// The parser logs and skips these so sibling rules still run;
    /// everything else aborts the parse.
    pub fn is_rule_skip(&self) -> bool {
        matches!(
            self,
            ParseError::RuleNotFound(_)
                | ParseError::PageOutOfRange { .. }
                | ParseError::MissingPageImage(_)
                | ParseError::RuleKindMismatch { .. }
                | ParseError::DelimiterConfig(_)
        )
    }
}

/// Convenience Result type alias for ParseError.
pub type Result<T> = std::result::Result<T, ParseError>;
