//! plantilla - template-driven structured data extraction from PDF page
//! geometry.
//!
//! A declarative template names, per page range, the form fields and
//! table columns to read off a document layout, each located by a
//! fractional bounding box. The engine normalizes raw word/line geometry
//! from an upstream PDF extractor, infers table row boundaries from drawn
//! rule lines or clustered text baselines, and assembles one output
//! document per parse. PDF decoding, page rendering, and OCR stay behind
//! the collaborator traits in [`source`].

pub mod error;
pub mod extract;
pub mod form;
pub mod geometry;
pub mod model;
pub mod normalize;
pub mod output;
pub mod parser;
pub mod source;
pub mod table;
pub mod template;

pub use error::{ParseError, Result};
pub use geometry::{BoundingBox, Point};
pub use model::DocumentData;
pub use normalize::{normalize_document, normalize_pdf};
pub use output::OutputDocument;
pub use parser::{resolve_page_indices, Parser};
pub use source::{GeometrySource, OcrEngine, PageRenderer, RawDocument};
pub use template::Template;
