//! PDF text extraction for uploaded financial documents.

pub mod document;

pub use document::{extract, extract_from_bytes, normalize_whitespace, ExtractionError};
