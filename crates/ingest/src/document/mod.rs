mod normalize;
mod pdf;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use normalize::normalize_whitespace;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF not found at path: {}", .0.display())]
    NotFound(PathBuf),
    #[error("No extractable text found in the PDF.")]
    EmptyContent,
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read the PDF at `path` and return its normalized full text.
pub fn extract(path: &Path) -> Result<String, ExtractionError> {
    if !path.exists() {
        return Err(ExtractionError::NotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path)?;
    let text = extract_from_bytes(&bytes)?;
    tracing::debug!(path = %path.display(), chars = text.len(), "extracted PDF text");
    Ok(text)
}

/// Same as [`extract`] for an in-memory PDF.
pub fn extract_from_bytes(bytes: &[u8]) -> Result<String, ExtractionError> {
    let pages = pdf::extract_pages(bytes)?;
    let text = normalize_whitespace(&pages.join("\n"));
    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyContent);
    }
    Ok(text)
}
