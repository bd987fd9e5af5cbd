use super::ExtractionError;

/// Extract text per page, in page order. Pages without a text layer come back empty.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    // pdf-extract panics on some malformed fonts and xref tables.
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| {
            tracing::warn!("pdf-extract panicked while parsing document");
            ExtractionError::Pdf("parser panicked on malformed PDF".into())
        })?
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    tracing::debug!(pages = pages.len(), "extracted PDF pages");
    Ok(pages)
}
