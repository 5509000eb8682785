//! PDF text extraction via the `pdf-extract` crate.

use super::ExtractionError;

/// Extract plain text from PDF bytes.
///
/// Scanned-image-only PDFs extract successfully but produce no text; that
/// case is reported as [`ExtractionError::NoText`] so the caller can tell
/// the user why the file contributed nothing.
///
/// # Errors
///
/// Returns [`ExtractionError::Pdf`] when the document cannot be parsed and
/// [`ExtractionError::NoText`] when it contains no extractable text.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    let text = text.trim();
    if text.is_empty() {
        return Err(ExtractionError::NoText);
    }
    Ok(text.to_string())
}
