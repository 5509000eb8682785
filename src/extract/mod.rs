//! Best-effort text extraction from uploaded sales material.
//!
//! Three formats are supported: PDF, Word documents (DOCX), and slide decks
//! (PPTX). Dispatch is by file extension first, container signature second.
//! A failed file never aborts the batch; its failure is recorded as an
//! [`ExtractionOutcome::Failed`] and the remaining files are processed.
//!
//! Extracted text is truncated per file to a bounded character count with a
//! deterministic marker, to cap prompt size.

use thiserror::Error;

pub mod docx;
pub mod pdf;
pub mod pptx;

/// Marker appended to extracted text that was cut at the length bound.
pub const TRUNCATION_MARKER: &str = "\n[truncated]";

/// Supported uploaded-material formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialFormat {
    /// PDF document.
    Pdf,
    /// Word document (DOCX container).
    Docx,
    /// Slide deck (PPTX container).
    Pptx,
}

impl MaterialFormat {
    /// Infer the format from a filename extension.
    pub fn from_filename(name: &str) -> Option<Self> {
        let ext = name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase())?;
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "pptx" => Some(Self::Pptx),
            _ => None,
        }
    }

    /// Infer the format from the container signature.
    ///
    /// PDF files start with `%PDF-`. DOCX and PPTX are both ZIP containers,
    /// distinguished by their well-known internal document paths.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"%PDF-") {
            return Some(Self::Pdf);
        }
        if bytes.starts_with(b"PK") {
            let cursor = std::io::Cursor::new(bytes);
            let archive = zip::ZipArchive::new(cursor).ok()?;
            let names: Vec<&str> = archive.file_names().collect();
            if names.iter().any(|n| *n == "word/document.xml") {
                return Some(Self::Docx);
            }
            if names.iter().any(|n| n.starts_with("ppt/slides/")) {
                return Some(Self::Pptx);
            }
        }
        None
    }
}

impl std::fmt::Display for MaterialFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Pptx => "PPTX",
        };
        f.write_str(label)
    }
}

/// One uploaded file, consumed once by the extractor.
#[derive(Debug, Clone)]
pub struct UploadedMaterial {
    /// Original filename, used for format inference and reporting.
    pub filename: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
    /// Declared format, if the caller knows it. `None` triggers inference.
    pub format: Option<MaterialFormat>,
}

/// Errors raised while extracting a single file.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The format could not be determined from extension or signature.
    #[error("unsupported or unrecognised format")]
    UnknownFormat,
    /// The PDF library could not extract text.
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
    /// The ZIP container could not be opened or is missing expected entries.
    #[error("document container error: {0}")]
    Archive(String),
    /// The document XML could not be parsed.
    #[error("XML parsing error: {0}")]
    Xml(String),
    /// Extraction succeeded but produced no text (e.g. scanned-image PDF).
    #[error("no extractable text")]
    NoText,
}

/// Successfully extracted text for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Source filename.
    pub filename: String,
    /// Extracted plain text, truncated with [`TRUNCATION_MARKER`] if needed.
    pub text: String,
    /// Whether the text was cut at the length bound.
    pub truncated: bool,
}

/// Per-file extraction result; order matches the input batch.
#[derive(Debug, Clone)]
pub enum ExtractionOutcome {
    /// The file yielded text.
    Extracted(ExtractedText),
    /// The file could not be processed; the batch continued without it.
    Failed {
        /// Source filename.
        filename: String,
        /// Short human-readable reason.
        reason: String,
    },
}

impl ExtractionOutcome {
    /// The extracted text, if this outcome was a success.
    pub fn text(&self) -> Option<&ExtractedText> {
        match self {
            Self::Extracted(extracted) => Some(extracted),
            Self::Failed { .. } => None,
        }
    }
}

/// Extract every file in the batch, preserving order.
///
/// A corrupt or unsupported file is recorded as a failure and skipped;
/// it never affects the other files.
pub fn extract_batch(materials: &[UploadedMaterial], max_chars: usize) -> Vec<ExtractionOutcome> {
    materials
        .iter()
        .map(|material| extract_material(material, max_chars))
        .collect()
}

/// Extract one file, resolving its format and capturing any failure.
pub fn extract_material(material: &UploadedMaterial, max_chars: usize) -> ExtractionOutcome {
    let format = material
        .format
        .or_else(|| MaterialFormat::from_filename(&material.filename))
        .or_else(|| MaterialFormat::sniff(&material.bytes));

    let result = match format {
        Some(MaterialFormat::Pdf) => pdf::extract(&material.bytes),
        Some(MaterialFormat::Docx) => docx::extract(&material.bytes),
        Some(MaterialFormat::Pptx) => pptx::extract(&material.bytes),
        None => Err(ExtractionError::UnknownFormat),
    };

    match result {
        Ok(text) => {
            let (text, truncated) = truncate_text(text, max_chars);
            if truncated {
                tracing::debug!(file = %material.filename, max_chars, "extracted text truncated");
            }
            ExtractionOutcome::Extracted(ExtractedText {
                filename: material.filename.clone(),
                text,
                truncated,
            })
        }
        Err(e) => {
            tracing::warn!(file = %material.filename, error = %e, "extraction failed, skipping file");
            ExtractionOutcome::Failed {
                filename: material.filename.clone(),
                reason: e.to_string(),
            }
        }
    }
}

/// Cut `text` to `max_chars` characters and append [`TRUNCATION_MARKER`].
///
/// Character-based, so multi-byte text is never split mid-codepoint.
fn truncate_text(text: String, max_chars: usize) -> (String, bool) {
    if text.chars().count() <= max_chars {
        return (text, false);
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str(TRUNCATION_MARKER);
    (cut, true)
}
