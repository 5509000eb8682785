//! Reference corpus loading.
//!
//! The reference library is a free-form prose document of exemplar
//! cold-call scripts ("Guide N" sections by convention). It is loaded once
//! at startup, never mutated, and passed by reference into the pipeline.
//! Oversized libraries are trimmed to a bounded size, keeping the tail,
//! which holds the most recently appended guides.

use std::path::Path;

use anyhow::{Context, Result};

/// Immutable exemplar-script library loaded at process start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceCorpus {
    text: String,
    trimmed: bool,
    original_chars: usize,
}

impl ReferenceCorpus {
    /// Load the reference document from `path`, trimming to `max_chars`.
    ///
    /// A missing file degrades to an empty corpus with a warning; generation
    /// still works, just with less consistent style.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read.
    pub fn load(path: &Path, max_chars: usize) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "reference document not found, using empty corpus");
            return Ok(Self::from_text("", max_chars));
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read reference document {}", path.display()))?;
        let corpus = Self::from_text(content.trim(), max_chars);
        tracing::info!(
            path = %path.display(),
            chars = corpus.original_chars,
            trimmed = corpus.trimmed,
            "reference corpus loaded"
        );
        Ok(corpus)
    }

    /// Build a corpus from in-memory text, trimming to `max_chars`.
    pub fn from_text(text: impl Into<String>, max_chars: usize) -> Self {
        let text = text.into();
        let original_chars = text.chars().count();
        let (text, trimmed) = trim_tail(text, max_chars);
        Self {
            text,
            trimmed,
            original_chars,
        }
    }

    /// The (possibly trimmed) corpus text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when the corpus holds no text at all.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True when the source document exceeded the size bound and was trimmed.
    pub fn was_trimmed(&self) -> bool {
        self.trimmed
    }

    /// Character count of the source document before trimming.
    pub fn original_chars(&self) -> usize {
        self.original_chars
    }
}

/// Keep the last `max_chars` characters of `text`.
///
/// The tail wins: newer guides are appended at the end of the document.
fn trim_tail(text: String, max_chars: usize) -> (String, bool) {
    let total = text.chars().count();
    if total <= max_chars {
        return (text, false);
    }
    let tail: String = text
        .chars()
        .skip(total.saturating_sub(max_chars))
        .collect();
    (tail, true)
}
