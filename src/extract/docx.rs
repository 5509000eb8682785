//! Word document (DOCX) text extraction.
//!
//! DOCX files are ZIP archives; the main document body lives at
//! `word/document.xml`, with text runs in `w:t` elements grouped into
//! `w:p` paragraphs.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::ExtractionError;

/// Extract plain text from DOCX bytes, one line per paragraph.
///
/// # Errors
///
/// Returns [`ExtractionError::Archive`] when the ZIP container is invalid or
/// missing `word/document.xml`, [`ExtractionError::Xml`] on malformed XML,
/// and [`ExtractionError::NoText`] when the document has no text content.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    let cursor = Cursor::new(bytes);
    let mut archive =
        zip::ZipArchive::new(cursor).map_err(|e| ExtractionError::Archive(e.to_string()))?;

    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractionError::Archive(format!("cannot find word/document.xml: {e}")))?
        .read_to_string(&mut document_xml)
        .map_err(|e| ExtractionError::Archive(e.to_string()))?;

    let paragraphs = parse_document_xml(&document_xml)?;
    if paragraphs.is_empty() {
        return Err(ExtractionError::NoText);
    }
    Ok(paragraphs.join("\n\n"))
}

/// Walk the document XML and collect non-empty paragraph texts.
pub(crate) fn parse_document_xml(xml: &str) -> Result<Vec<String>, ExtractionError> {
    // Run text is pushed verbatim: trimming per event would glue adjacent
    // runs together ("No upfront " + "investment"). Paragraphs are trimmed
    // once, at paragraph end.
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current_paragraph = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:t" => in_text = true,
                b"w:p" => current_paragraph.clear(),
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    let para = current_paragraph.trim().to_string();
                    if !para.is_empty() {
                        paragraphs.push(para);
                    }
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    let text = e
                        .unescape()
                        .map_err(|e| ExtractionError::Xml(e.to_string()))?;
                    current_paragraph.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractionError::Xml(format!(
                    "error at position {}: {e:?}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}
