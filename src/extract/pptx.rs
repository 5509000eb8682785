//! Slide deck (PPTX) text extraction.
//!
//! PPTX files are ZIP archives with one XML document per slide at
//! `ppt/slides/slideN.xml`; text runs live in `a:t` elements. Slides are
//! processed in numeric order so the output follows the deck.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::ExtractionError;

/// Extract plain text from PPTX bytes, slides in deck order.
///
/// # Errors
///
/// Returns [`ExtractionError::Archive`] on an invalid container or a deck
/// with no slides, [`ExtractionError::Xml`] on malformed slide XML, and
/// [`ExtractionError::NoText`] when no slide carries text.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    let cursor = Cursor::new(bytes);
    let mut archive =
        zip::ZipArchive::new(cursor).map_err(|e| ExtractionError::Archive(e.to_string()))?;

    let mut slide_names: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slide_names.sort_by_key(|(n, _)| *n);

    if slide_names.is_empty() {
        return Err(ExtractionError::Archive(
            "no slides found in ppt/slides/".to_string(),
        ));
    }

    let mut slides = Vec::new();
    for (_, name) in slide_names {
        let mut slide_xml = String::new();
        archive
            .by_name(&name)
            .map_err(|e| ExtractionError::Archive(e.to_string()))?
            .read_to_string(&mut slide_xml)
            .map_err(|e| ExtractionError::Archive(e.to_string()))?;

        let runs = parse_slide_xml(&slide_xml)?;
        if !runs.is_empty() {
            slides.push(runs.join("\n"));
        }
    }

    if slides.is_empty() {
        return Err(ExtractionError::NoText);
    }
    Ok(slides.join("\n\n"))
}

/// Parse `ppt/slides/slideN.xml` names into their slide number.
fn slide_number(name: &str) -> Option<u32> {
    let rest = name.strip_prefix("ppt/slides/slide")?;
    let digits = rest.strip_suffix(".xml")?;
    digits.parse().ok()
}

/// Collect non-empty `a:t` text runs from one slide document.
pub(crate) fn parse_slide_xml(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut runs = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"a:t" => in_text = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"a:t" => in_text = false,
            Ok(Event::Text(e)) => {
                if in_text {
                    let text = e
                        .unescape()
                        .map_err(|e| ExtractionError::Xml(e.to_string()))?;
                    let text = text.trim().to_string();
                    if !text.is_empty() {
                        runs.push(text);
                    }
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

    Ok(runs)
}
