//! Batch extraction behavior: ordering, isolation of failures, truncation,
//! and signature-based format sniffing.

use std::io::Write;

use guidegen::extract::{
    extract_batch, extract_material, ExtractionOutcome, MaterialFormat, UploadedMaterial,
    TRUNCATION_MARKER,
};

/// Build an in-memory ZIP container with a single named entry.
fn zip_with_entry(name: &str, content: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let cursor = std::io::Cursor::new(&mut buf);
        let mut writer = zip::ZipWriter::new(cursor);
        writer
            .start_file(name, zip::write::SimpleFileOptions::default())
            .expect("start zip entry");
        writer.write_all(content.as_bytes()).expect("write zip entry");
        writer.finish().expect("finish zip");
    }
    buf
}

fn docx_with_text(text: &str) -> Vec<u8> {
    zip_with_entry(
        "word/document.xml",
        &format!(
            r#"<w:document xmlns:w="ns"><w:body><w:p><w:r><w:t>{text}</w:t></w:r></w:p></w:body></w:document>"#
        ),
    )
}

fn pptx_with_text(text: &str) -> Vec<u8> {
    zip_with_entry(
        "ppt/slides/slide1.xml",
        &format!(r#"<p:sld xmlns:a="ns" xmlns:p="ns"><a:p><a:r><a:t>{text}</a:t></a:r></a:p></p:sld>"#),
    )
}

fn material(filename: &str, bytes: Vec<u8>) -> UploadedMaterial {
    UploadedMaterial {
        filename: filename.to_string(),
        bytes,
        format: None,
    }
}

#[test]
fn corrupt_file_does_not_affect_valid_neighbour() {
    let batch = vec![
        material("corrupt.pdf", b"garbage bytes".to_vec()),
        material("valid.docx", docx_with_text("Key account playbook")),
    ];

    let outcomes = extract_batch(&batch, 20_000);
    assert_eq!(outcomes.len(), 2);

    match &outcomes[0] {
        ExtractionOutcome::Failed { filename, reason } => {
            assert_eq!(filename, "corrupt.pdf");
            assert!(!reason.is_empty());
        }
        ExtractionOutcome::Extracted(_) => panic!("corrupt file should fail"),
    }
    let extracted = outcomes[1].text().expect("valid file should extract");
    assert_eq!(extracted.text, "Key account playbook");
}

#[test]
fn failure_isolation_holds_regardless_of_position() {
    let batch = vec![
        material("valid.docx", docx_with_text("Key account playbook")),
        material("corrupt.pdf", b"garbage bytes".to_vec()),
    ];

    let outcomes = extract_batch(&batch, 20_000);
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].text().is_some());
    assert!(matches!(outcomes[1], ExtractionOutcome::Failed { .. }));
}

#[test]
fn oversized_extraction_is_truncated_with_marker() {
    let long_text = "x".repeat(500);
    let outcome = extract_material(&material("long.docx", docx_with_text(&long_text)), 100);

    let extracted = outcome.text().expect("should extract");
    assert!(extracted.truncated);
    assert_eq!(
        extracted.text.chars().count(),
        100 + TRUNCATION_MARKER.chars().count()
    );
    assert!(extracted.text.ends_with(TRUNCATION_MARKER));
}

#[test]
fn format_is_sniffed_when_extension_is_missing() {
    // No extension and no declared format: the ZIP container signature and
    // its internal layout decide.
    let outcome = extract_material(&material("upload", docx_with_text("sniffed")), 1000);
    assert_eq!(outcome.text().expect("should extract").text, "sniffed");

    assert_eq!(
        MaterialFormat::sniff(&pptx_with_text("deck")),
        Some(MaterialFormat::Pptx)
    );
}

#[test]
fn slide_deck_text_is_extracted_in_order() {
    let mut buf = Vec::new();
    {
        let cursor = std::io::Cursor::new(&mut buf);
        let mut writer = zip::ZipWriter::new(cursor);
        for (slide, text) in [(2, "Second slide"), (1, "First slide")] {
            writer
                .start_file(
                    format!("ppt/slides/slide{slide}.xml"),
                    zip::write::SimpleFileOptions::default(),
                )
                .expect("start zip entry");
            writer
                .write_all(
                    format!(r#"<p:sld xmlns:a="ns"><a:p><a:r><a:t>{text}</a:t></a:r></a:p></p:sld>"#)
                        .as_bytes(),
                )
                .expect("write zip entry");
        }
        writer.finish().expect("finish zip");
    }

    let outcome = extract_material(&material("deck.pptx", buf), 20_000);
    let extracted = outcome.text().expect("should extract");
    let first = extracted.text.find("First slide").expect("first slide text");
    let second = extracted.text.find("Second slide").expect("second slide text");
    assert!(first < second);
}

#[test]
fn docx_with_no_text_reports_no_text() {
    let bytes = zip_with_entry(
        "word/document.xml",
        r#"<w:document xmlns:w="ns"><w:body><w:p></w:p></w:body></w:document>"#,
    );
    let outcome = extract_material(&material("empty.docx", bytes), 1000);
    match outcome {
        ExtractionOutcome::Failed { reason, .. } => {
            assert!(reason.contains("no extractable text"));
        }
        ExtractionOutcome::Extracted(_) => panic!("empty document should fail"),
    }
}
