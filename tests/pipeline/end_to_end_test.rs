//! Full pipeline run against the deterministic stub client.

use std::io::Write;
use std::sync::Arc;

use guidegen::campaign::{CampaignInput, Goal};
use guidegen::extract::{ExtractionOutcome, UploadedMaterial};
use guidegen::pipeline::{Pipeline, ScriptRequest};
use guidegen::prompt;
use guidegen::reference::ReferenceCorpus;

use super::stub::StubClient;

const SIX_SECTION_TEMPLATE: &str = "## Hook\nQuick question.\n\n## Why Now\nGrid prices.\n\n\
## Discovery\nHow do you charge today?\n\n## Value Prop\nZero upfront.\n\n\
## CTA\n15 minutes Thursday?\n\n## Objection Handling\nIf they say X, say Y.";

/// Minimal in-memory DOCX with one paragraph of text.
fn docx_bytes(paragraph: &str) -> Vec<u8> {
    let xml = format!(
        r#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body><w:p><w:r><w:t>{paragraph}</w:t></w:r></w:p></w:body>
</w:document>"#
    );

    let mut buf = Vec::new();
    {
        let cursor = std::io::Cursor::new(&mut buf);
        let mut writer = zip::ZipWriter::new(cursor);
        writer
            .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
            .expect("start zip entry");
        writer.write_all(xml.as_bytes()).expect("write zip entry");
        writer.finish().expect("finish zip");
    }
    buf
}

fn caas_campaign() -> CampaignInput {
    CampaignInput {
        product: "CAAS charging stations".to_string(),
        goal: Goal::Meetings,
        target_group: "existing customer, prior contract in 2023".to_string(),
        personas: "facility managers".to_string(),
        tone_of_voice: String::new(),
        notes: String::new(),
        feedback: String::new(),
    }
}

#[tokio::test]
async fn existing_customer_scenario_round_trips_the_script() {
    let stub = Arc::new(StubClient::returning(SIX_SECTION_TEMPLATE));
    let reference = ReferenceCorpus::from_text("Guide 1: borrow 30 seconds.", 40_000);
    let pipeline = Pipeline::new(reference, stub.clone(), 20_000);

    let result = pipeline
        .run(ScriptRequest {
            campaign: caas_campaign(),
            materials: vec![],
        })
        .await
        .expect("pipeline should succeed");

    // Relationship detected from the target group.
    assert!(result.relationship.is_existing());

    // The prompt carried the prior-relationship directive.
    let sent = stub.last_prompt().expect("prompt captured");
    assert!(sent.user.contains("prior relationship"));
    assert!(sent.user.contains("CAAS charging stations"));
    assert!(sent.user.contains("Guide 1: borrow 30 seconds."));

    // The script passes through the presenter unchanged.
    assert_eq!(result.script.markdown, SIX_SECTION_TEMPLATE);
    for section in prompt::SCRIPT_SECTIONS {
        assert!(result.script.markdown.contains(&format!("## {section}")));
    }
}

#[tokio::test]
async fn corrupt_upload_does_not_abort_the_batch() {
    let stub = Arc::new(StubClient::returning(SIX_SECTION_TEMPLATE));
    let pipeline = Pipeline::new(ReferenceCorpus::from_text("", 1000), stub.clone(), 20_000);

    let materials = vec![
        UploadedMaterial {
            filename: "corrupt.docx".to_string(),
            bytes: vec![0xde, 0xad, 0xbe, 0xef],
            format: None,
        },
        UploadedMaterial {
            filename: "one-pager.docx".to_string(),
            bytes: docx_bytes("Charging as a service, no upfront investment."),
            format: None,
        },
    ];

    let result = pipeline
        .run(ScriptRequest {
            campaign: caas_campaign(),
            materials,
        })
        .await
        .expect("pipeline should succeed despite the corrupt file");

    assert_eq!(result.extractions.len(), 2);
    assert!(matches!(
        result.extractions[0],
        ExtractionOutcome::Failed { .. }
    ));
    let extracted = result.extractions[1].text().expect("valid file extracted");
    assert!(extracted.text.contains("no upfront investment"));

    // Only the valid file's text reached the prompt.
    let sent = stub.last_prompt().expect("prompt captured");
    assert!(sent.user.contains("no upfront investment"));
    assert!(!sent.user.contains("corrupt.docx"));
}
