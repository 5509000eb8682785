//! Validation failures must stop the pipeline before any network call.

use std::sync::Arc;

use guidegen::campaign::{CampaignInput, Goal, ValidationError};
use guidegen::pipeline::{Pipeline, PipelineError, ScriptRequest};
use guidegen::reference::ReferenceCorpus;

use super::stub::StubClient;

fn campaign_with_product(product: &str) -> CampaignInput {
    CampaignInput {
        product: product.to_string(),
        goal: Goal::Leads,
        target_group: "manufacturing companies".to_string(),
        personas: String::new(),
        tone_of_voice: String::new(),
        notes: String::new(),
        feedback: String::new(),
    }
}

#[tokio::test]
async fn empty_product_fails_before_any_generation_call() {
    let stub = Arc::new(StubClient::returning("## Hook\nhi"));
    let pipeline = Pipeline::new(
        ReferenceCorpus::from_text("Guide 1", 1000),
        stub.clone(),
        20_000,
    );

    let result = pipeline
        .run(ScriptRequest {
            campaign: campaign_with_product(""),
            materials: vec![],
        })
        .await;

    match result {
        Err(PipelineError::Validation(ValidationError::MissingProduct)) => {}
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn blank_product_fails_before_any_generation_call() {
    let stub = Arc::new(StubClient::returning("## Hook\nhi"));
    let pipeline = Pipeline::new(ReferenceCorpus::from_text("", 1000), stub.clone(), 20_000);

    let result = pipeline
        .run(ScriptRequest {
            campaign: campaign_with_product("   \n\t"),
            materials: vec![],
        })
        .await;

    assert!(result.is_err());
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn valid_input_reaches_the_client_exactly_once() {
    let stub = Arc::new(StubClient::returning("## Hook\nhi"));
    let pipeline = Pipeline::new(ReferenceCorpus::from_text("", 1000), stub.clone(), 20_000);

    let result = pipeline
        .run(ScriptRequest {
            campaign: campaign_with_product("CAAS charging stations"),
            materials: vec![],
        })
        .await;

    assert!(result.is_ok());
    assert_eq!(stub.call_count(), 1);
}
