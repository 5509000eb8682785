//! The one-shot generation pipeline.
//!
//! One user action triggers one synchronous run: validate the campaign
//! input, detect relationship context, extract uploaded material, assemble
//! the prompt, call the generation client. Validation failures stop the
//! run before any network I/O; per-file extraction failures are carried in
//! the result instead of aborting it.

use std::sync::Arc;

use crate::campaign::{CampaignInput, ValidationError};
use crate::context::{self, RelationshipContext};
use crate::extract::{self, ExtractionOutcome, UploadedMaterial};
use crate::prompt::{self, AssembledPrompt};
use crate::providers::{GeneratedScript, GenerationClient, GenerationError};
use crate::reference::ReferenceCorpus;

/// Errors that abort a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Mandatory campaign fields are missing; reported before anything runs.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The remote generation call failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl PipelineError {
    /// Operator guidance for the front-end: present when re-submitting the
    /// same request by hand is reasonable (transient generation failures),
    /// absent for permanent ones.
    pub fn retry_hint(&self) -> Option<&'static str> {
        match self {
            Self::Generation(e) if e.is_retryable() => {
                Some("transient failure: the same request is safe to retry")
            }
            _ => None,
        }
    }
}

/// Everything one generation request owns.
#[derive(Debug, Clone)]
pub struct ScriptRequest {
    /// Structured campaign parameters.
    pub campaign: CampaignInput,
    /// Uploaded supplementary documents, consumed once by extraction.
    pub materials: Vec<UploadedMaterial>,
}

/// The outcome of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct ScriptResult {
    /// The generated script, rendered downstream as-is.
    pub script: GeneratedScript,
    /// The detected relationship context.
    pub relationship: RelationshipContext,
    /// Per-file extraction outcomes, in upload order.
    pub extractions: Vec<ExtractionOutcome>,
}

/// One-shot script generation pipeline.
///
/// Holds the immutable reference corpus and the generation client; each
/// [`run`](Pipeline::run) call is otherwise request-local.
pub struct Pipeline {
    reference: ReferenceCorpus,
    client: Arc<dyn GenerationClient>,
    extraction_max_chars: usize,
}

impl Pipeline {
    /// Build a pipeline over a loaded reference corpus and a client.
    pub fn new(
        reference: ReferenceCorpus,
        client: Arc<dyn GenerationClient>,
        extraction_max_chars: usize,
    ) -> Self {
        Self {
            reference,
            client,
            extraction_max_chars,
        }
    }

    /// Assemble the prompt for a request without calling the client.
    ///
    /// Deterministic; exposed so callers can inspect what would be sent.
    pub fn assemble(
        &self,
        campaign: &CampaignInput,
        relationship: &RelationshipContext,
        extractions: &[ExtractionOutcome],
    ) -> AssembledPrompt {
        prompt::assemble(&self.reference, campaign, relationship, extractions)
    }

    /// Run the full pipeline for one request.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Validation`] before any extraction or
    /// network I/O when mandatory fields are missing, and
    /// [`PipelineError::Generation`] when the remote call fails.
    pub async fn run(&self, request: ScriptRequest) -> Result<ScriptResult, PipelineError> {
        request.campaign.validate()?;

        let relationship = context::detect_relationship(
            &request.campaign.target_group,
            &request.campaign.personas,
        );
        tracing::info!(existing = relationship.is_existing(), "relationship context detected");

        let extractions = extract::extract_batch(&request.materials, self.extraction_max_chars);
        let failed = extractions
            .iter()
            .filter(|o| matches!(o, ExtractionOutcome::Failed { .. }))
            .count();
        if failed > 0 {
            tracing::warn!(failed, total = extractions.len(), "some uploads could not be extracted");
        }

        let prompt = self.assemble(&request.campaign, &relationship, &extractions);
        tracing::debug!(
            system_chars = prompt.system.chars().count(),
            user_chars = prompt.user.chars().count(),
            "prompt assembled"
        );

        let script = self.client.generate(&prompt).await?;
        tracing::info!(
            model = %script.model,
            output_tokens = script.usage.output_tokens,
            "script generated"
        );

        Ok(ScriptResult {
            script,
            relationship,
            extractions,
        })
    }
}
