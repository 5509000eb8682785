#![allow(missing_docs)]

//! Guidegen CLI — generate a ready-to-use cold-calling script from campaign
//! inputs, modeled on the reference guide library.
//!
//! The script is printed to stdout as Markdown; diagnostics go to stderr.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use guidegen::campaign::{CampaignInput, Goal};
use guidegen::config::GuidegenConfig;
use guidegen::extract::{ExtractionOutcome, MaterialFormat, UploadedMaterial};
use guidegen::pipeline::{Pipeline, ScriptRequest};
use guidegen::providers::openai::OpenAiClient;
use guidegen::reference::ReferenceCorpus;

#[derive(Debug, Parser)]
#[command(name = "guidegen", about = "Cold-calling script generator", version)]
struct Cli {
    /// Description of the product or offer.
    #[arg(long)]
    product: String,

    /// Campaign goal.
    #[arg(long, value_enum, default_value = "leads")]
    goal: Goal,

    /// Target group: industries, company size, revenue, employees.
    #[arg(long, default_value = "")]
    target_group: String,

    /// Personas: titles, decision makers, new customers vs. upsell.
    #[arg(long, default_value = "")]
    personas: String,

    /// Desired tone of voice.
    #[arg(long, default_value = "")]
    tone: String,

    /// Additional constraints and notes, treated as mandatory rules.
    #[arg(long, default_value = "")]
    notes: String,

    /// Recent call feedback, treated as a high-priority constraint.
    #[arg(long, default_value = "")]
    feedback: String,

    /// Supplementary documents (PDF, DOCX, PPTX); may repeat.
    #[arg(long = "material")]
    materials: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    guidegen::logging::init();

    let cli = Cli::parse();
    let config = GuidegenConfig::load().context("failed to load configuration")?;

    let reference = ReferenceCorpus::load(
        Path::new(&config.reference.path),
        config.reference.max_chars,
    )
    .context("failed to load reference corpus")?;
    if reference.is_empty() {
        warn!("reference library is empty, generation will be less consistent");
    }

    // Credential check happens here, before any material is even read.
    let client = OpenAiClient::from_config(&config.llm)?;

    let materials = read_materials(&cli.materials)?;

    let campaign = CampaignInput {
        product: cli.product,
        goal: cli.goal,
        target_group: cli.target_group,
        personas: cli.personas,
        tone_of_voice: cli.tone,
        notes: cli.notes,
        feedback: cli.feedback,
    };

    let pipeline = Pipeline::new(reference, Arc::new(client), config.extraction.max_chars_per_file);
    let result = match pipeline
        .run(ScriptRequest {
            campaign,
            materials,
        })
        .await
    {
        Ok(result) => result,
        Err(e) => {
            if let Some(hint) = e.retry_hint() {
                warn!("{hint}");
            }
            return Err(e.into());
        }
    };

    for outcome in &result.extractions {
        if let ExtractionOutcome::Failed { filename, reason } = outcome {
            warn!(file = %filename, reason = %reason, "material was not used");
        }
    }
    info!(existing_relationship = result.relationship.is_existing(), "done");

    // Presenter: the script renders as-is.
    println!("{}", result.script.markdown);
    Ok(())
}

/// Read each material file, inferring the format from its name.
fn read_materials(paths: &[PathBuf]) -> Result<Vec<UploadedMaterial>> {
    paths
        .iter()
        .map(|path| {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read material {}", path.display()))?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok(UploadedMaterial {
                format: MaterialFormat::from_filename(&filename),
                filename,
                bytes,
            })
        })
        .collect()
}
