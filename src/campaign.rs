//! Campaign input types and validation.
//!
//! A [`CampaignInput`] is request-scoped: it is owned by a single generation
//! run and never shared or mutated across runs.

use serde::{Deserialize, Serialize};

/// What the campaign is trying to book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    /// Collect qualified leads.
    Leads,
    /// Book discovery meetings.
    Meetings,
    /// Fill workshop seats.
    Workshops,
}

impl Goal {
    /// Label used when the goal is written into the prompt.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Leads => "Leads",
            Self::Meetings => "Meetings",
            Self::Workshops => "Workshops",
        }
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured campaign parameters for one generation request.
///
/// `product` and `goal` are mandatory; everything else defaults to an empty
/// contribution to the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignInput {
    /// Description of the product or offer being pitched.
    pub product: String,
    /// Campaign goal.
    pub goal: Goal,
    /// Target group: industries, company size, revenue, employees.
    #[serde(default)]
    pub target_group: String,
    /// Personas: titles, decision makers, new customers vs. upsell.
    #[serde(default)]
    pub personas: String,
    /// Desired tone of voice.
    #[serde(default)]
    pub tone_of_voice: String,
    /// Additional constraints and notes, treated as mandatory rules.
    #[serde(default)]
    pub notes: String,
    /// Recent call feedback, treated as a high-priority constraint.
    #[serde(default)]
    pub feedback: String,
}

impl CampaignInput {
    /// Check mandatory fields before the pipeline starts.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingProduct`] when the product
    /// description is empty or blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.product.trim().is_empty() {
            return Err(ValidationError::MissingProduct);
        }
        Ok(())
    }
}

/// Errors raised by campaign input validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The product description is mandatory.
    #[error("product description must not be empty")]
    MissingProduct,
}
