//! Prompt assembly.
//!
//! Pure, deterministic merge of the reference corpus, campaign fields,
//! relationship context, and extracted material into one instruction
//! payload. Ordering is fixed and load-bearing: later sections are framed
//! as higher-priority overrides, so constraints and feedback always come
//! last. Re-assembling identical inputs yields byte-identical output.

use crate::campaign::CampaignInput;
use crate::context::{self, AudienceMode, RelationshipContext};
use crate::extract::ExtractionOutcome;
use crate::reference::ReferenceCorpus;

/// The six output sections every generated script must carry, in order.
pub const SCRIPT_SECTIONS: [&str; 6] = [
    "Hook",
    "Why Now",
    "Discovery",
    "Value Prop",
    "CTA",
    "Objection Handling",
];

/// System role sent with every generation request.
pub const SYSTEM_ROLE: &str = "You create sharp, context-aware, ready-to-use COLD OUTREACH calling scripts. \
You are NOT writing marketing copy or website content, this is a real phone conversation. \
Analyze the provided reference examples and mimic their style, tone, and structure, \
especially the painless low-friction approach. \
STRICTLY follow the user-provided context (Target Group, Personas, Notes, Feedback). \
If the context indicates a prior relationship or brand awareness, SKIP introductions and start from relevance. \
Be punchy, direct, conversational. Eliminate corporate fluff and generic messaging. \
Treat user feedback and constraint notes as MANDATORY constraints.";

/// Header introducing the reference corpus section.
pub const REFERENCE_HEADER: &str = "## Reference Examples";
/// Header introducing the campaign fields section.
pub const CAMPAIGN_HEADER: &str = "## Campaign Inputs";
/// Header introducing the extracted-material section.
pub const KNOWLEDGE_HEADER: &str = "## Deep Knowledge Base";
/// Header introducing the mandatory constraints section.
pub const CONSTRAINTS_HEADER: &str = "## MANDATORY CONSTRAINTS";

/// The final instruction payload for one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPrompt {
    /// System role text.
    pub system: String,
    /// User payload with the ordered instruction sections.
    pub user: String,
}

/// Assemble the instruction payload.
///
/// Section order, fixed: output-format instruction, reference corpus,
/// campaign fields, relationship directive, deep knowledge base, mandatory
/// constraints. No randomness, no caching.
pub fn assemble(
    reference: &ReferenceCorpus,
    input: &CampaignInput,
    relationship: &RelationshipContext,
    extractions: &[ExtractionOutcome],
) -> AssembledPrompt {
    let mut user = String::new();

    // (a) Output format and style constraints.
    user.push_str("You are crafting a COLD OUTREACH calling script for a sales campaign.\n");
    user.push_str(
        "This is a real phone call, not marketing copy. Be punchy, direct, and conversational.\n\n",
    );
    user.push_str("Output clean Markdown with exactly these six section headers, in this order:\n");
    for section in SCRIPT_SECTIONS {
        user.push_str(&format!("## {section}\n"));
    }
    user.push_str(
        "\nKeep the script tight enough to deliver in under two minutes. \
Objection Handling holds 3 examples in \"If they say X, say Y\" format.\n",
    );

    // (b) Reference corpus: exemplars to imitate, never to copy.
    user.push_str(&format!("\n{REFERENCE_HEADER}\n"));
    user.push_str(
        "Analyze the style, tone, and structure of these exemplar scripts and imitate them. \
Do not copy them verbatim.\n",
    );
    if reference.is_empty() {
        user.push_str("N/A\n");
    } else {
        user.push_str(reference.text());
        user.push('\n');
    }

    // (c) Structured campaign fields, each labeled by name.
    user.push_str(&format!("\n{CAMPAIGN_HEADER}\n"));
    user.push_str(&format!("- Product: {}\n", labeled(&input.product)));
    user.push_str(&format!("- Goal: {}\n", input.goal));
    user.push_str(&format!("- Target Group: {}\n", labeled(&input.target_group)));
    user.push_str(&format!("- Personas: {}\n", labeled(&input.personas)));
    user.push_str(&format!(
        "- Audience Focus: {}\n",
        audience_instruction(context::detect_audience(&input.personas))
    ));
    user.push_str(&format!(
        "- Tone of Voice: {}\n",
        if input.tone_of_voice.trim().is_empty() {
            "Professional yet conversational. Confident, concise, and helpful."
        } else {
            input.tone_of_voice.trim()
        }
    ));

    // (d) Relationship directive.
    user.push_str("\n## Relationship Context\n");
    match relationship {
        RelationshipContext::ExistingRelationship { matched } => {
            user.push_str(&format!(
                "The target group indicates a prior relationship or brand awareness \
(matched: {}). SKIP all brand introductions and \"what is this company\" explanations. \
Start from relevance, not from zero: assume they know who you are and focus on why \
this matters now for their context.\n",
                matched.join(", ")
            ));
        }
        RelationshipContext::NewContact => {
            user.push_str(
                "No prior relationship detected. Treat this as a cold first contact: \
earn trust quickly, name the status-quo problem, and explain why change now.\n",
            );
        }
    }

    // (e) Deep knowledge base: optional enrichment, never an override.
    let extracted: Vec<_> = extractions.iter().filter_map(|o| o.text()).collect();
    if !extracted.is_empty() {
        user.push_str(&format!("\n{KNOWLEDGE_HEADER}\n"));
        user.push_str(
            "Supplementary material extracted from uploaded documents. Use it to enrich \
the script with specifics, but it must NOT override the product description above.\n",
        );
        for item in extracted {
            user.push_str(&format!("\n### {}\n{}\n", item.filename, item.text));
        }
    }

    // (f) Mandatory overrides, always last so they win.
    let busy = context::mentions_time_pressure(&input.feedback);
    if !input.notes.trim().is_empty() || !input.feedback.trim().is_empty() || busy {
        user.push_str(&format!("\n{CONSTRAINTS_HEADER}\n"));
        user.push_str("These rules take precedence over everything above. Failure to follow them means the script is rejected.\n");
        if !input.feedback.trim().is_empty() {
            user.push_str(&format!(
                "- Recent call feedback (HIGH PRIORITY): {}\n",
                input.feedback.trim()
            ));
        }
        if !input.notes.trim().is_empty() {
            user.push_str(&format!("- Constraint notes (MANDATORY): {}\n", input.notes.trim()));
        }
        if busy {
            user.push_str(
                "- Objection Handling MUST directly address \"I don't have time\" for this \
persona: concise, respectful of their time, with a frictionless next step.\n",
            );
        }
    }

    AssembledPrompt {
        system: SYSTEM_ROLE.to_string(),
        user,
    }
}

fn labeled(field: &str) -> &str {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        "N/A"
    } else {
        trimmed
    }
}

fn audience_instruction(mode: AudienceMode) -> &'static str {
    match mode {
        AudienceMode::NewCustomer => {
            "New Customer: lead with trust-building, highlight the status-quo problem, and why change now."
        }
        AudienceMode::Upsell => {
            "Upsell: lean on the existing relationship, show how this is the natural next step for their size and revenue, and reflect established familiarity."
        }
    }
}
