//! Relationship context detection.
//!
//! Pure keyword scans over the free-text campaign fields. Presence of any
//! existing-relationship signal wins over absence; ties resolve toward
//! [`RelationshipContext::ExistingRelationship`] so a known account is never
//! given a colder opener than necessary.

/// Phrases implying prior contact, existing customer status, or
/// renewal/upsell language.
const RELATIONSHIP_SIGNALS: &[&str] = &[
    "already",
    "existing",
    "current customer",
    "in contact",
    "familiar with",
    "know us",
    "working with",
    "using our",
    "past customer",
    "prior contract",
    "renewal",
    "upsell",
];

/// Phrases in the personas field indicating an upsell audience rather than
/// net-new customers.
const UPSELL_SIGNALS: &[&str] = &[
    "upsell",
    "expand",
    "expansion",
    "existing",
    "customer base",
    "current customer",
];

/// Phrases in recent call feedback indicating time-pressure objections.
const TIME_PRESSURE_SIGNALS: &[&str] = &["busy", "no time", "too busy", "calendar", "time"];

/// Whether the target audience has a prior relationship with the caller's
/// organisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipContext {
    /// Prior contact or brand awareness detected, with the matched phrases.
    ExistingRelationship {
        /// Signal phrases that matched, in scan order.
        matched: Vec<String>,
    },
    /// No relationship indicator found; treat as a cold contact.
    NewContact,
}

impl RelationshipContext {
    /// True when a prior relationship was detected.
    pub fn is_existing(&self) -> bool {
        matches!(self, Self::ExistingRelationship { .. })
    }
}

/// Audience focus derived from the personas field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudienceMode {
    /// Net-new customers: lead with trust-building and the status-quo problem.
    NewCustomer,
    /// Existing accounts: lean on the relationship, frame the natural next step.
    Upsell,
}

/// Scan target-group and personas text for existing-relationship signals.
///
/// Case-insensitive membership test, not scored. Any single match classifies
/// the call as an existing relationship.
pub fn detect_relationship(target_group: &str, personas: &str) -> RelationshipContext {
    let haystack = format!("{} {}", target_group.to_lowercase(), personas.to_lowercase());
    let matched: Vec<String> = RELATIONSHIP_SIGNALS
        .iter()
        .filter(|signal| haystack.contains(**signal))
        .map(|signal| (*signal).to_string())
        .collect();

    if matched.is_empty() {
        RelationshipContext::NewContact
    } else {
        RelationshipContext::ExistingRelationship { matched }
    }
}

/// Classify the audience focus from the personas text.
pub fn detect_audience(personas: &str) -> AudienceMode {
    let text = personas.to_lowercase();
    if UPSELL_SIGNALS.iter().any(|signal| text.contains(signal)) {
        AudienceMode::Upsell
    } else {
        AudienceMode::NewCustomer
    }
}

/// Whether recent call feedback mentions time-pressure objections
/// ("too busy", "no time"). Drives an extra objection-handling directive.
pub fn mentions_time_pressure(feedback: &str) -> bool {
    let text = feedback.to_lowercase();
    TIME_PRESSURE_SIGNALS
        .iter()
        .any(|signal| text.contains(signal))
}
