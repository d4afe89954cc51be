//! Intervention candidates and their costed form.
//!
//! A candidate is immutable after creation and is never partially scored:
//! selection either costs the whole set and marks exactly one winner, or
//! fails without marking anything.

use crate::types::FeatureName;
use serde::{Deserialize, Serialize};

/// Business category of a catalog offer. Drives the category bonus when it
/// matches the preferred category diagnosed from the risk reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferCategory {
    Financial,
    Data,
    Standard,
}

impl OfferCategory {
    /// Parse a catalog `Type` cell. Unknown types fall back to Standard.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "financial" => Self::Financial,
            "data" => Self::Data,
            _ => Self::Standard,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Financial => "Financial",
            Self::Data => "Data",
            Self::Standard => "Standard",
        }
    }
}

/// One proposed edit to a model input feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureChange {
    pub feature: FeatureName,
    pub original: f64,
    pub proposed: f64,
}

/// A named retention offer drawn from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionOffer {
    pub name: String,
    pub cost: f64,
    pub category: OfferCategory,
    /// Monotonic "higher is better" effectiveness rating.
    pub efficiency: f64,
}

/// One intervention the engine may recommend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Candidate {
    /// A hypothetical edit to the customer's feature vector, produced by an
    /// external counterfactual generator.
    FeatureDelta {
        id: usize,
        changes: Vec<FeatureChange>,
    },
    /// A discrete offer from the retention catalog.
    Offer(RetentionOffer),
}

impl Candidate {
    /// Short display label: "Option 2" or the offer name.
    pub fn label(&self) -> String {
        match self {
            Candidate::FeatureDelta { id, .. } => format!("Option {id}"),
            Candidate::Offer(offer) => offer.name.clone(),
        }
    }

    pub fn is_offer(&self) -> bool {
        matches!(self, Candidate::Offer(_))
    }
}

/// A candidate after costing. `match_score` is set only for offers that
/// survived the budget filter; `is_selected` is true for exactly one
/// candidate in a successful selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostedCandidate {
    pub candidate: Candidate,
    pub cost: f64,
    pub match_score: Option<f64>,
    /// Human-readable "field: old -> new" descriptions (offer name for
    /// catalog candidates). Canonical form is ASCII; renderers substitute
    /// glyphs.
    pub changed_fields: Vec<String>,
    pub within_budget: bool,
    pub is_selected: bool,
}
