//! Engine configuration — the auditable policy knobs.
//!
//! Everything that materially changes a recommendation lives here rather
//! than in inline literals: the rule-based scoring thresholds, the
//! per-feature cost card, and the offer match-scoring constants. Each
//! structure carries a version string so a recommendation can be traced
//! back to the policy that produced it.

use crate::types::FeatureName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Thresholds and deltas for the rule-based risk assessor.
/// Adjustments are cumulative and independent; the final score is clamped
/// to [score_floor, score_ceiling].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskRuleConfig {
    pub version: String,
    pub base_score: f64,
    /// Tenure below this many months reads as a new, unstable customer.
    pub new_customer_months: f64,
    pub new_customer_delta: f64,
    /// Tenure above this many months reads as a loyal long-term user.
    pub loyal_months: f64,
    pub loyal_delta: f64,
    /// Monthly charge above this marks the customer as price sensitive.
    pub high_charge_threshold: f64,
    pub high_charge_delta: f64,
    /// Monthly charge below this reads as a low bill burden.
    pub low_charge_threshold: f64,
    pub low_charge_delta: f64,
    /// Applied when the contract type is month-to-month.
    pub month_to_month_delta: f64,
    pub score_floor: f64,
    pub score_ceiling: f64,
}

impl Default for RiskRuleConfig {
    fn default() -> Self {
        Self {
            version: "1.0.0".into(),
            base_score: 50.0,
            new_customer_months: 6.0,
            new_customer_delta: 30.0,
            loyal_months: 60.0,
            loyal_delta: -20.0,
            high_charge_threshold: 80.0,
            high_charge_delta: 20.0,
            low_charge_threshold: 30.0,
            low_charge_delta: -10.0,
            month_to_month_delta: 15.0,
            score_floor: 1.0,
            score_ceiling: 99.0,
        }
    }
}

/// Per-feature unit costs for counterfactual edits.
///
/// The card encodes which attributes are expensive to change: tenure is
/// structurally near-immutable (a customer cannot be made older), contract
/// upgrades carry graduated friction. Features not listed fall back to
/// `default_unit_cost`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostCard {
    pub version: String,
    pub default_unit_cost: f64,
    pub unit_costs: BTreeMap<FeatureName, f64>,
    /// Unit cost at or above which a feature is reported as high-friction.
    pub high_friction_threshold: f64,
    /// Unit cost at or above which a feature is reported as immovable.
    pub immovable_threshold: f64,
}

impl CostCard {
    pub fn unit_cost(&self, feature: &str) -> f64 {
        self.unit_costs
            .get(feature)
            .copied()
            .unwrap_or(self.default_unit_cost)
    }

    /// Features the card treats as immovable (ordered by name).
    pub fn immovable_features(&self) -> Vec<&str> {
        self.unit_costs
            .iter()
            .filter(|(_, c)| **c >= self.immovable_threshold)
            .map(|(f, _)| f.as_str())
            .collect()
    }

    /// High-friction but not immovable features (ordered by name).
    pub fn high_friction_features(&self) -> Vec<&str> {
        self.unit_costs
            .iter()
            .filter(|(_, c)| **c >= self.high_friction_threshold && **c < self.immovable_threshold)
            .map(|(f, _)| f.as_str())
            .collect()
    }
}

impl Default for CostCard {
    fn default() -> Self {
        let unit_costs = [
            ("MonthlyCharges".into(), 1.0),
            ("tenure".into(), 1000.0),
            ("TotalCharges".into(), 1.0),
            ("Contract_One year".into(), 50.0),
            ("Contract_Two year".into(), 100.0),
            ("InternetService_No".into(), 5.0),
        ]
        .into();

        Self {
            version: "1.0.0".into(),
            default_unit_cost: 10.0,
            unit_costs,
            high_friction_threshold: 50.0,
            immovable_threshold: 500.0,
        }
    }
}

/// Constants for offer match scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Added to an offer's match score when its category equals the
    /// preferred category diagnosed from the risk reasons.
    pub category_bonus: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self { category_bonus: 25.0 }
    }
}

/// The full engine policy bundle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub risk_rules: RiskRuleConfig,
    pub cost_card: CostCard,
    pub selection: SelectionConfig,
}

impl EngineConfig {
    /// Load from the data/ directory. Files are optional — a missing file
    /// falls back to the built-in defaults so the runner works out of the
    /// box, but a present-but-invalid file is a hard error.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let risk_rules = load_or_default(&format!("{data_dir}/risk_rules.json"))?;
        let cost_card = load_or_default(&format!("{data_dir}/cost_card.json"))?;
        let selection = load_or_default(&format!("{data_dir}/selection.json"))?;

        Ok(Self {
            risk_rules,
            cost_card,
            selection,
        })
    }
}

fn load_or_default<T: serde::de::DeserializeOwned + Default>(path: &str) -> anyhow::Result<T> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let value = serde_json::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
            log::debug!("config: loaded {path}");
            Ok(value)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("config: {path} not found, using defaults");
            Ok(T::default())
        }
        Err(e) => Err(anyhow::anyhow!("Cannot read {path}: {e}")),
    }
}
