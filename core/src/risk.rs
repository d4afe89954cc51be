//! Risk assessment — one contract, two interchangeable strategies.
//!
//! The rule-based assessor applies ordered threshold adjustments to a fixed
//! base score, with a named reason per adjustment. The model-backed
//! assessor delegates to a loaded classifier artifact and has no intrinsic
//! reasons unless a feature-importance collaborator supplies them.
//!
//! Both are pure functions of the record. Both report on the same percent
//! scale so everything downstream is strategy-agnostic.

use crate::{
    config::RiskRuleConfig,
    error::EngineResult,
    record::CustomerRecord,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const FEATURE_TENURE: &str = "tenure";
pub const FEATURE_MONTHLY_CHARGES: &str = "MonthlyCharges";
pub const FEATURE_CONTRACT: &str = "Contract";

/// The month-to-month spelling used in the telco customer table.
pub const CONTRACT_MONTH_TO_MONTH: &str = "Month-to-month";

pub const REASON_NEW_CUSTOMER: &str = "new customer, high instability";
pub const REASON_LOYAL: &str = "loyal long-term user";
pub const REASON_PRICE_SENSITIVE: &str = "high expense, price sensitive";
pub const REASON_LOW_BILL: &str = "low bill burden";
pub const REASON_NO_CONTRACT: &str = "no long-term contract";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Increases,
    Decreases,
}

/// One named contributor to the risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReason {
    pub direction: Direction,
    pub label: String,
}

impl RiskReason {
    pub fn increases(label: &str) -> Self {
        Self {
            direction: Direction::Increases,
            label: label.to_string(),
        }
    }

    pub fn decreases(label: &str) -> Self {
        Self {
            direction: Direction::Decreases,
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    HighRisk,
    Safe,
}

impl RiskBand {
    pub fn label(&self) -> &'static str {
        match self {
            Self::HighRisk => "HIGH RISK",
            Self::Safe => "Safe",
        }
    }

    /// A customer above 50% is treated as a churn risk.
    pub fn from_score(score: f64) -> Self {
        if score > 50.0 {
            Self::HighRisk
        } else {
            Self::Safe
        }
    }
}

/// The outcome of one assessment. Built once per analysis, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Churn risk in percent [0, 100]. The rule-based path further clamps
    /// to [1, 99].
    pub score: f64,
    pub band: RiskBand,
    pub reasons: Vec<RiskReason>,
}

/// The single contract both strategies fulfil.
pub trait RiskAssessor: Send + Sync {
    fn name(&self) -> &'static str;

    fn assess(&self, record: &CustomerRecord) -> EngineResult<RiskAssessment>;
}

// ── Rule-based strategy ──────────────────────────────────────────────────────

pub struct RuleAssessor {
    rules: RiskRuleConfig,
}

impl RuleAssessor {
    pub fn new(rules: RiskRuleConfig) -> Self {
        Self { rules }
    }
}

impl RiskAssessor for RuleAssessor {
    fn name(&self) -> &'static str {
        "rules"
    }

    fn assess(&self, record: &CustomerRecord) -> EngineResult<RiskAssessment> {
        let r = &self.rules;

        // Required fields first — all three must be present before any
        // adjustment is applied, so a partial record never half-scores.
        let tenure = record.numeric(FEATURE_TENURE)?;
        let monthly = record.numeric(FEATURE_MONTHLY_CHARGES)?;
        let contract = record.text(FEATURE_CONTRACT)?;

        let mut score = r.base_score;
        let mut reasons = Vec::new();

        // Adjustments are cumulative and independent — no early exit.
        if tenure < r.new_customer_months {
            score += r.new_customer_delta;
            reasons.push(RiskReason::increases(REASON_NEW_CUSTOMER));
        }
        if tenure > r.loyal_months {
            score += r.loyal_delta;
            reasons.push(RiskReason::decreases(REASON_LOYAL));
        }
        if monthly > r.high_charge_threshold {
            score += r.high_charge_delta;
            reasons.push(RiskReason::increases(REASON_PRICE_SENSITIVE));
        }
        if monthly < r.low_charge_threshold {
            score += r.low_charge_delta;
            reasons.push(RiskReason::decreases(REASON_LOW_BILL));
        }
        if contract.eq_ignore_ascii_case(CONTRACT_MONTH_TO_MONTH) {
            score += r.month_to_month_delta;
            reasons.push(RiskReason::increases(REASON_NO_CONTRACT));
        }

        let score = score.clamp(r.score_floor, r.score_ceiling);

        log::debug!(
            "customer={} risk: rules v{} score={score:.0} ({} reasons)",
            record.customer_id,
            r.version,
            reasons.len(),
        );

        Ok(RiskAssessment {
            score,
            band: RiskBand::from_score(score),
            reasons,
        })
    }
}

// ── Model-backed strategy ────────────────────────────────────────────────────

/// Inference contract for a trained churn classifier. Implementations
/// return the churn-class probability in [0, 1].
pub trait ChurnModel: Send + Sync {
    fn version(&self) -> &str;

    fn churn_probability(&self, record: &CustomerRecord) -> EngineResult<f64>;
}

/// Optional collaborator that can name the features driving a model
/// prediction. Without one, the model-backed path reports no reasons.
pub trait FeatureImportance: Send + Sync {
    fn reasons(&self, record: &CustomerRecord) -> Vec<RiskReason>;
}

/// A logistic scoring artifact: intercept plus per-feature weights, loaded
/// from JSON. Features absent from the record contribute zero, matching the
/// training pipeline's NA fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticArtifact {
    pub version: String,
    pub intercept: f64,
    pub weights: BTreeMap<String, f64>,
}

impl LogisticArtifact {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let artifact: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        log::info!(
            "risk: loaded scoring artifact v{} ({} weights)",
            artifact.version,
            artifact.weights.len(),
        );
        Ok(artifact)
    }
}

impl ChurnModel for LogisticArtifact {
    fn version(&self) -> &str {
        &self.version
    }

    fn churn_probability(&self, record: &CustomerRecord) -> EngineResult<f64> {
        let mut z = self.intercept;
        for (feature, weight) in &self.weights {
            z += weight * record.numeric_or_zero(feature);
        }
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

pub struct ModelAssessor {
    model: Box<dyn ChurnModel>,
    importance: Option<Box<dyn FeatureImportance>>,
}

impl ModelAssessor {
    pub fn new(model: Box<dyn ChurnModel>) -> Self {
        Self {
            model,
            importance: None,
        }
    }

    pub fn with_importance(mut self, importance: Box<dyn FeatureImportance>) -> Self {
        self.importance = Some(importance);
        self
    }
}

impl RiskAssessor for ModelAssessor {
    fn name(&self) -> &'static str {
        "model"
    }

    fn assess(&self, record: &CustomerRecord) -> EngineResult<RiskAssessment> {
        let probability = self.model.churn_probability(record)?;
        let score = (probability * 100.0).clamp(0.0, 100.0);

        let reasons = match &self.importance {
            Some(imp) => imp.reasons(record),
            None => Vec::new(),
        };

        log::debug!(
            "customer={} risk: model v{} score={score:.1}",
            record.customer_id,
            self.model.version(),
        );

        Ok(RiskAssessment {
            score,
            band: RiskBand::from_score(score),
            reasons,
        })
    }
}
