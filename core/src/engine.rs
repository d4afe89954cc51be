//! The retention engine — one analysis call, one recommendation.
//!
//! DATA FLOW (fixed, documented, never reordered):
//!   1. RiskAssessor  — record → score + reasons
//!   2. CandidateSet  — supplied by the caller (generator or catalog)
//!   3. CostModel     — per-candidate business cost
//!   4. Selection     — minimal-cost or best-match winner under constraints
//!   5. Explainer     — structured three-section justification
//!
//! RULES:
//!   - The engine holds no state across calls; everything it owns is
//!     read-only policy loaded at construction.
//!   - A failed step aborts the whole analysis. No partial or guessed
//!     recommendation is ever returned.

use crate::{
    candidate::{Candidate, CostedCandidate},
    config::EngineConfig,
    cost::CostModel,
    error::EngineResult,
    explain::{explain, ExplainContext, Explanation},
    record::CustomerRecord,
    risk::{RiskAssessment, RiskAssessor, RuleAssessor, FEATURE_MONTHLY_CHARGES},
    selection::{
        derive_preferred_category, Exploration, SelectionConstraints, SelectionEngine,
    },
    types::CustomerId,
};
use serde::{Deserialize, Serialize};

/// Caller-supplied limits for one analysis.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AnalysisConstraints {
    pub budget: Option<f64>,
    pub exploration: Option<Exploration>,
}

/// The terminal output of one analysis. Built once, read-only; a new
/// analysis produces a new Recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub customer_id: CustomerId,
    pub risk: RiskAssessment,
    pub candidates: Vec<CostedCandidate>,
    pub selected_index: usize,
    pub explanation: Explanation,
    /// One-sentence justification for the selected candidate.
    pub rationale: String,
    /// Convenience field for metric tiles; None when the record has no
    /// monthly charge.
    pub monthly_bill: Option<f64>,
}

impl Recommendation {
    pub fn selected(&self) -> &CostedCandidate {
        &self.candidates[self.selected_index]
    }
}

pub struct RetentionEngine {
    assessor: Box<dyn RiskAssessor>,
    cost_model: CostModel,
    selection: SelectionEngine,
}

impl RetentionEngine {
    pub fn new(config: EngineConfig, assessor: Box<dyn RiskAssessor>) -> Self {
        Self {
            assessor,
            cost_model: CostModel::new(config.cost_card),
            selection: SelectionEngine::new(config.selection),
        }
    }

    /// Engine wired with the rule-based assessor from the same config.
    pub fn with_rule_assessor(config: EngineConfig) -> Self {
        let assessor = Box::new(RuleAssessor::new(config.risk_rules.clone()));
        Self::new(config, assessor)
    }

    pub fn assessor_name(&self) -> &'static str {
        self.assessor.name()
    }

    /// Risk only — lets the caller skip candidate work for safe customers.
    pub fn assess_only(&self, record: &CustomerRecord) -> EngineResult<RiskAssessment> {
        self.assessor.assess(record)
    }

    pub fn analyze(
        &self,
        record: &CustomerRecord,
        candidates: &[Candidate],
        constraints: &AnalysisConstraints,
    ) -> EngineResult<Recommendation> {
        let risk = self.assessor.assess(record)?;

        let selection_constraints = SelectionConstraints {
            budget: constraints.budget,
            preferred_category: Some(derive_preferred_category(&risk)),
            exploration: constraints.exploration,
        };

        let outcome = self.selection.select(
            candidates,
            record,
            &self.cost_model,
            &selection_constraints,
        )?;

        let explanation = explain(&ExplainContext {
            customer_id: &record.customer_id,
            risk: &risk,
            outcome: &outcome,
            budget: constraints.budget,
            card: self.cost_model.card(),
        });
        let rationale = explanation.summary_sentence();

        let monthly_bill = record
            .get(FEATURE_MONTHLY_CHARGES)
            .and_then(|v| v.as_numeric());

        log::info!(
            "customer={} analyze: score={:.1} ({}) -> '{}'",
            record.customer_id,
            risk.score,
            risk.band.label(),
            outcome.selected().candidate.label(),
        );

        Ok(Recommendation {
            customer_id: record.customer_id.clone(),
            risk,
            candidates: outcome.candidates,
            selected_index: outcome.selected_index,
            explanation,
            rationale,
            monthly_bill,
        })
    }
}
