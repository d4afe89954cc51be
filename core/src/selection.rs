//! The selection engine — one ranked, cost-justified decision.
//!
//! Two ranking policies share one entry point:
//!   - Feature-delta candidates are interchangeable solutions to the same
//!     goal, so the cheapest viable one wins (minimum cost).
//!   - Offer candidates are alternative investments, so the best-matched
//!     one wins (maximum match score); cost only acts as the budget
//!     eligibility filter, never as a ranking signal.
//!
//! Ties resolve to the first-listed candidate in both policies. Selection
//! never mutates its inputs and, without an explicit Exploration, performs
//! no random draws at all.

use crate::{
    candidate::{Candidate, CostedCandidate, OfferCategory},
    config::SelectionConfig,
    cost::CostModel,
    error::{EngineError, EngineResult},
    record::CustomerRecord,
    risk::RiskAssessment,
    rng::ExplorationRng,
};
use serde::{Deserialize, Serialize};

/// Opt-in score perturbation for offer ranking. Reproducible from the seed;
/// absent by default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Exploration {
    pub seed: u64,
    /// Maximum absolute jitter added to each match score.
    pub amplitude: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionConstraints {
    /// Candidates costing more than this are ineligible. None = unconstrained.
    pub budget: Option<f64>,
    /// Category favoured by the match-score bonus (offer policy only).
    pub preferred_category: Option<OfferCategory>,
    pub exploration: Option<Exploration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPrinciple {
    MinimalCost,
    BestMatch,
}

impl SelectionPrinciple {
    pub fn label(&self) -> &'static str {
        match self {
            Self::MinimalCost => "Minimal Cost Principle",
            Self::BestMatch => "Best Match Principle",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionOutcome {
    /// Every input candidate, costed, in input order. Over-budget entries
    /// are kept (marked ineligible) so the explainer can account for them.
    pub candidates: Vec<CostedCandidate>,
    pub selected_index: usize,
    pub principle: SelectionPrinciple,
}

impl SelectionOutcome {
    pub fn selected(&self) -> &CostedCandidate {
        &self.candidates[self.selected_index]
    }
}

/// Map the diagnosed risk reasons to the offer category most likely to
/// address them. Price sensitivity outranks instability when both appear.
pub fn derive_preferred_category(assessment: &RiskAssessment) -> OfferCategory {
    let contains = |needle: &str| {
        assessment
            .reasons
            .iter()
            .any(|r| r.label.contains(needle))
    };

    if contains("price sensitive") {
        OfferCategory::Financial
    } else if contains("instability") {
        OfferCategory::Data
    } else {
        OfferCategory::Standard
    }
}

pub struct SelectionEngine {
    config: SelectionConfig,
}

impl SelectionEngine {
    pub fn new(config: SelectionConfig) -> Self {
        Self { config }
    }

    pub fn select(
        &self,
        candidates: &[Candidate],
        original: &CustomerRecord,
        cost_model: &CostModel,
        constraints: &SelectionConstraints,
    ) -> EngineResult<SelectionOutcome> {
        if candidates.is_empty() {
            return Err(EngineError::NoViableCandidate {
                detail: "candidate set is empty".into(),
            });
        }

        let offer_count = candidates.iter().filter(|c| c.is_offer()).count();
        if offer_count != 0 && offer_count != candidates.len() {
            return Err(EngineError::NoViableCandidate {
                detail: "candidate set mixes feature deltas and offers".into(),
            });
        }
        let principle = if offer_count == candidates.len() {
            SelectionPrinciple::BestMatch
        } else {
            SelectionPrinciple::MinimalCost
        };

        // Cost every candidate, then apply the budget eligibility filter.
        let mut costed = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let breakdown = cost_model.cost(original, candidate)?;
            let within_budget = match constraints.budget {
                Some(budget) => breakdown.total <= budget,
                None => true,
            };
            costed.push(CostedCandidate {
                candidate: candidate.clone(),
                cost: breakdown.total,
                match_score: None,
                changed_fields: breakdown.changed_fields,
                within_budget,
                is_selected: false,
            });
        }

        if !costed.iter().any(|c| c.within_budget) {
            return Err(EngineError::NoViableCandidate {
                detail: format!(
                    "no candidate within budget {:.2}",
                    constraints.budget.unwrap_or(0.0),
                ),
            });
        }

        let selected_index = match principle {
            SelectionPrinciple::MinimalCost => self.pick_minimal_cost(&costed),
            SelectionPrinciple::BestMatch => self.pick_best_match(&mut costed, constraints),
        }
        .ok_or_else(|| EngineError::NoViableCandidate {
            detail: "no eligible candidate to rank".into(),
        })?;

        costed[selected_index].is_selected = true;

        log::info!(
            "customer={} select: {} -> '{}' cost={:.2}",
            original.customer_id,
            principle.label(),
            costed[selected_index].candidate.label(),
            costed[selected_index].cost,
        );

        Ok(SelectionOutcome {
            candidates: costed,
            selected_index,
            principle,
        })
    }

    /// Cheapest eligible candidate; strict comparison keeps the first-seen
    /// winner on ties.
    fn pick_minimal_cost(&self, costed: &[CostedCandidate]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, c) in costed.iter().enumerate() {
            if !c.within_budget {
                continue;
            }
            match best {
                Some((_, best_cost)) if c.cost >= best_cost => {}
                _ => best = Some((idx, c.cost)),
            }
        }
        best.map(|(idx, _)| idx)
    }

    /// Highest match score among eligible offers. Scores are only computed
    /// for candidates that survived the budget filter — ineligible offers
    /// are excluded before scoring, not scored and discarded.
    fn pick_best_match(
        &self,
        costed: &mut [CostedCandidate],
        constraints: &SelectionConstraints,
    ) -> Option<usize> {
        let mut rng = constraints.exploration.map(|e| ExplorationRng::new(e.seed));

        let mut best: Option<(usize, f64)> = None;
        for (idx, c) in costed.iter_mut().enumerate() {
            if !c.within_budget {
                continue;
            }
            let Candidate::Offer(offer) = &c.candidate else {
                continue; // mixed sets are rejected before ranking
            };

            let mut score = offer.efficiency * 100.0;
            if constraints.preferred_category == Some(offer.category) {
                score += self.config.category_bonus;
            }
            if let (Some(rng), Some(e)) = (rng.as_mut(), constraints.exploration) {
                score += rng.jitter(e.amplitude);
            }
            c.match_score = Some(score);

            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((idx, score)),
            }
        }
        best.map(|(idx, _)| idx)
    }
}
