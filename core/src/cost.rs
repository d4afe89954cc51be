//! The cost model — what each intervention costs the business.
//!
//! Feature-delta candidates accumulate |delta| × unit_cost per changed
//! feature, with a tolerance that ignores floating noise. Offer candidates
//! cost exactly their declared price. Cost is always ≥ 0 and is 0 iff no
//! field actually changes.

use crate::{
    candidate::Candidate,
    config::CostCard,
    error::EngineResult,
    record::CustomerRecord,
};
use serde::{Deserialize, Serialize};

/// Deltas at or below this magnitude are floating noise, not changes.
pub const CHANGE_TOLERANCE: f64 = 0.001;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub total: f64,
    /// "field: old -> new" per real change; the offer name for catalog
    /// candidates. Empty iff the candidate changes nothing.
    pub changed_fields: Vec<String>,
}

pub struct CostModel {
    card: CostCard,
}

impl CostModel {
    pub fn new(card: CostCard) -> Self {
        Self { card }
    }

    pub fn card(&self) -> &CostCard {
        &self.card
    }

    pub fn cost(
        &self,
        original: &CustomerRecord,
        candidate: &Candidate,
    ) -> EngineResult<CostBreakdown> {
        match candidate {
            Candidate::Offer(offer) => Ok(CostBreakdown {
                total: offer.cost,
                changed_fields: vec![offer.name.clone()],
            }),
            Candidate::FeatureDelta { id, changes } => {
                let mut total = 0.0;
                let mut changed_fields = Vec::new();

                for change in changes {
                    // The declared original should agree with the record;
                    // a generator that drifted from the live record is
                    // worth a warning but not an abort.
                    if let Some(live) = original
                        .get(&change.feature)
                        .and_then(|v| v.as_numeric())
                    {
                        if (live - change.original).abs() > CHANGE_TOLERANCE {
                            log::warn!(
                                "customer={} cost: candidate {id} declares {}={} but record has {live}",
                                original.customer_id,
                                change.feature,
                                change.original,
                            );
                        }
                    }

                    let delta = (change.original - change.proposed).abs();
                    if delta > CHANGE_TOLERANCE {
                        let unit = self.card.unit_cost(&change.feature);
                        total += delta * unit;
                        changed_fields.push(format!(
                            "{}: {:.0} -> {:.0}",
                            change.feature, change.original, change.proposed,
                        ));
                    }
                }

                Ok(CostBreakdown {
                    total,
                    changed_fields,
                })
            }
        }
    }
}
