//! The explainer — a structured justification for one recommendation.
//!
//! The explanation is a value, not a string: three fixed sections
//! (diagnosis, options considered, decision logic) that every renderer
//! formats from the same data. The screen and the report document are pure
//! formatting transforms over this structure and can never disagree on
//! content. The rich renderer uses arrows and directional glyphs; the safe
//! renderer substitutes plain ASCII tags for anything a downstream
//! serializer might mangle.

use crate::{
    candidate::CostedCandidate,
    config::CostCard,
    risk::{Direction, RiskAssessment, RiskBand, RiskReason},
    selection::{SelectionOutcome, SelectionPrinciple},
};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

pub struct ExplainContext<'a> {
    pub customer_id: &'a str,
    pub risk: &'a RiskAssessment,
    pub outcome: &'a SelectionOutcome,
    pub budget: Option<f64>,
    pub card: &'a CostCard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnosis {
    pub customer_id: String,
    pub score: f64,
    pub band: RiskBand,
    pub reasons: Vec<RiskReason>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionVerdict {
    Recommended,
    Rejected,
    OverBudget,
}

impl OptionVerdict {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Recommended => "Recommended",
            Self::Rejected => "Rejected",
            Self::OverBudget => "Rejected (over budget)",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionSummary {
    pub label: String,
    pub cost: f64,
    pub match_score: Option<f64>,
    /// Canonical ASCII change descriptions ("field: old -> new").
    pub changes: Vec<String>,
    pub verdict: OptionVerdict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionLogic {
    pub principle: SelectionPrinciple,
    pub winner_label: String,
    pub winner_cost: f64,
    pub budget: Option<f64>,
    /// Attributes the cost card prices out of consideration entirely.
    pub immovable: Vec<String>,
    /// Attributes the cost card makes expensive but not impossible.
    pub high_friction: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub diagnosis: Diagnosis,
    pub options: Vec<OptionSummary>,
    pub decision: DecisionLogic,
}

/// Build the structured justification from a completed selection.
pub fn explain(ctx: &ExplainContext) -> Explanation {
    let diagnosis = Diagnosis {
        customer_id: ctx.customer_id.to_string(),
        score: ctx.risk.score,
        band: ctx.risk.band,
        reasons: ctx.risk.reasons.clone(),
    };

    let options = ctx
        .outcome
        .candidates
        .iter()
        .map(|c| OptionSummary {
            label: c.candidate.label(),
            cost: c.cost,
            match_score: c.match_score,
            changes: c.changed_fields.clone(),
            verdict: verdict_for(c),
        })
        .collect();

    let winner = ctx.outcome.selected();
    let decision = DecisionLogic {
        principle: ctx.outcome.principle,
        winner_label: winner.candidate.label(),
        winner_cost: winner.cost,
        budget: ctx.budget,
        immovable: to_owned(ctx.card.immovable_features()),
        high_friction: to_owned(ctx.card.high_friction_features()),
    };

    Explanation {
        diagnosis,
        options,
        decision,
    }
}

fn verdict_for(c: &CostedCandidate) -> OptionVerdict {
    if c.is_selected {
        OptionVerdict::Recommended
    } else if c.within_budget {
        OptionVerdict::Rejected
    } else {
        OptionVerdict::OverBudget
    }
}

fn to_owned(features: Vec<&str>) -> Vec<String> {
    features.into_iter().map(str::to_string).collect()
}

// ── Rendering ────────────────────────────────────────────────────────────────

struct Glyphs {
    arrow: &'static str,
    up: &'static str,
    down: &'static str,
}

const RICH: Glyphs = Glyphs {
    arrow: " \u{2192} ", // →
    up: "\u{2191}",      // ↑
    down: "\u{2193}",    // ↓
};

const ASCII: Glyphs = Glyphs {
    arrow: " -> ",
    up: "[UP]",
    down: "[DOWN]",
};

impl Explanation {
    pub const SECTION_DIAGNOSIS: &'static str = "1. Diagnosis";
    pub const SECTION_OPTIONS: &'static str = "2. Retention Strategies Considered";
    pub const SECTION_DECISION: &'static str = "3. Decision Logic";

    /// Rich text for interactive display.
    pub fn render(&self) -> String {
        self.render_with(&RICH)
    }

    /// ASCII-safe text for serializers that cannot carry glyphs.
    pub fn render_ascii(&self) -> String {
        self.render_with(&ASCII)
    }

    /// Per-section bodies (no headings), ASCII-safe. Used by the report
    /// document builder so the document mirrors the same three sections.
    pub fn section_bodies_ascii(&self) -> [String; 3] {
        [
            self.diagnosis_body(&ASCII),
            self.options_body(&ASCII),
            self.decision_body(),
        ]
    }

    /// One-sentence recommendation rationale, ASCII-safe.
    pub fn summary_sentence(&self) -> String {
        let d = &self.decision;
        match d.principle {
            SelectionPrinciple::MinimalCost => format!(
                "We recommend executing {}. While other options were technically possible, \
                 it achieves customer retention at the lowest business cost ({:.2}).",
                d.winner_label, d.winner_cost,
            ),
            SelectionPrinciple::BestMatch => format!(
                "We recommend executing {}. Among the offers within budget it best matches \
                 the diagnosed churn driver.",
                d.winner_label,
            ),
        }
    }

    fn render_with(&self, glyphs: &Glyphs) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", Self::SECTION_DIAGNOSIS);
        out.push_str(&self.diagnosis_body(glyphs));
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", Self::SECTION_OPTIONS);
        out.push_str(&self.options_body(glyphs));
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", Self::SECTION_DECISION);
        out.push_str(&self.decision_body());
        out
    }

    fn diagnosis_body(&self, glyphs: &Glyphs) -> String {
        let d = &self.diagnosis;
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Customer #{}: {:.1}% churn probability ({}).",
            d.customer_id,
            d.score,
            d.band.label(),
        );
        if d.reasons.is_empty() {
            let _ = writeln!(out, "No named risk factors were reported for this score.");
        } else {
            let _ = writeln!(out, "Contributing factors:");
            for reason in &d.reasons {
                let tag = match reason.direction {
                    Direction::Increases => glyphs.up,
                    Direction::Decreases => glyphs.down,
                };
                let _ = writeln!(out, "  {tag} {}", reason.label);
            }
        }
        out
    }

    fn options_body(&self, glyphs: &Glyphs) -> String {
        let mut out = String::new();
        for opt in &self.options {
            match opt.match_score {
                Some(score) => {
                    let _ = writeln!(
                        out,
                        "{} ({}) - cost {:.2}, match score {:.1}",
                        opt.label,
                        opt.verdict.label(),
                        opt.cost,
                        score,
                    );
                }
                None => {
                    let _ = writeln!(
                        out,
                        "{} ({}) - cost {:.2}",
                        opt.label,
                        opt.verdict.label(),
                        opt.cost,
                    );
                }
            }
            for change in &opt.changes {
                let _ = writeln!(out, "  - {}", change.replace(" -> ", glyphs.arrow));
            }
        }
        out
    }

    fn decision_body(&self) -> String {
        let d = &self.decision;
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Evaluated {} scenario(s); selected {} under the {}.",
            self.options.len(),
            d.winner_label,
            d.principle.label(),
        );
        if let Some(budget) = d.budget {
            let _ = writeln!(out, "Budget ceiling applied: {budget:.2}.");
        }
        if !d.immovable.is_empty() {
            let _ = writeln!(
                out,
                "Treated as unchangeable: {}.",
                d.immovable.join(", "),
            );
        }
        if !d.high_friction.is_empty() {
            let _ = writeln!(
                out,
                "Treated as high-friction and avoided where possible: {}.",
                d.high_friction.join(", "),
            );
        }
        let _ = writeln!(out, "{}", self.summary_sentence());
        out
    }
}
