//! Presentation transforms — the interactive summary and the static
//! document.
//!
//! Both are pure projections of a Recommendation's explanation. Neither
//! computes anything of its own; a dashboard and a printed report can never
//! drift apart because they share the same upstream structure.

use crate::{
    engine::Recommendation,
    explain::Explanation,
    risk::RiskBand,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Fields broken out for widgets and metric tiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenSummary {
    pub customer_id: String,
    pub churn_probability_pct: f64,
    pub status: String,
    pub monthly_bill: Option<f64>,
    pub selected_label: String,
    pub selected_cost: f64,
    pub rationale: String,
}

impl ScreenSummary {
    pub fn from_recommendation(rec: &Recommendation) -> Self {
        let selected = rec.selected();
        Self {
            customer_id: rec.customer_id.clone(),
            churn_probability_pct: rec.risk.score,
            status: rec.risk.band.label().to_string(),
            monthly_bill: rec.monthly_bill,
            selected_label: selected.candidate.label(),
            selected_cost: selected.cost,
            rationale: rec.rationale.clone(),
        }
    }

    pub fn is_high_risk(&self) -> bool {
        self.status == RiskBand::HighRisk.label()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    pub heading: String,
    pub body: String,
}

/// The static analysis document: a title, an optional timestamp, and the
/// explanation's three sections with their ASCII-safe bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub title: String,
    pub generated_at: Option<DateTime<Utc>>,
    pub sections: Vec<ReportSection>,
}

impl ReportDocument {
    pub fn from_explanation(explanation: &Explanation) -> Self {
        let [diagnosis, options, decision] = explanation.section_bodies_ascii();
        let sections = vec![
            ReportSection {
                heading: format!(
                    "{} (Customer #{})",
                    Explanation::SECTION_DIAGNOSIS,
                    explanation.diagnosis.customer_id,
                ),
                body: diagnosis,
            },
            ReportSection {
                heading: Explanation::SECTION_OPTIONS.to_string(),
                body: options,
            },
            ReportSection {
                heading: Explanation::SECTION_DECISION.to_string(),
                body: decision,
            },
        ];

        Self {
            title: "Retention Desk - Customer Analysis Report".to_string(),
            generated_at: None,
            sections,
        }
    }

    /// Stamp the document. Content stays deterministic; only this header
    /// line varies between runs.
    pub fn with_timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        if let Some(at) = self.generated_at {
            let _ = writeln!(out, "Generated: {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        let _ = writeln!(out);
        for section in &self.sections {
            let _ = writeln!(out, "{}", section.heading);
            let _ = writeln!(out, "{}", "-".repeat(section.heading.len()));
            out.push_str(&section.body);
            let _ = writeln!(out);
        }
        out
    }
}
