use retention_core::{
    candidate::{Candidate, FeatureChange},
    config::EngineConfig,
    customers::CustomerTable,
    engine::{AnalysisConstraints, RetentionEngine},
    error::EngineError,
    record::CustomerRecord,
    risk::{LogisticArtifact, ModelAssessor, RiskAssessor, RiskBand},
    selection::SelectionPrinciple,
};
use std::collections::BTreeMap;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn high_risk_record() -> CustomerRecord {
    CustomerRecord::new("C-0001")
        .with_numeric("tenure", 3.0)
        .with_numeric("MonthlyCharges", 95.0)
        .with_text("Contract", "Month-to-month")
}

fn safe_record() -> CustomerRecord {
    CustomerRecord::new("C-0002")
        .with_numeric("tenure", 72.0)
        .with_numeric("MonthlyCharges", 20.0)
        .with_text("Contract", "Two year")
}

fn delta_costing(id: usize, cost: f64) -> Candidate {
    Candidate::FeatureDelta {
        id,
        changes: vec![FeatureChange {
            feature: "MonthlyCharges".into(),
            original: 95.0,
            proposed: 95.0 - cost,
        }],
    }
}

fn rule_engine() -> RetentionEngine {
    RetentionEngine::with_rule_assessor(EngineConfig::default())
}

// ── End-to-end: feature-delta path ───────────────────────────────────────────

/// Full pipeline over counterfactual deltas: assess, cost, select the
/// cheapest, explain.
#[test]
fn delta_analysis_selects_cheapest_and_explains() {
    let engine = rule_engine();
    let candidates = [
        delta_costing(1, 45.0),
        delta_costing(2, 30.0),
        delta_costing(3, 38.0),
    ];

    let rec = engine
        .analyze(
            &high_risk_record(),
            &candidates,
            &AnalysisConstraints::default(),
        )
        .unwrap();

    assert_eq!(rec.customer_id, "C-0001");
    assert_eq!(rec.risk.score, 99.0);
    assert_eq!(rec.selected_index, 1);
    assert_eq!(rec.selected().cost, 30.0);
    assert_eq!(rec.explanation.decision.principle, SelectionPrinciple::MinimalCost);
    assert!(
        rec.rationale.contains("lowest business cost"),
        "rationale should state the minimal-cost principle; got '{}'",
        rec.rationale
    );

    let selected_count = rec.candidates.iter().filter(|c| c.is_selected).count();
    assert_eq!(selected_count, 1, "exactly one candidate is selected");
}

/// The engine surfaces an empty candidate set as NoViableCandidate — no
/// partial recommendation is invented.
#[test]
fn empty_candidate_set_aborts_analysis() {
    let engine = rule_engine();

    let result = engine.analyze(
        &high_risk_record(),
        &[],
        &AnalysisConstraints::default(),
    );

    assert!(matches!(
        result,
        Err(EngineError::NoViableCandidate { .. })
    ));
}

/// Analysis is stateless: repeated calls with identical inputs produce
/// identical recommendations.
#[test]
fn repeated_analysis_is_identical() {
    let engine = rule_engine();
    let candidates = [delta_costing(1, 45.0), delta_costing(2, 30.0)];
    let constraints = AnalysisConstraints {
        budget: Some(50.0),
        exploration: None,
    };

    let a = engine
        .analyze(&high_risk_record(), &candidates, &constraints)
        .unwrap();
    let b = engine
        .analyze(&high_risk_record(), &candidates, &constraints)
        .unwrap();

    assert_eq!(a.selected_index, b.selected_index);
    assert_eq!(a.rationale, b.rationale);
    assert_eq!(a.explanation.render(), b.explanation.render());
}

/// The recommendation serializes cleanly for the interactive summary path.
#[test]
fn recommendation_serializes_to_json() {
    let engine = rule_engine();
    let rec = engine
        .analyze(
            &high_risk_record(),
            &[delta_costing(1, 30.0)],
            &AnalysisConstraints::default(),
        )
        .unwrap();

    let json = serde_json::to_string(&rec).unwrap();
    assert!(json.contains("\"customer_id\":\"C-0001\""));
    assert!(json.contains("\"selected_index\":0"));
}

// ── Safe customers ───────────────────────────────────────────────────────────

/// The assess-only path lets the caller skip candidate work for safe
/// customers.
#[test]
fn safe_customer_detected_without_candidates() {
    let engine = rule_engine();

    let risk = engine.assess_only(&safe_record()).unwrap();

    assert_eq!(risk.score, 20.0);
    assert_eq!(risk.band, RiskBand::Safe);
}

// ── Model-backed assessor ────────────────────────────────────────────────────

fn artifact(intercept: f64, weights: &[(&str, f64)]) -> LogisticArtifact {
    LogisticArtifact {
        version: "test".into(),
        intercept,
        weights: weights
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect::<BTreeMap<_, _>>(),
    }
}

/// The model-backed assessor scales the classifier probability to percent
/// and reports no reasons without an importance collaborator.
#[test]
fn model_assessor_scales_probability() {
    // z = 0 → probability 0.5 → score 50.0
    let assessor = ModelAssessor::new(Box::new(artifact(0.0, &[])));
    let assessment = assessor.assess(&safe_record()).unwrap();

    assert_eq!(assessment.score, 50.0);
    assert_eq!(assessment.band, RiskBand::Safe, "50 is not above the line");
    assert!(assessment.reasons.is_empty());
}

/// Features the artifact weights but the record lacks contribute zero,
/// matching the training pipeline's NA fill.
#[test]
fn model_treats_absent_features_as_zero() {
    let with_contract = artifact(0.0, &[("Contract_Two year", -1.6)]);
    let record = CustomerRecord::new("C-M").with_numeric("tenure", 10.0);

    let assessor = ModelAssessor::new(Box::new(with_contract));
    let assessment = assessor.assess(&record).unwrap();

    assert_eq!(assessment.score, 50.0, "absent feature must contribute 0");
}

/// Higher weighted inputs push the probability up monotonically.
#[test]
fn model_probability_tracks_weighted_inputs() {
    let scorer = artifact(-0.35, &[("MonthlyCharges", 0.025), ("tenure", -0.045)]);
    let assessor = ModelAssessor::new(Box::new(scorer));

    let expensive = CustomerRecord::new("C-A")
        .with_numeric("MonthlyCharges", 110.0)
        .with_numeric("tenure", 2.0);
    let cheap = CustomerRecord::new("C-B")
        .with_numeric("MonthlyCharges", 25.0)
        .with_numeric("tenure", 70.0);

    let high = assessor.assess(&expensive).unwrap();
    let low = assessor.assess(&cheap).unwrap();

    assert!(
        high.score > low.score,
        "expected {} > {}",
        high.score,
        low.score
    );
    assert_eq!(high.band, RiskBand::HighRisk);
    assert_eq!(low.band, RiskBand::Safe);
}

/// Either assessor slots into the engine behind the same contract.
#[test]
fn model_engine_runs_full_analysis() {
    let scorer = artifact(2.0, &[]); // probability ≈ 0.88 → high risk
    let engine = RetentionEngine::new(
        EngineConfig::default(),
        Box::new(ModelAssessor::new(Box::new(scorer))),
    );

    let rec = engine
        .analyze(
            &high_risk_record(),
            &[delta_costing(1, 30.0), delta_costing(2, 25.0)],
            &AnalysisConstraints::default(),
        )
        .unwrap();

    assert_eq!(rec.risk.band, RiskBand::HighRisk);
    assert_eq!(rec.selected_index, 1, "cheapest delta still wins");
    assert!(
        rec.explanation.diagnosis.reasons.is_empty(),
        "no importance collaborator, no reasons"
    );
}

// ── Customer table ───────────────────────────────────────────────────────────

/// The customer table parses numerics eagerly and keeps text verbatim.
#[test]
fn customer_table_parses_features() {
    let csv = "\
customerID,tenure,MonthlyCharges,Contract
C-0001,3,95,Month-to-month
C-0002,72,20,Two year
";
    let table = CustomerTable::from_reader(csv.as_bytes()).unwrap();

    assert_eq!(table.len(), 2);
    let record = table.get("C-0001").expect("C-0001 present");
    assert_eq!(record.numeric("tenure").unwrap(), 3.0);
    assert_eq!(record.numeric("MonthlyCharges").unwrap(), 95.0);
    assert_eq!(record.text("Contract").unwrap(), "Month-to-month");

    assert!(table.get("C-9999").is_none());
}

/// Loaded records feed straight into the rule assessor.
#[test]
fn loaded_record_assesses_end_to_end() {
    let csv = "\
customerID,tenure,MonthlyCharges,Contract
C-0001,3,95,Month-to-month
";
    let table = CustomerTable::from_reader(csv.as_bytes()).unwrap();
    let engine = rule_engine();

    let risk = engine.assess_only(table.get("C-0001").unwrap()).unwrap();
    assert_eq!(risk.score, 99.0);
    assert_eq!(risk.band, RiskBand::HighRisk);
}
