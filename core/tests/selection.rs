use retention_core::{
    candidate::{Candidate, FeatureChange, OfferCategory, RetentionOffer},
    config::{CostCard, SelectionConfig},
    cost::CostModel,
    error::EngineError,
    record::CustomerRecord,
    selection::{SelectionConstraints, SelectionEngine, SelectionPrinciple},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn make_engine() -> (SelectionEngine, CostModel) {
    (
        SelectionEngine::new(SelectionConfig::default()),
        CostModel::new(CostCard::default()),
    )
}

fn make_record() -> CustomerRecord {
    CustomerRecord::new("C-SEL").with_numeric("MonthlyCharges", 95.0)
}

/// A delta candidate whose cost equals `cost` (MonthlyCharges unit cost is
/// 1.0, so the proposed value is original − cost).
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

fn offer(name: &str, cost: f64, category: OfferCategory, efficiency: f64) -> Candidate {
    Candidate::Offer(RetentionOffer {
        name: name.into(),
        cost,
        category,
        efficiency,
    })
}

fn unconstrained() -> SelectionConstraints {
    SelectionConstraints::default()
}

fn budget(b: f64) -> SelectionConstraints {
    SelectionConstraints {
        budget: Some(b),
        ..Default::default()
    }
}

// ── Feature-delta policy ─────────────────────────────────────────────────────

/// Deltas are interchangeable solutions: the cheapest one wins.
#[test]
fn cheapest_delta_wins() {
    let (engine, cost_model) = make_engine();
    let record = make_record();
    let candidates = [
        delta_costing(1, 45.0),
        delta_costing(2, 30.0),
        delta_costing(3, 38.0),
    ];

    let outcome = engine
        .select(&candidates, &record, &cost_model, &unconstrained())
        .unwrap();

    assert_eq!(outcome.principle, SelectionPrinciple::MinimalCost);
    assert_eq!(outcome.selected_index, 1);
    assert_eq!(outcome.selected().cost, 30.0);
}

/// Exactly one candidate carries is_selected after a successful run.
#[test]
fn exactly_one_candidate_selected() {
    let (engine, cost_model) = make_engine();
    let record = make_record();
    let candidates = [
        delta_costing(1, 45.0),
        delta_costing(2, 30.0),
        delta_costing(3, 38.0),
    ];

    let outcome = engine
        .select(&candidates, &record, &cost_model, &unconstrained())
        .unwrap();

    let selected_count = outcome.candidates.iter().filter(|c| c.is_selected).count();
    assert_eq!(selected_count, 1);
}

/// Cost ties resolve to the first-listed candidate.
#[test]
fn cost_tie_resolves_first_seen() {
    let (engine, cost_model) = make_engine();
    let record = make_record();
    let candidates = [delta_costing(1, 30.0), delta_costing(2, 30.0)];

    let outcome = engine
        .select(&candidates, &record, &cost_model, &unconstrained())
        .unwrap();

    assert_eq!(
        outcome.selected_index, 0,
        "tie at 30.0 must resolve to the first-listed candidate"
    );
}

/// 45/30/30 under a 40.0 budget: the 45 candidate is excluded, the tie at
/// 30.0 resolves to the first of the survivors.
#[test]
fn budget_excludes_then_tie_resolves_first_seen() {
    let (engine, cost_model) = make_engine();
    let record = make_record();
    let candidates = [
        delta_costing(1, 45.0),
        delta_costing(2, 30.0),
        delta_costing(3, 30.0),
    ];

    let outcome = engine
        .select(&candidates, &record, &cost_model, &budget(40.0))
        .unwrap();

    assert!(!outcome.candidates[0].within_budget, "45.0 > budget 40.0");
    assert_eq!(outcome.selected_index, 1, "first 30.0 candidate wins");
}

/// Raising the budget never removes a previously-eligible candidate and
/// never worsens the winner.
#[test]
fn budget_filtering_is_monotonic() {
    let (engine, cost_model) = make_engine();
    let record = make_record();
    let candidates = [
        delta_costing(1, 45.0),
        delta_costing(2, 30.0),
        delta_costing(3, 38.0),
    ];

    let mut last_eligible = 0;
    let mut last_winner_cost = f64::INFINITY;
    for b in [31.0, 40.0, 50.0, 1000.0] {
        let outcome = engine
            .select(&candidates, &record, &cost_model, &budget(b))
            .unwrap();
        let eligible = outcome.candidates.iter().filter(|c| c.within_budget).count();
        assert!(
            eligible >= last_eligible,
            "budget {b} shrank the eligible set"
        );
        assert!(
            outcome.selected().cost <= last_winner_cost,
            "budget {b} produced a worse winner"
        );
        last_eligible = eligible;
        last_winner_cost = outcome.selected().cost;
    }
}

/// All candidates over budget is a hard failure, not a silent fallback.
#[test]
fn all_over_budget_fails_explicitly() {
    let (engine, cost_model) = make_engine();
    let record = make_record();
    let candidates = [delta_costing(1, 45.0), delta_costing(2, 30.0)];

    let result = engine.select(&candidates, &record, &cost_model, &budget(10.0));

    match result {
        Err(EngineError::NoViableCandidate { detail }) => {
            assert!(
                detail.contains("budget"),
                "detail should mention the budget; got '{detail}'"
            );
        }
        other => panic!("expected NoViableCandidate; got {other:?}"),
    }
}

/// An empty candidate set fails immediately.
#[test]
fn empty_candidate_set_fails() {
    let (engine, cost_model) = make_engine();
    let record = make_record();

    let result = engine.select(&[], &record, &cost_model, &unconstrained());

    assert!(matches!(
        result,
        Err(EngineError::NoViableCandidate { .. })
    ));
}

/// Deltas and offers answer different questions; a mixed set is rejected.
#[test]
fn mixed_candidate_set_is_rejected() {
    let (engine, cost_model) = make_engine();
    let record = make_record();
    let candidates = [
        delta_costing(1, 30.0),
        offer("Bonus Data", 50.0, OfferCategory::Data, 0.8),
    ];

    let result = engine.select(&candidates, &record, &cost_model, &unconstrained());

    assert!(matches!(
        result,
        Err(EngineError::NoViableCandidate { .. })
    ));
}

/// Identical inputs produce the identical winner and ordering, every time.
#[test]
fn selection_is_deterministic() {
    let (engine, cost_model) = make_engine();
    let record = make_record();
    let candidates = [
        delta_costing(1, 45.0),
        delta_costing(2, 30.0),
        delta_costing(3, 30.0),
    ];

    let a = engine
        .select(&candidates, &record, &cost_model, &budget(40.0))
        .unwrap();
    let b = engine
        .select(&candidates, &record, &cost_model, &budget(40.0))
        .unwrap();

    assert_eq!(a.selected_index, b.selected_index);
    assert_eq!(a.candidates.len(), b.candidates.len());
    for (x, y) in a.candidates.iter().zip(b.candidates.iter()) {
        assert_eq!(x.cost, y.cost);
        assert_eq!(x.is_selected, y.is_selected);
        assert_eq!(x.within_budget, y.within_budget);
    }
}

/// Over-budget candidates stay in the outcome, marked ineligible, so the
/// explainer can account for them.
#[test]
fn over_budget_candidates_remain_visible() {
    let (engine, cost_model) = make_engine();
    let record = make_record();
    let candidates = [delta_costing(1, 45.0), delta_costing(2, 30.0)];

    let outcome = engine
        .select(&candidates, &record, &cost_model, &budget(40.0))
        .unwrap();

    assert_eq!(outcome.candidates.len(), 2);
    assert!(!outcome.candidates[0].within_budget);
    assert!(!outcome.candidates[0].is_selected);
}
