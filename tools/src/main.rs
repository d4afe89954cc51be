//! retention-runner: headless analysis runner for Retention Desk.
//!
//! Usage:
//!   retention-runner --customers data/customers.csv --catalog data/offers.csv \
//!       --customer-id C-0001 --budget 60
//!   retention-runner --customers data/customers.csv --deltas data/deltas.json \
//!       --customer-id C-0001 --report report.txt

use anyhow::Result;
use retention_core::{
    candidate::Candidate,
    catalog::OfferCatalog,
    config::EngineConfig,
    customers::CustomerTable,
    engine::{AnalysisConstraints, RetentionEngine},
    report::{ReportDocument, ScreenSummary},
    risk::{LogisticArtifact, ModelAssessor, RiskBand},
    selection::Exploration,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let customers_path = str_arg(&args, "--customers").unwrap_or("data/customers.csv");
    let catalog_path = str_arg(&args, "--catalog");
    let deltas_path = str_arg(&args, "--deltas");
    let customer_id = match str_arg(&args, "--customer-id") {
        Some(id) => id,
        None => {
            eprintln!("--customer-id is required");
            std::process::exit(2);
        }
    };
    let data_dir = str_arg(&args, "--data-dir").unwrap_or("./data");
    let assessor_kind = str_arg(&args, "--assessor").unwrap_or("rules");
    let budget = num_arg::<f64>(&args, "--budget");
    let report_path = str_arg(&args, "--report");
    let explore_seed = num_arg::<u64>(&args, "--explore-seed");
    let explore_amplitude = num_arg::<f64>(&args, "--explore-amplitude").unwrap_or(5.0);

    println!("Retention Desk — retention-runner");
    println!("  customers:   {customers_path}");
    println!("  customer_id: {customer_id}");
    println!("  assessor:    {assessor_kind}");
    match budget {
        Some(b) => println!("  budget:      {b:.2}"),
        None => println!("  budget:      (unconstrained)"),
    }
    println!();

    let config = EngineConfig::load(data_dir)?;

    let engine = match assessor_kind {
        "model" => {
            let artifact_path = str_arg(&args, "--artifact")
                .map(str::to_string)
                .unwrap_or_else(|| format!("{data_dir}/churn_weights.json"));
            let artifact = LogisticArtifact::load(&artifact_path)?;
            RetentionEngine::new(config, Box::new(ModelAssessor::new(Box::new(artifact))))
        }
        _ => RetentionEngine::with_rule_assessor(config),
    };

    let table = CustomerTable::load_csv(customers_path)?;
    let record = table
        .get(customer_id)
        .ok_or_else(|| anyhow::anyhow!("Customer '{customer_id}' not found in {customers_path}"))?;

    // Risk first — safe customers need no retention analysis.
    let risk = engine.assess_only(record)?;
    println!("=== CUSTOMER PROFILE ===");
    println!("  churn probability: {:.1}%", risk.score);
    println!("  status:            {}", risk.band.label());
    if let Some(bill) = record.get("MonthlyCharges").and_then(|v| v.as_numeric()) {
        println!("  monthly bill:      ${bill:.2}");
    }
    println!();

    if risk.band == RiskBand::Safe {
        println!("Customer is Safe. No retention analysis needed.");
        return Ok(());
    }

    let candidates: Vec<Candidate> = match (deltas_path, catalog_path) {
        (Some(path), _) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
            serde_json::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?
        }
        (None, Some(path)) => OfferCatalog::load_csv(path)?.candidates(),
        (None, None) => {
            eprintln!("Either --catalog or --deltas is required for a high-risk customer");
            std::process::exit(2);
        }
    };

    let constraints = AnalysisConstraints {
        budget,
        exploration: explore_seed.map(|seed| Exploration {
            seed,
            amplitude: explore_amplitude,
        }),
    };

    let recommendation = match engine.analyze(record, &candidates, &constraints) {
        Ok(rec) => rec,
        Err(e) => {
            eprintln!("Analysis failed: {e}");
            eprintln!("Consider relaxing the budget or supplying more candidates.");
            std::process::exit(1);
        }
    };

    let summary = ScreenSummary::from_recommendation(&recommendation);
    println!("=== RECOMMENDATION ===");
    println!("  selected: {}", summary.selected_label);
    println!("  cost:     {:.2}", summary.selected_cost);
    println!();
    println!("{}", recommendation.explanation.render());

    if let Some(path) = report_path {
        let document = ReportDocument::from_explanation(&recommendation.explanation)
            .with_timestamp(chrono::Utc::now());
        std::fs::write(path, document.to_text())
            .map_err(|e| anyhow::anyhow!("Cannot write {path}: {e}"))?;
        println!("Report written to {path}");
    }

    Ok(())
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn num_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    str_arg(args, flag).and_then(|v| v.parse().ok())
}
