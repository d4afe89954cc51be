//! Offer catalog — the finite set of named retention offers.
//!
//! Loaded once from delimited text at startup and read-only afterwards.
//! Required columns: Offer_Name, Cost_BDT, Type, Efficiency_Score.
//! Structural problems are fatal at load time and name the offending
//! column — a half-loaded catalog is never handed to the engine.

use crate::{
    candidate::{Candidate, OfferCategory, RetentionOffer},
    error::{EngineError, EngineResult},
};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

pub const COL_OFFER_NAME: &str = "Offer_Name";
pub const COL_COST: &str = "Cost_BDT";
pub const COL_TYPE: &str = "Type";
pub const COL_EFFICIENCY: &str = "Efficiency_Score";

#[derive(Debug, Clone)]
pub struct OfferCatalog {
    offers: Vec<RetentionOffer>,
}

impl OfferCatalog {
    pub fn load_csv(path: impl AsRef<Path>) -> EngineResult<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let catalog = Self::from_reader(file)?;
        log::info!(
            "catalog: loaded {} offers from {}",
            catalog.offers.len(),
            path.as_ref().display(),
        );
        Ok(catalog)
    }

    pub fn from_reader(reader: impl Read) -> EngineResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let name_idx = column_index(&headers, COL_OFFER_NAME)?;
        let cost_idx = column_index(&headers, COL_COST)?;
        let type_idx = column_index(&headers, COL_TYPE)?;
        let eff_idx = column_index(&headers, COL_EFFICIENCY)?;

        let mut offers = Vec::new();
        let mut seen_names = BTreeSet::new();

        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            let line = row + 2; // 1-based, after the header row

            let name = record.get(name_idx).unwrap_or("").to_string();
            if name.is_empty() {
                return Err(EngineError::MalformedCatalog {
                    column: COL_OFFER_NAME.into(),
                    detail: format!("empty offer name at line {line}"),
                });
            }
            if !seen_names.insert(name.clone()) {
                return Err(EngineError::MalformedCatalog {
                    column: COL_OFFER_NAME.into(),
                    detail: format!("duplicate offer name '{name}' at line {line}"),
                });
            }

            let cost = numeric_cell(&record, cost_idx, COL_COST, line)?;
            if cost < 0.0 {
                return Err(EngineError::MalformedCatalog {
                    column: COL_COST.into(),
                    detail: format!("negative cost {cost} for '{name}' at line {line}"),
                });
            }

            let efficiency = numeric_cell(&record, eff_idx, COL_EFFICIENCY, line)?;
            let category = OfferCategory::parse(record.get(type_idx).unwrap_or(""));

            offers.push(RetentionOffer {
                name,
                cost,
                category,
                efficiency,
            });
        }

        Ok(Self { offers })
    }

    pub fn offers(&self) -> &[RetentionOffer] {
        &self.offers
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    /// The catalog as a candidate set, in catalog order.
    pub fn candidates(&self) -> Vec<Candidate> {
        self.offers.iter().cloned().map(Candidate::Offer).collect()
    }
}

fn column_index(headers: &csv::StringRecord, column: &str) -> EngineResult<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| EngineError::MalformedCatalog {
            column: column.into(),
            detail: "required column is missing".into(),
        })
}

fn numeric_cell(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
    line: usize,
) -> EngineResult<f64> {
    let raw = record.get(idx).unwrap_or("");
    raw.parse::<f64>()
        .map_err(|_| EngineError::MalformedCatalog {
            column: column.into(),
            detail: format!("non-numeric value '{raw}' at line {line}"),
        })
}
