//! Customer table — the delimited-text list the runner picks customers from.
//!
//! The first column is the customer identifier; every other column is a
//! feature. Numeric cells are parsed eagerly so downstream code never
//! re-parses strings.

use crate::{
    error::{EngineError, EngineResult},
    record::{CustomerRecord, FeatureValue},
    types::CustomerId,
};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct CustomerTable {
    records: Vec<CustomerRecord>,
}

impl CustomerTable {
    pub fn load_csv(path: impl AsRef<Path>) -> EngineResult<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let table = Self::from_reader(file)?;
        log::info!(
            "customers: loaded {} records from {}",
            table.records.len(),
            path.as_ref().display(),
        );
        Ok(table)
    }

    pub fn from_reader(reader: impl Read) -> EngineResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        if headers.is_empty() {
            return Err(EngineError::MalformedCatalog {
                column: "<id>".into(),
                detail: "customer table has no columns".into(),
            });
        }

        let mut records = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let id = record.get(0).unwrap_or("").to_string();
            if id.is_empty() {
                continue; // blank trailing rows
            }

            let mut customer = CustomerRecord::new(id);
            for (idx, header) in headers.iter().enumerate().skip(1) {
                let raw = record.get(idx).unwrap_or("");
                customer = customer.with_feature(header, FeatureValue::parse(raw));
            }
            records.push(customer);
        }

        Ok(Self { records })
    }

    pub fn get(&self, id: &str) -> Option<&CustomerRecord> {
        self.records.iter().find(|r| r.customer_id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &CustomerId> {
        self.records.iter().map(|r| &r.customer_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
