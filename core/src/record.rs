//! Customer records — the immutable per-customer feature map.
//!
//! A record is built once (from the customer table or by hand in tests) and
//! never mutated afterwards. Feature access is explicit: a required field
//! that is absent, or that cannot be read as a number where a number is
//! needed, fails with `MissingFeature` naming the field. Silent defaults
//! would break the rule-based score clamp invariant.

use crate::{
    error::{EngineError, EngineResult},
    types::{CustomerId, FeatureName},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One cell of the customer table. Numeric cells are parsed eagerly at
/// ingestion; everything else stays verbatim text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Numeric(f64),
    Text(String),
}

impl FeatureValue {
    /// Parse a raw table cell. "42.5" becomes Numeric, "Month-to-month"
    /// stays Text.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(n) => FeatureValue::Numeric(n),
            Err(_) => FeatureValue::Text(raw.trim().to_string()),
        }
    }

    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            FeatureValue::Numeric(n) => Some(*n),
            FeatureValue::Text(t) => t.trim().parse::<f64>().ok(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(t) => Some(t.as_str()),
            FeatureValue::Numeric(_) => None,
        }
    }
}

/// One customer's full feature vector. BTreeMap keeps feature iteration
/// order stable across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: CustomerId,
    features:        BTreeMap<FeatureName, FeatureValue>,
}

impl CustomerRecord {
    pub fn new(customer_id: impl Into<CustomerId>) -> Self {
        Self {
            customer_id: customer_id.into(),
            features:    BTreeMap::new(),
        }
    }

    /// Builder-style insertion, used by loaders and tests.
    pub fn with_feature(mut self, name: impl Into<FeatureName>, value: FeatureValue) -> Self {
        self.features.insert(name.into(), value);
        self
    }

    pub fn with_numeric(self, name: impl Into<FeatureName>, value: f64) -> Self {
        self.with_feature(name, FeatureValue::Numeric(value))
    }

    pub fn with_text(self, name: impl Into<FeatureName>, value: impl Into<String>) -> Self {
        self.with_feature(name, FeatureValue::Text(value.into()))
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.features.get(name)
    }

    /// Required numeric field. Absent or unparseable → MissingFeature.
    pub fn numeric(&self, name: &str) -> EngineResult<f64> {
        self.features
            .get(name)
            .and_then(FeatureValue::as_numeric)
            .ok_or_else(|| EngineError::MissingFeature {
                feature: name.to_string(),
            })
    }

    /// Numeric field with fill-zero semantics for absent features.
    /// Matches the training pipeline's NA handling; used only by the
    /// model-backed path, never by the rule-based assessor.
    pub fn numeric_or_zero(&self, name: &str) -> f64 {
        self.features
            .get(name)
            .and_then(FeatureValue::as_numeric)
            .unwrap_or(0.0)
    }

    /// Required text field. Absent → MissingFeature.
    pub fn text(&self, name: &str) -> EngineResult<&str> {
        self.features
            .get(name)
            .and_then(FeatureValue::as_text)
            .ok_or_else(|| EngineError::MissingFeature {
                feature: name.to_string(),
            })
    }

    pub fn feature_names(&self) -> impl Iterator<Item = &FeatureName> {
        self.features.keys()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
