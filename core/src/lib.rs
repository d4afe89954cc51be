//! retention-core — the recommendation-selection engine for Retention Desk.
//!
//! Given one customer's record, a churn risk source, and a set of candidate
//! interventions (counterfactual feature edits or catalog offers), the engine
//! produces a single cost-justified recommendation plus a structured,
//! renderer-independent justification.
//!
//! RULES:
//!   - One analysis call owns its inputs and outputs; nothing is shared or
//!     cached across calls.
//!   - The only long-lived state is the loaded scoring artifact, the rule
//!     constants, and the offer catalog — all read-only after load.
//!   - Nothing in the engine may call a platform RNG. The opt-in exploration
//!     feature draws from an explicitly seeded stream (see rng.rs).
//!   - Errors abort the analysis cleanly. The engine never guesses a partial
//!     recommendation.

pub mod candidate;
pub mod catalog;
pub mod config;
pub mod cost;
pub mod customers;
pub mod engine;
pub mod error;
pub mod explain;
pub mod record;
pub mod report;
pub mod risk;
pub mod rng;
pub mod selection;
pub mod types;
