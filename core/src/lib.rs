//! txnreview-core: customer transaction review engine.
//!
//! Ingested transactions are evaluated against a fixed threshold rule set;
//! breaches are reconciled into a per-customer alert table that reviewers
//! work through. Alert reads recompute first, so every view reflects the
//! transaction history at read time.

pub mod engine;
pub mod error;
pub mod ingest;
pub mod reconcile;
pub mod rules;
pub mod store;
pub mod types;
