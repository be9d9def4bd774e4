//! The review engine — wires ingest, rule evaluation, and reconciliation
//! over one store.
//!
//! RULES:
//!   - Every alert read recomputes first, so callers always see alerts
//!     consistent with the transaction history at read time.
//!   - A pass is one unit of work: evaluate over a full snapshot, diff
//!     against the stored alerts, commit the mutations together.
//!   - Two concurrent passes race benignly: both compute from the full
//!     history, so the last writer lands the same content.

use crate::{
    error::{ReviewError, ReviewResult},
    ingest,
    reconcile::{self, Alert, ReconcileOutcome},
    rules,
    store::ReviewStore,
};
use std::io::Read;

pub struct ReviewEngine {
    pub store: ReviewStore,
}

impl ReviewEngine {
    pub fn new(store: ReviewStore) -> Self {
        Self { store }
    }

    /// Open (and migrate) a file-backed engine.
    pub fn open(path: &str) -> ReviewResult<Self> {
        let store = ReviewStore::open(path)?;
        store.migrate()?;
        Ok(Self::new(store))
    }

    /// In-memory engine for tests and scratch runs.
    pub fn in_memory() -> ReviewResult<Self> {
        let store = ReviewStore::in_memory()?;
        store.migrate()?;
        Ok(Self::new(store))
    }

    /// Parse a CSV upload and persist its rows. Returns how many landed.
    pub fn ingest_csv<R: Read>(&mut self, reader: R) -> ReviewResult<usize> {
        let transactions = ingest::read_transactions(reader)?;
        let count = self.store.insert_transactions(&transactions)?;
        log::info!("ingested {count} transactions");
        Ok(count)
    }

    /// Run one evaluate-and-reconcile pass and commit it.
    pub fn run_rule_pass(&mut self) -> ReviewResult<ReconcileOutcome> {
        let transactions = self.store.all_transactions()?;
        let breakdowns = rules::evaluate(&transactions);
        let uow = self.store.unit_of_work()?;
        let outcome = reconcile::reconcile(&uow, &breakdowns)?;
        uow.commit()?;
        log::info!(
            "rule pass over {} transactions: {} customers in breach ({} inserted, {} updated, {} unchanged)",
            transactions.len(),
            breakdowns.len(),
            outcome.inserted,
            outcome.updated,
            outcome.unchanged
        );
        Ok(outcome)
    }

    /// Recompute, persist, and return the full alert list.
    pub fn evaluate_and_reconcile(&mut self) -> ReviewResult<Vec<Alert>> {
        self.run_rule_pass()?;
        self.store.all_alerts()
    }

    /// Recompute, persist, and return one customer's alert.
    pub fn evaluate_and_reconcile_for(&mut self, customer: &str) -> ReviewResult<Alert> {
        self.run_rule_pass()?;
        self.store
            .find_alert(customer)?
            .ok_or_else(|| ReviewError::AlertNotFound {
                customer: customer.to_string(),
            })
    }

    /// Manual status override from a reviewer. The value is stored
    /// verbatim; the next content change flips it back to "Flagged".
    pub fn update_alert_status(&self, customer: &str, status: &str) -> ReviewResult<()> {
        self.store.set_alert_status(customer, status)?;
        log::info!("alert status for '{customer}' set to '{status}'");
        Ok(())
    }
}
