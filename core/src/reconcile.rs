//! Alert reconciliation: folds a fresh rule pass into the persisted alerts.
//!
//! RULES:
//!   - New breach       → insert, status "Flagged".
//!   - Changed breach   → overwrite amount and rules, status back to
//!     "Flagged", even over a reviewer's manual status.
//!   - Unchanged breach → no write; a manual status survives.
//!   - Cleared breach   → left alone. Alerts are never auto-removed;
//!     reviewers close them out by setting a status.

use crate::{
    error::ReviewResult,
    rules::{RuleBreakdown, RuleId},
    store::UnitOfWork,
    types::{CustomerName, RecordId},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Status stamped on every alert the reconciler writes.
pub const STATUS_FLAGGED: &str = "Flagged";

/// Per-customer review summary. At most one row per customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Option<RecordId>,
    pub customer_name: CustomerName,
    pub total_amount: f64,
    pub rule_broken: BTreeSet<RuleId>,
    pub status: String,
}

/// What one reconciliation pass did to the alert table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl ReconcileOutcome {
    /// Rows actually written this pass.
    pub fn writes(&self) -> usize {
        self.inserted + self.updated
    }
}

/// Merge one rule pass into the alert table inside the caller's unit of
/// work. Nothing is visible to readers until the caller commits.
pub fn reconcile(
    uow: &UnitOfWork<'_>,
    breakdowns: &BTreeMap<CustomerName, RuleBreakdown>,
) -> ReviewResult<ReconcileOutcome> {
    let mut outcome = ReconcileOutcome::default();

    for (customer, breakdown) in breakdowns {
        match uow.find_alert(customer)? {
            None => {
                uow.upsert_alert(&Alert {
                    id: None,
                    customer_name: customer.clone(),
                    total_amount: breakdown.total_amount,
                    rule_broken: breakdown.rules.clone(),
                    status: STATUS_FLAGGED.to_string(),
                })?;
                outcome.inserted += 1;
            }
            Some(existing) => {
                // Exact float compare: an unchanged history re-sums to the
                // same bits, so only a real content change trips this.
                let changed = existing.rule_broken != breakdown.rules
                    || existing.total_amount != breakdown.total_amount;
                if changed {
                    uow.upsert_alert(&Alert {
                        id: existing.id,
                        customer_name: customer.clone(),
                        total_amount: breakdown.total_amount,
                        rule_broken: breakdown.rules.clone(),
                        status: STATUS_FLAGGED.to_string(),
                    })?;
                    outcome.updated += 1;
                } else {
                    outcome.unchanged += 1;
                }
            }
        }
    }

    Ok(outcome)
}
