//! Threshold rules over the full transaction history.
//!
//! RULES:
//!   - Every rule sees the entire history on record, never the latest
//!     upload batch alone.
//!   - Evaluation order is fixed: frequency, then total spend, then
//!     single large transaction. A later rule may record an amount, but
//!     rule 2's sum always outranks rule 3's single amount.
//!   - `rule_broken` only ever grows within a pass; the set is
//!     deduplicated by construction.

use crate::{ingest::Transaction, types::CustomerName};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A customer is flagged once they have this many transactions on record.
pub const FREQUENT_TXN_COUNT: usize = 3;

/// Threshold shared by the two amount rules. The summed history must be
/// strictly above it; a single amount qualifies at or above it.
pub const LARGE_AMOUNT_THRESHOLD: f64 = 55_000.0;

/// The fixed rule set, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleId {
    FrequentTransactions,
    HighTotalSpend,
    SingleLargeTransaction,
}

impl RuleId {
    pub const ALL: [RuleId; 3] = [
        RuleId::FrequentTransactions,
        RuleId::HighTotalSpend,
        RuleId::SingleLargeTransaction,
    ];

    /// The reviewer-facing tag persisted with each alert.
    pub fn tag(self) -> &'static str {
        match self {
            RuleId::FrequentTransactions => "Frequent Transactions (≥3 times)",
            RuleId::HighTotalSpend => "Total Amount > 55000",
            RuleId::SingleLargeTransaction => "Single Transaction ≥ 55000",
        }
    }

    pub fn from_tag(tag: &str) -> Option<RuleId> {
        RuleId::ALL.iter().copied().find(|rule| rule.tag() == tag)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// Stored alerts carry the tag strings, so RuleId serializes as its tag.
impl Serialize for RuleId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for RuleId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        RuleId::from_tag(&tag).ok_or_else(|| de::Error::custom(format!("unknown rule tag '{tag}'")))
    }
}

/// Per-customer result of one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleBreakdown {
    pub rules: BTreeSet<RuleId>,
    pub total_amount: f64,
}

/// Evaluate every rule against the full transaction set.
///
/// Returns exactly the customers in breach of at least one rule; customers
/// matching none are absent, never present with an empty rule set.
pub fn evaluate(txns: &[Transaction]) -> BTreeMap<CustomerName, RuleBreakdown> {
    let mut txn_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for txn in txns {
        *txn_counts.entry(txn.customer_name.as_str()).or_insert(0) += 1;
        *totals.entry(txn.customer_name.as_str()).or_insert(0.0) += txn.amount;
    }

    let mut breakdowns: BTreeMap<CustomerName, RuleBreakdown> = BTreeMap::new();

    // Rule 1: transaction count. Supplies no amount of its own; a customer
    // flagged by this rule alone keeps total_amount at 0.
    for (&name, &count) in &txn_counts {
        if count >= FREQUENT_TXN_COUNT {
            breakdowns
                .entry(name.to_string())
                .or_default()
                .rules
                .insert(RuleId::FrequentTransactions);
        }
    }

    // Rule 2: summed history strictly above the threshold. The sum becomes
    // the alert amount and outranks anything rule 3 records.
    let mut summed: BTreeSet<&str> = BTreeSet::new();
    for (&name, &total) in &totals {
        if total > LARGE_AMOUNT_THRESHOLD {
            let breakdown = breakdowns.entry(name.to_string()).or_default();
            breakdown.rules.insert(RuleId::HighTotalSpend);
            breakdown.total_amount = total;
            summed.insert(name);
        }
    }

    // Rule 3: any single amount at or above the threshold. Walks the set
    // in store order, so with several qualifying transactions the last one
    // wins. Never displaces a sum recorded by rule 2.
    for txn in txns {
        if txn.amount >= LARGE_AMOUNT_THRESHOLD {
            let breakdown = breakdowns.entry(txn.customer_name.clone()).or_default();
            breakdown.rules.insert(RuleId::SingleLargeTransaction);
            if !summed.contains(txn.customer_name.as_str()) {
                breakdown.total_amount = txn.amount;
            }
        }
    }

    breakdowns
}
