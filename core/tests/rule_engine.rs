//! Rule engine behaviour over full transaction histories.
//!
//! Covers the threshold edges (count >= 3, sum strictly above 55000, a
//! single amount at or above 55000) and the amount precedence between the
//! two amount rules.

use std::collections::BTreeSet;
use txnreview_core::ingest::Transaction;
use txnreview_core::rules::{self, RuleId};

fn txn(customer: &str, amount: f64) -> Transaction {
    Transaction {
        id: None,
        registration_no: 1001,
        customer_name: customer.to_string(),
        transaction_type: "Deposit".to_string(),
        product: "Savings".to_string(),
        amount,
    }
}

fn rule_set(rules: &[RuleId]) -> BTreeSet<RuleId> {
    rules.iter().copied().collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Rule 1: frequency
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn three_transactions_trigger_the_frequency_rule() {
    let txns = vec![
        txn("Ramesh Karki", 1000.0),
        txn("Ramesh Karki", 1000.0),
        txn("Ramesh Karki", 1000.0),
    ];
    let breakdowns = rules::evaluate(&txns);

    let breakdown = breakdowns
        .get("Ramesh Karki")
        .expect("customer should be flagged");
    assert_eq!(breakdown.rules, rule_set(&[RuleId::FrequentTransactions]));
    assert_eq!(
        breakdown.total_amount, 0.0,
        "frequency alone carries no amount"
    );
}

#[test]
fn two_transactions_do_not_trigger_the_frequency_rule() {
    let txns = vec![txn("Ramesh Karki", 1000.0), txn("Ramesh Karki", 1000.0)];
    assert!(rules::evaluate(&txns).is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Rule 2: total spend, strictly greater than the threshold
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn summed_spend_exactly_at_threshold_is_not_flagged() {
    let txns = vec![txn("Sita Sharma", 30_000.0), txn("Sita Sharma", 25_000.0)];
    assert!(
        rules::evaluate(&txns).is_empty(),
        "a sum of exactly 55000 must stay below the strict threshold"
    );
}

#[test]
fn summed_spend_above_threshold_is_flagged_with_the_sum() {
    let txns = vec![txn("Sita Sharma", 30_000.0), txn("Sita Sharma", 26_000.0)];
    let breakdowns = rules::evaluate(&txns);

    let breakdown = &breakdowns["Sita Sharma"];
    assert_eq!(breakdown.rules, rule_set(&[RuleId::HighTotalSpend]));
    assert_eq!(breakdown.total_amount, 56_000.0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Rule 3: single large transaction, at or above the threshold
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn single_transaction_at_threshold_is_flagged() {
    let txns = vec![txn("Hari Thapa", 55_000.0)];
    let breakdowns = rules::evaluate(&txns);

    let breakdown = &breakdowns["Hari Thapa"];
    assert_eq!(
        breakdown.rules,
        rule_set(&[RuleId::SingleLargeTransaction]),
        "sum equals the threshold, so the strictly-greater sum rule must stay silent"
    );
    assert_eq!(breakdown.total_amount, 55_000.0);
}

#[test]
fn rule_two_sum_wins_over_the_single_transaction_amount() {
    let txns = vec![txn("Gita Rai", 56_000.0), txn("Gita Rai", 10_000.0)];
    let breakdowns = rules::evaluate(&txns);

    let breakdown = &breakdowns["Gita Rai"];
    assert_eq!(
        breakdown.rules,
        rule_set(&[RuleId::HighTotalSpend, RuleId::SingleLargeTransaction])
    );
    assert_eq!(
        breakdown.total_amount, 66_000.0,
        "the summed history outranks the single amount"
    );
}

#[test]
fn single_large_amount_fills_in_when_the_sum_rule_is_silent() {
    // Three transactions summing to exactly 55000: frequency fires, the
    // strict sum rule does not, and the single 55000 supplies the amount.
    let txns = vec![
        txn("Hari Thapa", 55_000.0),
        txn("Hari Thapa", 0.0),
        txn("Hari Thapa", 0.0),
    ];
    let breakdowns = rules::evaluate(&txns);

    let breakdown = &breakdowns["Hari Thapa"];
    assert_eq!(
        breakdown.rules,
        rule_set(&[RuleId::FrequentTransactions, RuleId::SingleLargeTransaction])
    );
    assert_eq!(breakdown.total_amount, 55_000.0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Combined histories
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn growing_history_escalates_a_frequency_only_customer() {
    let mut txns = vec![
        txn("Alice", 1000.0),
        txn("Alice", 1000.0),
        txn("Alice", 1000.0),
    ];
    let breakdowns = rules::evaluate(&txns);
    assert_eq!(
        breakdowns["Alice"].rules,
        rule_set(&[RuleId::FrequentTransactions])
    );
    assert_eq!(breakdowns["Alice"].total_amount, 0.0);

    txns.push(txn("Alice", 56_000.0));
    let breakdowns = rules::evaluate(&txns);

    let breakdown = &breakdowns["Alice"];
    assert_eq!(breakdown.rules, rule_set(&RuleId::ALL));
    assert_eq!(
        breakdown.total_amount, 59_000.0,
        "the full-history sum supplies the amount once it clears the threshold"
    );
}

#[test]
fn customers_are_evaluated_independently() {
    let txns = vec![
        txn("Ramesh Karki", 60_000.0),
        txn("Sita Sharma", 10.0),
        txn("Sita Sharma", 10.0),
        txn("Sita Sharma", 10.0),
        txn("Quiet Customer", 20.0),
    ];
    let breakdowns = rules::evaluate(&txns);

    assert_eq!(breakdowns.len(), 2);
    assert_eq!(
        breakdowns["Ramesh Karki"].rules,
        rule_set(&[RuleId::HighTotalSpend, RuleId::SingleLargeTransaction])
    );
    assert_eq!(
        breakdowns["Sita Sharma"].rules,
        rule_set(&[RuleId::FrequentTransactions])
    );
    assert!(!breakdowns.contains_key("Quiet Customer"));
}

#[test]
fn unflagged_customers_are_absent_from_the_result() {
    let txns = vec![txn("Ramesh Karki", 1000.0), txn("Quiet Customer", 20.0)];
    assert!(rules::evaluate(&txns).is_empty());
}
