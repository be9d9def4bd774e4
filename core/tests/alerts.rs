//! Per-customer alert views and the manual status updater.

use txnreview_core::engine::ReviewEngine;
use txnreview_core::error::ReviewError;
use txnreview_core::ingest::Transaction;
use txnreview_core::reconcile::STATUS_FLAGGED;

fn build() -> ReviewEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    ReviewEngine::in_memory().expect("in-memory engine")
}

fn seed(engine: &ReviewEngine, customer: &str, amounts: &[f64]) {
    for &amount in amounts {
        engine
            .store
            .insert_transaction(&Transaction {
                id: None,
                registration_no: 3003,
                customer_name: customer.to_string(),
                transaction_type: "Transfer".to_string(),
                product: "Current".to_string(),
                amount,
            })
            .expect("insert transaction");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Per-customer view
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn customer_without_any_breach_has_no_alert() {
    let mut engine = build();
    seed(&engine, "Alice", &[1000.0, 1000.0]);

    let err = engine.evaluate_and_reconcile_for("Alice").unwrap_err();
    match err {
        ReviewError::AlertNotFound { customer } => assert_eq!(customer, "Alice"),
        other => panic!("expected AlertNotFound, got {other:?}"),
    }
}

#[test]
fn flagged_customer_alert_is_returned_after_recompute() {
    let mut engine = build();
    seed(&engine, "Binod Joshi", &[56_000.0]);

    // No explicit pass beforehand; the per-customer read runs it.
    let alert = engine.evaluate_and_reconcile_for("Binod Joshi").unwrap();
    assert_eq!(alert.customer_name, "Binod Joshi");
    assert_eq!(alert.status, STATUS_FLAGGED);
    assert_eq!(alert.total_amount, 56_000.0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Status updater
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn status_update_requires_an_existing_alert() {
    let engine = build();
    let err = engine.update_alert_status("Nobody", "Reviewed").unwrap_err();
    assert!(matches!(err, ReviewError::AlertNotFound { .. }));
}

#[test]
fn status_value_is_stored_verbatim() {
    let mut engine = build();
    seed(&engine, "Binod Joshi", &[56_000.0]);
    engine.run_rule_pass().unwrap();

    // No validation of the value: any reviewer-chosen text is kept as-is.
    engine
        .update_alert_status("Binod Joshi", "cleared - false positive")
        .unwrap();

    let alert = engine.store.find_alert("Binod Joshi").unwrap().unwrap();
    assert_eq!(alert.status, "cleared - false positive");
}

#[test]
fn status_update_is_independent_of_recomputation() {
    let mut engine = build();
    seed(&engine, "Binod Joshi", &[56_000.0]);
    engine.run_rule_pass().unwrap();

    engine.update_alert_status("Binod Joshi", "Escalated").unwrap();
    engine.update_alert_status("Binod Joshi", "Reviewed").unwrap();

    // The last write sticks without any rule pass in between.
    let alert = engine.store.find_alert("Binod Joshi").unwrap().unwrap();
    assert_eq!(alert.status, "Reviewed");
}
