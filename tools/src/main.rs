//! review-runner: headless CLI for the transaction review engine.
//!
//! Usage:
//!   review-runner --db review.db ingest transactions.csv
//!   review-runner --db review.db pass
//!   review-runner --db review.db alerts
//!   review-runner --db review.db alert "Ramesh Karki"
//!   review-runner --db review.db status "Ramesh Karki" Reviewed
//!   review-runner --db review.db transactions ["Ramesh Karki"]

use anyhow::{bail, Context, Result};
use std::env;
use std::fs::File;
use std::io::BufReader;
use txnreview_core::engine::ReviewEngine;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = parse_flag(&args, "--db").unwrap_or_else(|| "review.db".to_string());
    let positionals = positional_args(&args);

    let mut engine = ReviewEngine::open(&db)?;

    match positionals.first().map(String::as_str) {
        Some("ingest") => {
            let path = positionals.get(1).context("usage: ingest <file.csv>")?;
            let file = File::open(path).with_context(|| format!("cannot open {path}"))?;
            let count = engine.ingest_csv(BufReader::new(file))?;
            println!("ingested {count} transactions from {path}");
        }
        Some("pass") => {
            let outcome = engine.run_rule_pass()?;
            println!(
                "{} inserted, {} updated, {} unchanged",
                outcome.inserted, outcome.updated, outcome.unchanged
            );
        }
        Some("alerts") => {
            let alerts = engine.evaluate_and_reconcile()?;
            println!("{}", serde_json::to_string_pretty(&alerts)?);
        }
        Some("alert") => {
            let customer = positionals.get(1).context("usage: alert <customer>")?;
            let alert = engine.evaluate_and_reconcile_for(customer)?;
            println!("{}", serde_json::to_string_pretty(&alert)?);
        }
        Some("status") => {
            let customer = positionals
                .get(1)
                .context("usage: status <customer> <status>")?;
            let status = positionals
                .get(2)
                .context("usage: status <customer> <status>")?;
            engine.update_alert_status(customer, status)?;
            println!("status for '{customer}' set to '{status}'");
        }
        Some("transactions") => {
            let transactions = match positionals.get(1) {
                Some(customer) => engine.store.transactions_for_customer(customer)?,
                None => engine.store.all_transactions()?,
            };
            println!("{}", serde_json::to_string_pretty(&transactions)?);
        }
        _ => bail!(
            "usage: review-runner [--db <path>] <ingest|pass|alerts|alert|status|transactions> ..."
        ),
    }

    Ok(())
}

fn parse_flag(args: &[String], name: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == name)
        .and_then(|i| args.get(i + 1).cloned())
}

fn positional_args(args: &[String]) -> Vec<String> {
    let mut positionals = Vec::new();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--db" {
            i += 2;
            continue;
        }
        positionals.push(args[i].clone());
        i += 1;
    }
    positionals
}
