//! CSV ingest for transaction uploads.
//!
//! Uploads come from spreadsheet exports, so headers arrive in display
//! form ("Registration No", "Customer name", "Type"). Headers are
//! normalized before parsing and the serial "S.N" column is dropped.
//! Validation lives here: the rule engine only ever sees well-formed rows.

use crate::{
    error::{ReviewError, ReviewResult},
    types::{CustomerName, RecordId},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;

/// An ingested transaction. Immutable once stored; recomputation reads,
/// never rewrites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Option<RecordId>,
    pub registration_no: i64,
    pub customer_name: CustomerName,
    pub transaction_type: String,
    pub product: String,
    pub amount: f64,
}

/// Columns a valid upload must carry, post-normalization.
const REQUIRED_COLUMNS: [&str; 5] = [
    "registration_no",
    "customer_name",
    "transaction_type",
    "product",
    "amount",
];

/// Map a raw header to its canonical column name. `None` drops the column
/// (covers "S.N" and anything else a spreadsheet smuggles in).
fn canonical_column(raw: &str) -> Option<&'static str> {
    match raw {
        "Registration No" | "registration_no" => Some("registration_no"),
        "Customer name" | "customer_name" => Some("customer_name"),
        "Type" | "transaction_type" => Some("transaction_type"),
        "product" => Some("product"),
        "amount" => Some("amount"),
        _ => None,
    }
}

/// Parse a CSV upload into transactions, validating shape and field types.
pub fn read_transactions<R: Read>(reader: R) -> ReviewResult<Vec<Transaction>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(ReviewError::Validation {
            reason: "the file is empty".to_string(),
        });
    }

    let mut columns: HashMap<&'static str, usize> = HashMap::new();
    for (idx, raw) in headers.iter().enumerate() {
        if let Some(name) = canonical_column(raw) {
            columns.insert(name, idx);
        }
    }

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !columns.contains_key(column))
        .collect();
    if !missing.is_empty() {
        return Err(ReviewError::Validation {
            reason: format!("missing required columns: {}", missing.join(", ")),
        });
    }

    let mut transactions = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = idx + 2; // 1-based, counting the header row
        transactions.push(parse_record(&record, &columns, row)?);
    }

    Ok(transactions)
}

fn parse_record(
    record: &csv::StringRecord,
    columns: &HashMap<&'static str, usize>,
    row: usize,
) -> ReviewResult<Transaction> {
    let registration_raw = field_value(record, columns, "registration_no", row)?;
    let registration_no = registration_raw.parse::<i64>().map_err(|_| {
        invalid(
            row,
            format!("'registration_no' must be an integer (got '{registration_raw}')"),
        )
    })?;

    let customer_name = field_value(record, columns, "customer_name", row)?.to_string();
    if customer_name.is_empty() {
        return Err(invalid(row, "'customer_name' must not be empty".to_string()));
    }

    let transaction_type = field_value(record, columns, "transaction_type", row)?.to_string();
    let product = field_value(record, columns, "product", row)?.to_string();

    let amount_raw = field_value(record, columns, "amount", row)?;
    let amount = amount_raw
        .parse::<f64>()
        .map_err(|_| invalid(row, format!("'amount' must be numeric (got '{amount_raw}')")))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(invalid(
            row,
            format!("'amount' must be a non-negative number (got {amount_raw})"),
        ));
    }

    Ok(Transaction {
        id: None,
        registration_no,
        customer_name,
        transaction_type,
        product,
        amount,
    })
}

fn field_value<'r>(
    record: &'r csv::StringRecord,
    columns: &HashMap<&'static str, usize>,
    name: &'static str,
    row: usize,
) -> ReviewResult<&'r str> {
    record
        .get(columns[name])
        .ok_or_else(|| invalid(row, format!("missing value for '{name}'")))
}

fn invalid(row: usize, message: String) -> ReviewError {
    ReviewError::InvalidRecord { row, message }
}
