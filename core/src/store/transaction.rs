//! Transaction table queries.

use super::ReviewStore;
use crate::{error::ReviewResult, ingest::Transaction, types::RecordId};
use rusqlite::params;

const INSERT_SQL: &str = "INSERT INTO transactions \
     (registration_no, customer_name, transaction_type, product, amount) \
     VALUES (?1, ?2, ?3, ?4, ?5)";

impl ReviewStore {
    pub fn insert_transaction(&self, txn: &Transaction) -> ReviewResult<RecordId> {
        self.conn.execute(
            INSERT_SQL,
            params![
                txn.registration_no,
                txn.customer_name,
                txn.transaction_type,
                txn.product,
                txn.amount
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert a whole upload atomically.
    pub fn insert_transactions(&mut self, txns: &[Transaction]) -> ReviewResult<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(INSERT_SQL)?;
            for txn in txns {
                stmt.execute(params![
                    txn.registration_no,
                    txn.customer_name,
                    txn.transaction_type,
                    txn.product,
                    txn.amount
                ])?;
            }
        }
        tx.commit()?;
        Ok(txns.len())
    }

    /// Every transaction on record, oldest first.
    pub fn all_transactions(&self) -> ReviewResult<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, registration_no, customer_name, transaction_type, product, amount
             FROM transactions ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], transaction_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn transactions_for_customer(&self, customer: &str) -> ReviewResult<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, registration_no, customer_name, transaction_type, product, amount
             FROM transactions WHERE customer_name = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![customer], transaction_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn transaction_count(&self) -> ReviewResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))
            .map_err(Into::into)
    }
}

fn transaction_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: Some(row.get(0)?),
        registration_no: row.get(1)?,
        customer_name: row.get(2)?,
        transaction_type: row.get(3)?,
        product: row.get(4)?,
        amount: row.get(5)?,
    })
}
