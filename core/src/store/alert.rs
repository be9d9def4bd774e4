//! Alert table queries, shared by the store and the reconciler's unit of
//! work.
//!
//! rule_broken is persisted as a JSON array of rule tags; the encoding is
//! read and written here and nowhere else.

use super::{ReviewStore, UnitOfWork};
use crate::{
    error::{ReviewError, ReviewResult},
    reconcile::Alert,
    types::RecordId,
};
use rusqlite::{params, Connection, OptionalExtension};

impl ReviewStore {
    /// Every alert on record, oldest first.
    pub fn all_alerts(&self) -> ReviewResult<Vec<Alert>> {
        all_alerts(&self.conn)
    }

    pub fn find_alert(&self, customer: &str) -> ReviewResult<Option<Alert>> {
        find_alert(&self.conn, customer)
    }

    /// Insert if absent, else update in place by customer name.
    pub fn upsert_alert(&self, alert: &Alert) -> ReviewResult<()> {
        upsert_alert(&self.conn, alert)
    }

    /// Set the review status on one customer's alert, unconditionally.
    pub fn set_alert_status(&self, customer: &str, status: &str) -> ReviewResult<()> {
        let changed = self.conn.execute(
            "UPDATE alerts SET status = ?1 WHERE customer_name = ?2",
            params![status, customer],
        )?;
        if changed == 0 {
            return Err(ReviewError::AlertNotFound {
                customer: customer.to_string(),
            });
        }
        Ok(())
    }

    pub fn alert_count(&self) -> ReviewResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM alerts", [], |row| row.get(0))
            .map_err(Into::into)
    }
}

impl UnitOfWork<'_> {
    pub fn find_alert(&self, customer: &str) -> ReviewResult<Option<Alert>> {
        find_alert(&self.tx, customer)
    }

    pub fn upsert_alert(&self, alert: &Alert) -> ReviewResult<()> {
        upsert_alert(&self.tx, alert)
    }
}

const SELECT_COLUMNS: &str = "SELECT id, customer_name, total_amount, rule_broken, status FROM alerts";

fn all_alerts(conn: &Connection) -> ReviewResult<Vec<Alert>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id ASC"))?;
    let rows = stmt
        .query_map([], alert_row_mapper)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(alert_from_row).collect()
}

fn find_alert(conn: &Connection, customer: &str) -> ReviewResult<Option<Alert>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE customer_name = ?1"))?;
    let row = stmt
        .query_row(params![customer], alert_row_mapper)
        .optional()?;
    row.map(alert_from_row).transpose()
}

fn upsert_alert(conn: &Connection, alert: &Alert) -> ReviewResult<()> {
    let rule_broken = serde_json::to_string(&alert.rule_broken)?;
    conn.execute(
        "INSERT INTO alerts (customer_name, total_amount, rule_broken, status)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(customer_name) DO UPDATE SET
             total_amount = excluded.total_amount,
             rule_broken  = excluded.rule_broken,
             status       = excluded.status",
        params![alert.customer_name, alert.total_amount, rule_broken, alert.status],
    )?;
    Ok(())
}

/// Raw row shape before the rule tag list is decoded.
type AlertRow = (RecordId, String, f64, String, String);

fn alert_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<AlertRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn alert_from_row(row: AlertRow) -> ReviewResult<Alert> {
    let (id, customer_name, total_amount, rule_broken, status) = row;
    Ok(Alert {
        id: Some(id),
        customer_name,
        total_amount,
        rule_broken: serde_json::from_str(&rule_broken)?,
        status,
    })
}
