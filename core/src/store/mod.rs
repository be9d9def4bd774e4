//! SQLite persistence layer.
//!
//! RULE: Only the store modules talk to the database. The rule engine and
//! reconciler never execute SQL directly; the reconciler works through a
//! UnitOfWork scoped and committed by its caller.

use crate::error::ReviewResult;
use rusqlite::Connection;

mod alert;
mod transaction;

pub struct ReviewStore {
    conn: Connection,
}

impl ReviewStore {
    pub fn open(path: &str) -> ReviewResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ReviewResult<Self> {
        let conn = Connection::open(":memory:")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> ReviewResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    /// Start a unit of work covering one reconciliation pass. All alert
    /// writes go through it and land atomically on commit.
    pub fn unit_of_work(&mut self) -> ReviewResult<UnitOfWork<'_>> {
        Ok(UnitOfWork {
            tx: self.conn.transaction()?,
        })
    }
}

/// One transaction against the alert table. Dropped without commit, it
/// rolls back.
pub struct UnitOfWork<'conn> {
    tx: rusqlite::Transaction<'conn>,
}

impl UnitOfWork<'_> {
    pub fn commit(self) -> ReviewResult<()> {
        self.tx.commit()?;
        Ok(())
    }
}
