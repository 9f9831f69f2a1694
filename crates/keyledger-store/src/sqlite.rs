//! SQLite implementation of the WorldState port.
//!
//! The persistent reference host. World state lives in one table; each
//! [`SqliteTxn`] is a real SQLite transaction (`BEGIN IMMEDIATE`), so reads
//! observe the transaction's own writes and an uncommitted transaction is
//! rolled back when dropped.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StoreError};
use crate::ids::TxIdGenerator;
use crate::migration;
use crate::scan::SnapshotScan;
use crate::traits::{RangeScan, ScanEntry, WorldState};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. A transaction holds the connection for its
/// whole lifetime, so transactions against one store run one at a time.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    ids: TxIdGenerator,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            ids: TxIdGenerator::new(),
        })
    }

    /// Replace the transaction id source.
    pub fn with_tx_ids(mut self, ids: TxIdGenerator) -> Self {
        self.ids = ids;
        self
    }

    /// Start a transaction with a freshly generated id.
    pub fn begin(&self) -> Result<SqliteTxn<'_>> {
        self.begin_with_tx_id(self.ids.next_id())
    }

    /// Start a transaction with a caller-supplied id.
    ///
    /// Committed ids are recorded in `tx_log`, keyed by id, so committing a
    /// second transaction under an id that was already committed fails with
    /// a UNIQUE constraint error and that transaction is rolled back.
    pub fn begin_with_tx_id(&self, tx_id: impl Into<String>) -> Result<SqliteTxn<'_>> {
        let conn = self.lock()?;
        conn.execute_batch("BEGIN IMMEDIATE")?;
        Ok(SqliteTxn {
            conn,
            tx_id: tx_id.into(),
            writes: 0,
            finished: false,
        })
    }

    /// Read committed state directly, outside any transaction.
    pub fn committed_value(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let conn = self.lock()?;
        select_value(&conn, key)
    }

    /// Number of committed keys.
    pub fn len(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM world_state", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Whether a transaction with this id has been committed.
    pub fn is_committed(&self, tx_id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM tx_log WHERE tx_id = ?1)",
            params![tx_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(StoreError::poisoned)
    }
}

/// One transaction against a [`SqliteStore`].
pub struct SqliteTxn<'a> {
    conn: MutexGuard<'a, Connection>,
    tx_id: String,
    writes: u64,
    finished: bool,
}

impl SqliteTxn<'_> {
    /// Record the transaction in `tx_log` and commit.
    pub fn commit(mut self) -> Result<()> {
        self.conn.execute(
            "INSERT INTO tx_log (tx_id, writes, committed_at) VALUES (?1, ?2, ?3)",
            params![self.tx_id, self.writes as i64, migration::now_millis()],
        )?;
        self.conn.execute_batch("COMMIT")?;
        self.finished = true;
        tracing::debug!(tx_id = %self.tx_id, writes = self.writes, "committed");
        Ok(())
    }

    /// Roll back explicitly, surfacing any error.
    pub fn rollback(mut self) -> Result<()> {
        self.finished = true;
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }
}

impl WorldState for SqliteTxn<'_> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        select_value(&self.conn, key)
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.conn.execute(
            "INSERT INTO world_state (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        self.writes += 1;
        Ok(())
    }

    fn range_scan(&self, start: &str, end: &str) -> Result<Box<dyn RangeScan + '_>> {
        let mut stmt = self.conn.prepare(
            "SELECT key, value FROM world_state
             WHERE key >= ?1 AND (?2 = '' OR key < ?2)
             ORDER BY key",
        )?;

        let entries = stmt
            .query_map(params![start, end], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<ScanEntry>>>()?;

        Ok(Box::new(SnapshotScan::new(entries)))
    }

    fn tx_id(&self) -> &str {
        &self.tx_id
    }
}

impl Drop for SqliteTxn<'_> {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.conn.execute_batch("ROLLBACK") {
                tracing::warn!(tx_id = %self.tx_id, "rollback failed: {}", e);
            }
        }
    }
}

fn select_value(conn: &Connection, key: &str) -> Result<Option<Vec<u8>>> {
    conn.query_row(
        "SELECT value FROM world_state WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
    .map_err(StoreError::from)
}
