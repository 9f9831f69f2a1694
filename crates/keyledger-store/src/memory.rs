//! In-memory implementation of the WorldState port.
//!
//! [`MemoryStore`] holds committed state. Each invocation runs in a
//! [`MemoryTxn`] that buffers its writes privately, serves them back to its
//! own reads and scans, and validates its read set when committed. Dropping a
//! transaction without committing discards its writes.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::ids::TxIdGenerator;
use crate::scan::SnapshotScan;
use crate::traits::{RangeScan, ScanEntry, WorldState};

/// In-memory store. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
    ids: TxIdGenerator,
}

struct MemoryStoreInner {
    /// Committed state, ordered by key.
    state: BTreeMap<String, Versioned>,

    /// Number of successful commits so far.
    commit_seq: u64,
}

struct Versioned {
    value: Vec<u8>,
    /// `commit_seq` of the commit that last wrote this key.
    version: u64,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::with_tx_ids(TxIdGenerator::new())
    }

    /// Create a store that draws transaction ids from `ids`.
    pub fn with_tx_ids(ids: TxIdGenerator) -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner {
                state: BTreeMap::new(),
                commit_seq: 0,
            }),
            ids,
        }
    }

    /// Start a transaction with a freshly generated id.
    pub fn begin(&self) -> MemoryTxn<'_> {
        self.begin_with_tx_id(self.ids.next_id())
    }

    /// Start a transaction with a caller-supplied id.
    pub fn begin_with_tx_id(&self, tx_id: impl Into<String>) -> MemoryTxn<'_> {
        MemoryTxn {
            store: self,
            tx_id: tx_id.into(),
            reads: RefCell::new(BTreeMap::new()),
            writes: BTreeMap::new(),
            finished: false,
        }
    }

    /// Read committed state directly, outside any transaction.
    pub fn committed_value(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let inner = self.inner.read().map_err(StoreError::poisoned)?;
        Ok(inner.state.get(key).map(|v| v.value.clone()))
    }

    /// Number of committed keys.
    pub fn len(&self) -> Result<usize> {
        let inner = self.inner.read().map_err(StoreError::poisoned)?;
        Ok(inner.state.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// One transaction against a [`MemoryStore`].
pub struct MemoryTxn<'a> {
    store: &'a MemoryStore,
    tx_id: String,

    /// Versions observed from committed state (`None` = key was absent).
    reads: RefCell<BTreeMap<String, Option<u64>>>,

    /// Buffered writes, visible only to this transaction until commit.
    writes: BTreeMap<String, Vec<u8>>,

    finished: bool,
}

impl MemoryTxn<'_> {
    /// Validate the read set and publish buffered writes.
    ///
    /// Fails with [`StoreError::Conflict`] if any key this transaction read
    /// was changed by a commit that landed after the read; nothing is written
    /// in that case.
    pub fn commit(mut self) -> Result<()> {
        self.finished = true;
        let mut inner = self.store.inner.write().map_err(StoreError::poisoned)?;

        for (key, seen) in self.reads.borrow().iter() {
            let current = inner.state.get(key).map(|v| v.version);
            if current != *seen {
                tracing::debug!(tx_id = %self.tx_id, key = %key, "commit rejected: read conflict");
                return Err(StoreError::Conflict { key: key.clone() });
            }
        }

        inner.commit_seq += 1;
        let version = inner.commit_seq;
        let writes = std::mem::take(&mut self.writes);
        let count = writes.len();
        for (key, value) in writes {
            inner.state.insert(key, Versioned { value, version });
        }

        tracing::debug!(tx_id = %self.tx_id, writes = count, "committed");
        Ok(())
    }

    /// Number of writes buffered so far.
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    fn record_read(&self, key: &str, version: Option<u64>) {
        self.reads
            .borrow_mut()
            .entry(key.to_owned())
            .or_insert(version);
    }
}

impl WorldState for MemoryTxn<'_> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(value) = self.writes.get(key) {
            return Ok(Some(value.clone()));
        }

        let inner = self.store.inner.read().map_err(StoreError::poisoned)?;
        let found = inner.state.get(key);
        self.record_read(key, found.map(|v| v.version));
        Ok(found.map(|v| v.value.clone()))
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.writes.insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn range_scan(&self, start: &str, end: &str) -> Result<Box<dyn RangeScan + '_>> {
        if !end.is_empty() && start > end {
            return Ok(Box::new(SnapshotScan::new(Vec::new())));
        }
        let bounds = (Bound::Included(start), end_bound(end));

        let mut merged: BTreeMap<String, Vec<u8>> = BTreeMap::new();
        {
            let inner = self.store.inner.read().map_err(StoreError::poisoned)?;
            for (key, v) in inner.state.range::<str, _>(bounds) {
                self.record_read(key, Some(v.version));
                merged.insert(key.clone(), v.value.clone());
            }
        }
        for (key, value) in self.writes.range::<str, _>(bounds) {
            merged.insert(key.clone(), value.clone());
        }

        let entries: Vec<ScanEntry> = merged.into_iter().collect();
        Ok(Box::new(SnapshotScan::new(entries)))
    }

    fn tx_id(&self) -> &str {
        &self.tx_id
    }
}

impl Drop for MemoryTxn<'_> {
    fn drop(&mut self) {
        if !self.finished && !self.writes.is_empty() {
            tracing::debug!(
                tx_id = %self.tx_id,
                writes = self.writes.len(),
                "rolling back uncommitted transaction"
            );
        }
    }
}

fn end_bound(end: &str) -> Bound<&str> {
    if end.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Excluded(end)
    }
}
