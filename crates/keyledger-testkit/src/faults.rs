//! Fault injection for the world-state port.
//!
//! [`FaultyState`] wraps any [`WorldState`] and fails chosen calls with
//! [`StoreError::Backend`], so error paths can be driven without a broken
//! database. It also counts scan opens and closes, which lets tests check
//! that every scan is released.

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use keyledger_store::{RangeScan, Result, ScanEntry, StoreError, WorldState};

/// Opened/closed counters shared between a [`FaultyState`] and the test.
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    opened: Rc<Cell<usize>>,
    closed: Rc<Cell<usize>>,
}

impl ScanStats {
    pub fn opened(&self) -> usize {
        self.opened.get()
    }

    pub fn closed(&self) -> usize {
        self.closed.get()
    }

    /// Every scan that was opened has been closed.
    pub fn all_closed(&self) -> bool {
        self.opened() == self.closed()
    }
}

/// A [`WorldState`] wrapper that fails on demand.
pub struct FaultyState<W> {
    inner: W,
    fail_get: HashSet<String>,
    fail_put: HashSet<String>,
    fail_scan_open: bool,
    fail_scan_after: Option<usize>,
    stats: ScanStats,
}

impl<W: WorldState> FaultyState<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            fail_get: HashSet::new(),
            fail_put: HashSet::new(),
            fail_scan_open: false,
            fail_scan_after: None,
            stats: ScanStats::default(),
        }
    }

    /// Fail `get_state` for `key`.
    pub fn fail_get_on(mut self, key: &str) -> Self {
        self.fail_get.insert(key.to_owned());
        self
    }

    /// Fail `put_state` for `key`.
    pub fn fail_put_on(mut self, key: &str) -> Self {
        self.fail_put.insert(key.to_owned());
        self
    }

    /// Fail every `range_scan` call.
    pub fn fail_scan_open(mut self) -> Self {
        self.fail_scan_open = true;
        self
    }

    /// Yield an error in place of the `n`th scan entry (0-based).
    pub fn fail_scan_after(mut self, n: usize) -> Self {
        self.fail_scan_after = Some(n);
        self
    }

    pub fn scan_stats(&self) -> ScanStats {
        self.stats.clone()
    }

    pub fn inner(&self) -> &W {
        &self.inner
    }
}

impl<W: WorldState> WorldState for FaultyState<W> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if self.fail_get.contains(key) {
            return Err(StoreError::Backend(format!("injected read failure for {}", key)));
        }
        self.inner.get_state(key)
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<()> {
        if self.fail_put.contains(key) {
            return Err(StoreError::Backend(format!("injected write failure for {}", key)));
        }
        self.inner.put_state(key, value)
    }

    fn range_scan(&self, start: &str, end: &str) -> Result<Box<dyn RangeScan + '_>> {
        if self.fail_scan_open {
            return Err(StoreError::Backend("injected scan open failure".into()));
        }
        let inner = self.inner.range_scan(start, end)?;
        self.stats.opened.set(self.stats.opened.get() + 1);
        Ok(Box::new(TrackedScan {
            inner,
            yielded: 0,
            fail_after: self.fail_scan_after,
            closed: self.stats.closed.clone(),
        }))
    }

    fn tx_id(&self) -> &str {
        self.inner.tx_id()
    }
}

struct TrackedScan<'a> {
    inner: Box<dyn RangeScan + 'a>,
    yielded: usize,
    fail_after: Option<usize>,
    closed: Rc<Cell<usize>>,
}

impl Iterator for TrackedScan<'_> {
    type Item = Result<ScanEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fail_after == Some(self.yielded) {
            self.yielded += 1;
            return Some(Err(StoreError::Backend("injected scan failure".into())));
        }
        let entry = self.inner.next()?;
        self.yielded += 1;
        Some(entry)
    }
}

impl RangeScan for TrackedScan<'_> {
    fn close(&mut self) -> Result<()> {
        self.closed.set(self.closed.get() + 1);
        self.inner.close()
    }
}
