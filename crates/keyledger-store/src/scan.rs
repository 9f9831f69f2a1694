//! Range-scan plumbing shared by the hosts.
//!
//! [`SnapshotScan`] is the scan both reference hosts return: the range is
//! materialized up front, which sidesteps cursor lifetimes. [`ScopedScan`]
//! is the guard callers wrap any scan in so it is closed on every exit path.

use crate::error::Result;
use crate::traits::{RangeScan, ScanEntry};

/// A scan over a pre-collected, already-ordered set of entries.
pub struct SnapshotScan {
    entries: std::vec::IntoIter<ScanEntry>,
    closed: bool,
}

impl SnapshotScan {
    /// Entries must already be in ascending key order.
    pub fn new(entries: Vec<ScanEntry>) -> Self {
        Self {
            entries: entries.into_iter(),
            closed: false,
        }
    }
}

impl Iterator for SnapshotScan {
    type Item = Result<ScanEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        self.entries.next().map(Ok)
    }
}

impl RangeScan for SnapshotScan {
    fn close(&mut self) -> Result<()> {
        self.closed = true;
        self.entries = Vec::new().into_iter();
        Ok(())
    }
}

/// Owns an open scan and closes it exactly once.
///
/// Call [`ScopedScan::finish`] on the success path to observe close errors;
/// if the guard is dropped instead (early return, `?`, panic), the scan is
/// closed in `Drop` and a close failure is logged.
pub struct ScopedScan<'a> {
    scan: Option<Box<dyn RangeScan + 'a>>,
}

impl<'a> ScopedScan<'a> {
    pub fn new(scan: Box<dyn RangeScan + 'a>) -> Self {
        Self { scan: Some(scan) }
    }

    /// Close the scan and report the result.
    pub fn finish(mut self) -> Result<()> {
        match self.scan.take() {
            Some(mut scan) => scan.close(),
            None => Ok(()),
        }
    }
}

impl Iterator for ScopedScan<'_> {
    type Item = Result<ScanEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.scan.as_mut().and_then(|scan| scan.next())
    }
}

impl Drop for ScopedScan<'_> {
    fn drop(&mut self) {
        if let Some(mut scan) = self.scan.take() {
            if let Err(e) = scan.close() {
                tracing::warn!("failed to close range scan: {}", e);
            }
        }
    }
}
