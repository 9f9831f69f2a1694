//! WorldState trait: the narrow interface the contract needs from its host.
//!
//! A `WorldState` value is one transaction's view of the ledger's ordered
//! key-value store. The contract only ever reads, writes, and range-scans
//! through it, and asks it for the identifier of the running transaction.

use crate::error::Result;

/// One `(key, value)` pair produced by a range scan.
pub type ScanEntry = (String, Vec<u8>);

/// An ordered iteration over store entries that holds a host resource.
///
/// Entries come out in ascending byte-lexicographic key order. Callers must
/// call [`RangeScan::close`] when done; [`ScopedScan`](crate::ScopedScan)
/// does this on every exit path.
pub trait RangeScan: Iterator<Item = Result<ScanEntry>> {
    /// Release the underlying resource. Further calls to `next` yield `None`.
    fn close(&mut self) -> Result<()>;
}

/// The store access port.
///
/// # Design Notes
///
/// - **Absence is not an error**: `get_state` returns `Ok(None)` for a missing
///   key. Callers should also treat an empty value as absent (see
///   [`WorldStateExt::get_existing`]).
/// - **Read-your-writes**: a `get_state` or `range_scan` issued after a
///   `put_state` in the same transaction must observe that write. Bulk
///   creation depends on it to reject duplicates within one call.
/// - **Bounds**: `range_scan(start, end)` is `start <= key < end`; an empty
///   `end` means unbounded, so `range_scan("", "")` covers the whole store.
pub trait WorldState {
    /// Get the value stored under `key`.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<()>;

    /// Open an ascending scan over `start <= key < end`.
    fn range_scan(&self, start: &str, end: &str) -> Result<Box<dyn RangeScan + '_>>;

    /// Identifier of the running transaction. Stable for its whole lifetime.
    fn tx_id(&self) -> &str;
}

impl<W: WorldState + ?Sized> WorldState for &mut W {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get_state(key)
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<()> {
        (**self).put_state(key, value)
    }

    fn range_scan(&self, start: &str, end: &str) -> Result<Box<dyn RangeScan + '_>> {
        (**self).range_scan(start, end)
    }

    fn tx_id(&self) -> &str {
        (**self).tx_id()
    }
}

/// Extension trait for common world-state patterns.
pub trait WorldStateExt: WorldState {
    /// Like `get_state`, but an empty value counts as absent.
    fn get_existing(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.get_state(key)?.filter(|bytes| !bytes.is_empty()))
    }
}

impl<W: WorldState + ?Sized> WorldStateExt for W {}
