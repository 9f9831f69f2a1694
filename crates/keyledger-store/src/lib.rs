//! # Keyledger Store
//!
//! The world-state port the contract runs against, plus two reference hosts
//! that implement it.
//!
//! ## Overview
//!
//! The contract never touches a database directly. It is handed a
//! [`WorldState`]: one transaction's view of an ordered key-value store, with
//! get/put/range-scan and the transaction's id. Ledger runtimes provide their
//! own implementation; [`MemoryStore`] and [`SqliteStore`] are provided for
//! tests and standalone deployments.
//!
//! ## Key Types
//!
//! - [`WorldState`] - The store access port
//! - [`RangeScan`] - A closable, ordered scan
//! - [`ScopedScan`] - Guard that closes a scan on every exit path
//! - [`MemoryStore`] / [`MemoryTxn`] - In-memory host with read-set validation
//! - [`SqliteStore`] / [`SqliteTxn`] - SQLite host
//!
//! ## Usage
//!
//! ```rust
//! use keyledger_store::{MemoryStore, WorldState};
//!
//! let store = MemoryStore::new();
//! let mut txn = store.begin();
//! txn.put_state("k", b"v").unwrap();
//! assert_eq!(txn.get_state("k").unwrap(), Some(b"v".to_vec()));
//! txn.commit().unwrap();
//! ```
//!
//! ## Design Notes
//!
//! - **Read-your-writes**: both hosts serve a transaction's own writes back to
//!   it, including through range scans
//! - **Rollback on drop**: a transaction that is not committed leaves no trace
//! - **Byte order**: scans are ordered by the keys' UTF-8 bytes

pub mod error;
pub mod ids;
pub mod memory;
pub mod migration;
pub mod scan;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use ids::TxIdGenerator;
pub use memory::{MemoryStore, MemoryTxn};
pub use scan::{ScopedScan, SnapshotScan};
pub use sqlite::{SqliteStore, SqliteTxn};
pub use traits::{RangeScan, ScanEntry, WorldState, WorldStateExt};
