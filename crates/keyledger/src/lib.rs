//! # Keyledger
//!
//! Single-use key records on a transactional ledger.
//!
//! ## Overview
//!
//! Keyledger manages records that are created once, consumed at most once,
//! and never deleted. It runs inside a ledger host's transaction and sees the
//! ledger only through the [`WorldState`](store::WorldState) port:
//!
//! - **Create**: one key, one key with an attachment, or a bulk list with
//!   per-key failure reporting
//! - **Consume**: flip a record's `consumed` flag, exactly once
//! - **Read / Query**: one record, or every record in ascending key order
//!
//! ## Usage
//!
//! ```rust
//! use keyledger::{ContractConfig, KeyContract};
//! use keyledger::store::MemoryStore;
//!
//! let store = MemoryStore::new();
//! let contract = KeyContract::new(ContractConfig::default());
//!
//! let mut txn = store.begin();
//! contract.create_key(&mut txn, "voucher-1").unwrap();
//! contract.consume_key(&mut txn, "voucher-1").unwrap();
//! assert!(contract.read_key(&txn, "voucher-1").unwrap().consumed);
//! txn.commit().unwrap();
//!
//! // Hosts that route by function name use dispatch and get JSON back.
//! let mut txn = store.begin();
//! let json = contract
//!     .dispatch(&mut txn, "QueryAllKeys", &[])
//!     .unwrap();
//! assert!(json.contains("voucher-1"));
//! ```
//!
//! ## Re-exports
//!
//! - `keyledger::core` - Records, responses, key policy
//! - `keyledger::store` - World-state port and reference hosts

pub mod config;
pub mod contract;
pub mod dispatch;
pub mod error;

pub use keyledger_core as core;
pub use keyledger_store as store;

pub use config::ContractConfig;
pub use contract::KeyContract;
pub use dispatch::{Function, Invocation};
pub use error::{ContractError, ErrorKind, Result, StoreOp};

pub use keyledger_core::{
    BulkCreateResponse, ConsumeResponse, CreateResponse, CreateWithAttachmentResponse, KeyPolicy,
    KeyRecord, KeySummary, QueryAllResponse, ReadResponse, TxId,
};
