//! # Keyledger Testkit
//!
//! Testing utilities for Keyledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a memory store and contract with seeding helpers
//! - **Faults**: a [`WorldState`](keyledger_store::WorldState) wrapper that
//!   fails chosen calls and counts scan opens/closes
//! - **Generators**: Proptest strategies for keys and attachments
//!
//! ## Test Fixtures
//!
//! ```rust
//! use keyledger_testkit::TestFixture;
//!
//! let fixture = TestFixture::new();
//! fixture.seed_keys(&["a", "b"]);
//! assert!(!fixture.read("a").unwrap().consumed);
//! ```
//!
//! ## Fault Injection
//!
//! ```rust
//! use keyledger::KeyContract;
//! use keyledger_store::MemoryStore;
//! use keyledger_testkit::FaultyState;
//!
//! let store = MemoryStore::new();
//! let mut ws = FaultyState::new(store.begin()).fail_put_on("k");
//! assert!(KeyContract::default().create_key(&mut ws, "k").is_err());
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use keyledger_testkit::generators::distinct_keys;
//!
//! proptest! {
//!     #[test]
//!     fn creates_all(keys in distinct_keys(32)) {
//!         // ...
//!     }
//! }
//! ```

pub mod faults;
pub mod fixtures;
pub mod generators;

pub use faults::{FaultyState, ScanStats};
pub use fixtures::TestFixture;
