//! # Keyledger Core
//!
//! Pure primitives for Keyledger: key records, their stored encoding, and the
//! response payloads returned to the ledger host.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over record values.
//!
//! ## Key Types
//!
//! - [`KeyRecord`] - The unit of state stored under each key
//! - [`TxId`] - Identifier of the transaction that created a record
//! - [`KeyPolicy`] - Which keys the contract accepts
//! - [`response`] - One fixed payload struct per contract operation
//!
//! ## Stored Encoding
//!
//! Records are stored as JSON objects (`consumed`, `txID`, `imageURL`). See
//! the [`record`] module.

pub mod error;
pub mod record;
pub mod response;
pub mod types;
pub mod validation;

pub use error::{CodecError, KeyViolation};
pub use record::KeyRecord;
pub use response::{
    BulkCreateResponse, ConsumeResponse, CreateResponse, CreateWithAttachmentResponse,
    KeySummary, QueryAllResponse, ReadResponse,
};
pub use types::TxId;
pub use validation::{KeyPolicy, MAX_KEY_LEN};
