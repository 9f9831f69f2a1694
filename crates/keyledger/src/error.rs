//! Error types for the contract.

use std::fmt;

use keyledger_core::{CodecError, KeyViolation};
use keyledger_store::StoreError;
use thiserror::Error;

/// The world-state call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Get,
    Put,
    Scan,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StoreOp::Get => "read",
            StoreOp::Put => "write",
            StoreOp::Scan => "scan",
        })
    }
}

/// Errors that can occur during contract operations.
#[derive(Debug, Error)]
pub enum ContractError {
    /// Creation on a key that already has a record.
    #[error("key {key} already exists")]
    AlreadyExists { key: String },

    /// Operation on a key with no record.
    #[error("key {key} does not exist")]
    NotFound { key: String },

    /// Consuming a record that was already consumed.
    #[error("key {key} is already consumed")]
    AlreadyConsumed { key: String },

    /// Stored bytes do not parse as a record.
    #[error("failed to decode record for key {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: CodecError,
    },

    /// The underlying world state failed.
    #[error("world state {op} failed for key {key:?}: {source}")]
    StoreIo {
        op: StoreOp,
        key: String,
        #[source]
        source: StoreError,
    },

    /// Key rejected by the configured key policy.
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: KeyViolation },

    /// Bulk request exceeds `ContractConfig::max_bulk_keys`.
    #[error("batch of {len} keys exceeds limit of {max}")]
    BatchTooLarge { len: usize, max: usize },

    /// Dispatch on a function name the contract does not export.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong arity or unparsable arguments.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// A record or response could not be serialized.
    #[error("encoding failed: {0}")]
    Encode(#[source] CodecError),
}

/// Fieldless discriminant of [`ContractError`], for branching on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AlreadyExists,
    NotFound,
    AlreadyConsumed,
    Decode,
    StoreIo,
    InvalidKey,
    BatchTooLarge,
    UnknownFunction,
    InvalidArguments,
    Encode,
}

impl ContractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContractError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            ContractError::NotFound { .. } => ErrorKind::NotFound,
            ContractError::AlreadyConsumed { .. } => ErrorKind::AlreadyConsumed,
            ContractError::Decode { .. } => ErrorKind::Decode,
            ContractError::StoreIo { .. } => ErrorKind::StoreIo,
            ContractError::InvalidKey { .. } => ErrorKind::InvalidKey,
            ContractError::BatchTooLarge { .. } => ErrorKind::BatchTooLarge,
            ContractError::UnknownFunction(_) => ErrorKind::UnknownFunction,
            ContractError::InvalidArguments(_) => ErrorKind::InvalidArguments,
            ContractError::Encode(_) => ErrorKind::Encode,
        }
    }

    /// Short reason recorded against a key in a bulk creation's failure map.
    pub fn failure_reason(&self) -> String {
        match self {
            ContractError::AlreadyExists { .. } => "already exists".to_owned(),
            ContractError::StoreIo { source, .. } => format!("store I/O error: {}", source),
            ContractError::InvalidKey { reason, .. } => format!("invalid key: {}", reason),
            other => other.to_string(),
        }
    }

    pub(crate) fn store(op: StoreOp, key: &str, source: StoreError) -> Self {
        ContractError::StoreIo {
            op,
            key: key.to_owned(),
            source,
        }
    }
}

/// Result type for contract operations.
pub type Result<T> = std::result::Result<T, ContractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_reasons() {
        let exists = ContractError::AlreadyExists { key: "a".into() };
        assert_eq!(exists.failure_reason(), "already exists");

        let io = ContractError::store(StoreOp::Put, "a", StoreError::Backend("disk full".into()));
        assert_eq!(io.failure_reason(), "store I/O error: backend error: disk full");
        assert_eq!(io.kind(), ErrorKind::StoreIo);

        let invalid = ContractError::InvalidKey {
            key: String::new(),
            reason: KeyViolation::Empty,
        };
        assert_eq!(invalid.failure_reason(), "invalid key: key is empty");
    }

    #[test]
    fn test_display_carries_key() {
        let err = ContractError::AlreadyConsumed { key: "k9".into() };
        assert_eq!(err.to_string(), "key k9 is already consumed");
        let err = ContractError::store(StoreOp::Scan, "", StoreError::Backend("x".into()));
        assert_eq!(err.to_string(), "world state scan failed for key \"\": backend error: x");
    }
}
