//! Error types for Keyledger Core.

use thiserror::Error;

/// Errors that can occur while encoding or decoding a stored record.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed record: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("record encoding failed: {0}")]
    Encoding(#[source] serde_json::Error),
}

/// Reasons a key is rejected under [`KeyPolicy::Strict`](crate::KeyPolicy::Strict).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyViolation {
    #[error("key is empty")]
    Empty,

    #[error("key is {len} bytes, maximum is {max}")]
    TooLong { len: usize, max: usize },

    #[error("key starts with U+0000, which is reserved for composite keys")]
    ReservedPrefix,

    #[error("key contains control character at byte {0}")]
    ControlCharacter(usize),
}
