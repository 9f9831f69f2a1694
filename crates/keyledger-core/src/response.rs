//! Response payloads returned to the ledger host.
//!
//! Each contract operation has its own fixed struct. Field names follow the
//! ledger's JSON conventions (`transactionID`, `imageURL`, camelCase lists) and
//! are only applied at serialization time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::KeyRecord;
use crate::types::TxId;

pub const KEY_CREATED: &str = "Key created successfully";
pub const KEY_WITH_IMAGE_CREATED: &str = "Key with image created successfully";
pub const BULK_CREATION_COMPLETED: &str = "Bulk key creation completed";
pub const KEY_CONSUMED: &str = "Key consumed successfully";
pub const ALL_KEYS_RETRIEVED: &str = "All keys retrieved successfully";

/// Result of `CreateKey`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateResponse {
    pub message: String,
    pub key: String,
    #[serde(rename = "transactionID")]
    pub transaction_id: TxId,
}

impl CreateResponse {
    pub fn new(key: impl Into<String>, transaction_id: TxId) -> Self {
        Self {
            message: KEY_CREATED.to_owned(),
            key: key.into(),
            transaction_id,
        }
    }
}

/// Result of `CreateKeyWithAttachment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWithAttachmentResponse {
    pub message: String,
    pub key: String,
    #[serde(rename = "transactionID")]
    pub transaction_id: TxId,
    #[serde(rename = "imageURL")]
    pub attachment_ref: String,
}

impl CreateWithAttachmentResponse {
    pub fn new(key: impl Into<String>, transaction_id: TxId, attachment_ref: impl Into<String>) -> Self {
        Self {
            message: KEY_WITH_IMAGE_CREATED.to_owned(),
            key: key.into(),
            transaction_id,
            attachment_ref: attachment_ref.into(),
        }
    }
}

/// Result of `CreateBulkKeys`.
///
/// `failed_keys` holds one reason per distinct failing key. It is a
/// `BTreeMap` so the serialized form is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkCreateResponse {
    pub message: String,
    #[serde(rename = "createdKeys")]
    pub created_keys: Vec<String>,
    #[serde(rename = "failedKeys")]
    pub failed_keys: BTreeMap<String, String>,
    #[serde(rename = "transactionID")]
    pub transaction_id: TxId,
}

impl BulkCreateResponse {
    pub fn new(
        created_keys: Vec<String>,
        failed_keys: BTreeMap<String, String>,
        transaction_id: TxId,
    ) -> Self {
        Self {
            message: BULK_CREATION_COMPLETED.to_owned(),
            created_keys,
            failed_keys,
            transaction_id,
        }
    }
}

/// Result of `ConsumeKey`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumeResponse {
    pub message: String,
    pub key: String,
    #[serde(rename = "transactionID")]
    pub transaction_id: TxId,
}

impl ConsumeResponse {
    pub fn new(key: impl Into<String>, transaction_id: TxId) -> Self {
        Self {
            message: KEY_CONSUMED.to_owned(),
            key: key.into(),
            transaction_id,
        }
    }
}

/// Result of `ReadKey`.
///
/// `transaction_id` is the record's origin transaction, not the reader's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadResponse {
    pub key: String,
    pub consumed: bool,
    #[serde(rename = "transactionID")]
    pub transaction_id: TxId,
    #[serde(rename = "imageURL", default, skip_serializing_if = "Option::is_none")]
    pub attachment_ref: Option<String>,
}

impl From<KeyRecord> for ReadResponse {
    fn from(record: KeyRecord) -> Self {
        Self {
            key: record.key().to_owned(),
            consumed: record.is_consumed(),
            transaction_id: record.origin_tx_id().clone(),
            attachment_ref: record.attachment_ref().map(str::to_owned),
        }
    }
}

/// One entry of `QueryAllKeys`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySummary {
    pub key: String,
    #[serde(rename = "transactionID")]
    pub transaction_id: TxId,
    pub consumed: bool,
}

impl From<KeyRecord> for KeySummary {
    fn from(record: KeyRecord) -> Self {
        Self {
            consumed: record.is_consumed(),
            transaction_id: record.origin_tx_id().clone(),
            key: record.key().to_owned(),
        }
    }
}

/// Result of `QueryAllKeys`, in ascending key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAllResponse {
    pub message: String,
    pub keys: Vec<KeySummary>,
}

impl QueryAllResponse {
    pub fn new(keys: Vec<KeySummary>) -> Self {
        Self {
            message: ALL_KEYS_RETRIEVED.to_owned(),
            keys,
        }
    }
}
