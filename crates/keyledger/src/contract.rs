//! The KeyContract: lifecycle operations on single-use key records.
//!
//! Every operation takes the running transaction's [`WorldState`] explicitly.
//! The contract holds configuration only; all state lives in the store.
//!
//! ```text
//!   CreateKey / CreateKeyWithAttachment / CreateBulkKeys
//!                     │
//!                     ▼
//!               ┌────────────┐  ConsumeKey   ┌──────────┐
//!               │ Unconsumed │ ────────────► │ Consumed │
//!               └────────────┘               └──────────┘
//! ```

use std::collections::BTreeMap;

use keyledger_core::{
    BulkCreateResponse, ConsumeResponse, CreateResponse, CreateWithAttachmentResponse, KeyRecord,
    KeySummary, QueryAllResponse, ReadResponse, TxId,
};
use keyledger_store::{ScopedScan, WorldState, WorldStateExt};

use crate::config::ContractConfig;
use crate::error::{ContractError, Result, StoreOp};

/// The key-record contract.
#[derive(Debug, Clone, Default)]
pub struct KeyContract {
    config: ContractConfig,
}

impl KeyContract {
    pub fn new(config: ContractConfig) -> Self {
        Self { config }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Creation
    // ─────────────────────────────────────────────────────────────────────────

    /// Create an unconsumed record for `key`, owned by the current transaction.
    pub fn create_key<W: WorldState + ?Sized>(
        &self,
        ws: &mut W,
        key: &str,
    ) -> Result<CreateResponse> {
        let tx_id = self.insert_new(ws, key, None)?;
        Ok(CreateResponse::new(key, tx_id))
    }

    /// Create an unconsumed record for `key` carrying `attachment_ref`.
    ///
    /// The reference is stored verbatim and never validated.
    pub fn create_key_with_attachment<W: WorldState + ?Sized>(
        &self,
        ws: &mut W,
        key: &str,
        attachment_ref: &str,
    ) -> Result<CreateWithAttachmentResponse> {
        let tx_id = self.insert_new(ws, key, Some(attachment_ref))?;
        Ok(CreateWithAttachmentResponse::new(key, tx_id, attachment_ref))
    }

    /// Create a record for each key, in order, isolating per-key failures.
    ///
    /// Each key sees the writes of the keys before it, so a key repeated in
    /// `keys` is created once and then reported as already existing. The call
    /// itself only fails if the batch exceeds the configured limit.
    pub fn create_bulk_keys<W, S>(&self, ws: &mut W, keys: &[S]) -> Result<BulkCreateResponse>
    where
        W: WorldState + ?Sized,
        S: AsRef<str>,
    {
        if let Some(max) = self.config.max_bulk_keys {
            if keys.len() > max {
                return Err(ContractError::BatchTooLarge {
                    len: keys.len(),
                    max,
                });
            }
        }

        let mut created = Vec::with_capacity(keys.len());
        let mut failed = BTreeMap::new();

        for key in keys {
            let key = key.as_ref();
            match self.insert_new(ws, key, None) {
                Ok(_) => created.push(key.to_owned()),
                Err(e) => {
                    failed.insert(key.to_owned(), e.failure_reason());
                }
            }
        }

        tracing::debug!(
            tx_id = %ws.tx_id(),
            created = created.len(),
            failed = failed.len(),
            "bulk creation completed"
        );

        let tx_id = TxId::new(ws.tx_id());
        Ok(BulkCreateResponse::new(created, failed, tx_id))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Consumption
    // ─────────────────────────────────────────────────────────────────────────

    /// Mark the record for `key` consumed.
    ///
    /// The origin transaction and attachment are preserved. A record can be
    /// consumed once; later attempts fail without writing.
    pub fn consume_key<W: WorldState + ?Sized>(
        &self,
        ws: &mut W,
        key: &str,
    ) -> Result<ConsumeResponse> {
        let mut record = self.load(&*ws, key)?;

        if !record.consume() {
            tracing::debug!(key = %key, "consume rejected: already consumed");
            return Err(ContractError::AlreadyConsumed {
                key: key.to_owned(),
            });
        }

        let bytes = record.encode().map_err(ContractError::Encode)?;
        ws.put_state(key, &bytes)
            .map_err(|e| ContractError::store(StoreOp::Put, key, e))?;

        tracing::debug!(key = %key, tx_id = %ws.tx_id(), "key consumed");
        Ok(ConsumeResponse::new(key, TxId::new(ws.tx_id())))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Read the record for `key`.
    pub fn read_key<W: WorldState + ?Sized>(&self, ws: &W, key: &str) -> Result<ReadResponse> {
        self.load(ws, key).map(ReadResponse::from)
    }

    /// List every record in ascending key order.
    ///
    /// Fails as a whole on the first entry that cannot be read or decoded.
    pub fn query_all_keys<W: WorldState + ?Sized>(&self, ws: &W) -> Result<QueryAllResponse> {
        let scan = ws
            .range_scan("", "")
            .map_err(|e| ContractError::store(StoreOp::Scan, "", e))?;
        let mut scan = ScopedScan::new(scan);

        let mut keys = Vec::new();
        for entry in scan.by_ref() {
            let (key, bytes) = entry.map_err(|e| ContractError::store(StoreOp::Scan, "", e))?;
            let record = KeyRecord::decode(key.as_str(), &bytes).map_err(|source| {
                tracing::warn!(key = %key, "undecodable record in world state");
                ContractError::Decode { key, source }
            })?;
            keys.push(KeySummary::from(record));
        }

        scan.finish()
            .map_err(|e| ContractError::store(StoreOp::Scan, "", e))?;

        Ok(QueryAllResponse::new(keys))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    /// Check-then-write shared by all creation paths. Returns the origin tx id.
    fn insert_new<W: WorldState + ?Sized>(
        &self,
        ws: &mut W,
        key: &str,
        attachment_ref: Option<&str>,
    ) -> Result<TxId> {
        self.config
            .key_policy
            .check(key)
            .map_err(|reason| ContractError::InvalidKey {
                key: key.to_owned(),
                reason,
            })?;

        let existing = ws
            .get_existing(key)
            .map_err(|e| ContractError::store(StoreOp::Get, key, e))?;
        if existing.is_some() {
            tracing::debug!(key = %key, "create rejected: key exists");
            return Err(ContractError::AlreadyExists {
                key: key.to_owned(),
            });
        }

        let tx_id = TxId::new(ws.tx_id());
        let record = match attachment_ref {
            Some(attachment_ref) => KeyRecord::with_attachment(key, tx_id.clone(), attachment_ref),
            None => KeyRecord::new(key, tx_id.clone()),
        };

        let bytes = record.encode().map_err(ContractError::Encode)?;
        ws.put_state(key, &bytes)
            .map_err(|e| ContractError::store(StoreOp::Put, key, e))?;

        tracing::debug!(key = %key, tx_id = %tx_id, "key created");
        Ok(tx_id)
    }

    /// Fetch and decode the record for `key`.
    fn load<W: WorldState + ?Sized>(&self, ws: &W, key: &str) -> Result<KeyRecord> {
        let bytes = ws
            .get_existing(key)
            .map_err(|e| ContractError::store(StoreOp::Get, key, e))?
            .ok_or_else(|| ContractError::NotFound {
                key: key.to_owned(),
            })?;

        KeyRecord::decode(key, &bytes).map_err(|source| {
            tracing::warn!(key = %key, "undecodable record in world state");
            ContractError::Decode {
                key: key.to_owned(),
                source,
            }
        })
    }
}
