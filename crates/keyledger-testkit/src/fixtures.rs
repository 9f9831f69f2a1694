//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use keyledger::{ContractConfig, KeyContract, ReadResponse, TxId};
use keyledger_store::{MemoryStore, WorldState};

/// A memory store plus a contract, with helpers that each run in their own
/// committed transaction.
pub struct TestFixture {
    pub store: MemoryStore,
    pub contract: KeyContract,
}

impl TestFixture {
    /// Default (permissive) contract over an empty store.
    pub fn new() -> Self {
        Self::with_config(ContractConfig::default())
    }

    pub fn with_config(config: ContractConfig) -> Self {
        Self {
            store: MemoryStore::new(),
            contract: KeyContract::new(config),
        }
    }

    /// Create `keys` in one committed transaction and return its id.
    pub fn seed_keys(&self, keys: &[&str]) -> TxId {
        let mut txn = self.store.begin();
        for key in keys {
            self.contract
                .create_key(&mut txn, key)
                .expect("seed key creation failed");
        }
        let tx_id = TxId::new(txn.tx_id());
        txn.commit().expect("seed commit failed");
        tx_id
    }

    /// Commit raw bytes under `key`, bypassing the contract.
    pub fn seed_raw(&self, key: &str, value: &[u8]) {
        let mut txn = self.store.begin();
        txn.put_state(key, value).expect("raw put failed");
        txn.commit().expect("raw commit failed");
    }

    /// Read `key` in a fresh transaction.
    pub fn read(&self, key: &str) -> keyledger::Result<ReadResponse> {
        let txn = self.store.begin();
        self.contract.read_key(&txn, key)
    }

    /// Keys currently committed, in scan order.
    pub fn committed_keys(&self) -> Vec<String> {
        let txn = self.store.begin();
        self.contract
            .query_all_keys(&txn)
            .expect("query failed")
            .keys
            .into_iter()
            .map(|summary| summary.key)
            .collect()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_and_read() {
        let fixture = TestFixture::new();
        let tx_id = fixture.seed_keys(&["b", "a"]);

        let read = fixture.read("a").unwrap();
        assert_eq!(read.transaction_id, tx_id);
        assert!(!read.consumed);
        assert_eq!(fixture.committed_keys(), vec!["a", "b"]);
    }

    #[test]
    fn test_seed_raw() {
        let fixture = TestFixture::new();
        fixture.seed_raw("x", br#"{"consumed":true,"txID":"old","imageURL":""}"#);
        let read = fixture.read("x").unwrap();
        assert!(read.consumed);
        assert_eq!(read.transaction_id, "old");
    }
}
