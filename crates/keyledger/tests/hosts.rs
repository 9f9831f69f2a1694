//! The same contract behaviour on every reference host.

use keyledger::store::{MemoryStore, SqliteStore, WorldState};
use keyledger::{ErrorKind, KeyContract};
use tempfile::TempDir;

/// Runs inside one transaction; needs read-your-writes from the host.
fn exercise_in_transaction<W: WorldState>(contract: &KeyContract, ws: &mut W) {
    let resp = contract.create_bulk_keys(ws, &["a", "b", "a"]).unwrap();
    assert_eq!(resp.created_keys, vec!["a", "b"]);
    assert_eq!(resp.failed_keys["a"], "already exists");

    contract.create_key_with_attachment(ws, "c", "img://c").unwrap();
    contract.consume_key(ws, "b").unwrap();
    assert_eq!(
        contract.consume_key(ws, "b").unwrap_err().kind(),
        ErrorKind::AlreadyConsumed
    );

    let all = contract.query_all_keys(&*ws).unwrap();
    let summary: Vec<(&str, bool)> = all
        .keys
        .iter()
        .map(|s| (s.key.as_str(), s.consumed))
        .collect();
    assert_eq!(summary, vec![("a", false), ("b", true), ("c", false)]);
}

#[test]
fn memory_host_read_your_writes() {
    let store = MemoryStore::new();
    let contract = KeyContract::default();
    let mut txn = store.begin();
    exercise_in_transaction(&contract, &mut txn);
    txn.commit().unwrap();
    assert_eq!(store.len().unwrap(), 3);
}

#[test]
fn sqlite_host_read_your_writes() {
    let store = SqliteStore::open_memory().unwrap();
    let contract = KeyContract::default();
    let mut txn = store.begin().unwrap();
    exercise_in_transaction(&contract, &mut txn);
    txn.commit().unwrap();
    assert_eq!(store.len().unwrap(), 3);
}

#[test]
fn sqlite_dropped_transaction_leaves_no_writes() {
    let store = SqliteStore::open_memory().unwrap();
    let contract = KeyContract::default();
    {
        let mut txn = store.begin().unwrap();
        contract.create_key(&mut txn, "k").unwrap();
    }
    assert!(store.is_empty().unwrap());

    let txn = store.begin().unwrap();
    assert_eq!(
        contract.read_key(&txn, "k").unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn sqlite_records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.db");
    let contract = KeyContract::default();

    let origin = {
        let store = SqliteStore::open(&path).unwrap();
        let mut txn = store.begin().unwrap();
        let created = contract.create_key(&mut txn, "persisted").unwrap();
        txn.commit().unwrap();
        assert!(store.is_committed(created.transaction_id.as_str()).unwrap());
        created.transaction_id
    };

    let store = SqliteStore::open(&path).unwrap();
    let mut txn = store.begin().unwrap();
    let read = contract.read_key(&txn, "persisted").unwrap();
    assert_eq!(read.transaction_id, origin);
    assert!(!read.consumed);

    contract.consume_key(&mut txn, "persisted").unwrap();
    txn.commit().unwrap();

    let txn = store.begin().unwrap();
    assert!(contract.read_key(&txn, "persisted").unwrap().consumed);
}

#[test]
fn hosts_agree_on_dispatch_output() {
    let contract = KeyContract::default();
    let args = vec![r#"["k2","k1"]"#.to_owned()];

    let memory = MemoryStore::new();
    let mut mtxn = memory.begin_with_tx_id("tx-same");
    let from_memory = contract.dispatch(&mut mtxn, "CreateBulkKeys", &args).unwrap();
    let query_memory = contract.dispatch(&mut mtxn, "QueryAllKeys", &[]).unwrap();

    let sqlite = SqliteStore::open_memory().unwrap();
    let mut stxn = sqlite.begin_with_tx_id("tx-same").unwrap();
    let from_sqlite = contract.dispatch(&mut stxn, "CreateBulkKeys", &args).unwrap();
    let query_sqlite = contract.dispatch(&mut stxn, "QueryAllKeys", &[]).unwrap();

    assert_eq!(from_memory, from_sqlite);
    assert_eq!(query_memory, query_sqlite);
}
