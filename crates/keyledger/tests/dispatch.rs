//! Name-based invocation and the JSON shapes clients see.

use keyledger::store::MemoryStore;
use keyledger::{ErrorKind, Invocation, KeyContract};
use serde_json::{json, Value};

fn call(contract: &KeyContract, store: &MemoryStore, tx_id: &str, function: &str, args: &[&str]) -> Value {
    let mut txn = store.begin_with_tx_id(tx_id);
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    let out = contract.dispatch(&mut txn, function, &args).unwrap();
    txn.commit().unwrap();
    serde_json::from_str(&out).unwrap()
}

#[test]
fn create_and_read_shapes() {
    let store = MemoryStore::new();
    let contract = KeyContract::default();

    let created = call(&contract, &store, "tx-1", "CreateKey", &["k1"]);
    assert_eq!(
        created,
        json!({"message": "Key created successfully", "key": "k1", "transactionID": "tx-1"})
    );

    let read = call(&contract, &store, "tx-2", "ReadKey", &["k1"]);
    assert_eq!(
        read,
        json!({"key": "k1", "consumed": false, "transactionID": "tx-1"})
    );
}

#[test]
fn attachment_shapes() {
    let store = MemoryStore::new();
    let contract = KeyContract::default();

    let created = call(
        &contract,
        &store,
        "tx-1",
        "CreateKeyWithImage",
        &["k", "http://example.com/image.jpg"],
    );
    assert_eq!(created["message"], "Key with image created successfully");
    assert_eq!(created["imageURL"], "http://example.com/image.jpg");

    let read = call(&contract, &store, "tx-2", "ReadKey", &["k"]);
    assert_eq!(read["imageURL"], "http://example.com/image.jpg");

    let via_alias = call(&contract, &store, "tx-3", "CreateKeyWithAttachment", &["k2", "img://2"]);
    assert_eq!(via_alias["imageURL"], "img://2");
}

#[test]
fn bulk_shape() {
    let store = MemoryStore::new();
    let contract = KeyContract::default();

    let resp = call(&contract, &store, "tx-b", "CreateBulkKeys", &[r#"["a","b","a"]"#]);
    assert_eq!(
        resp,
        json!({
            "message": "Bulk key creation completed",
            "createdKeys": ["a", "b"],
            "failedKeys": {"a": "already exists"},
            "transactionID": "tx-b"
        })
    );
}

#[test]
fn consume_and_query_shapes() {
    let store = MemoryStore::new();
    let contract = KeyContract::default();
    call(&contract, &store, "tx-1", "CreateBulkKeys", &[r#"["y","x"]"#]);

    let consumed = call(&contract, &store, "tx-2", "ConsumeKey", &["y"]);
    assert_eq!(
        consumed,
        json!({"message": "Key consumed successfully", "key": "y", "transactionID": "tx-2"})
    );

    let all = call(&contract, &store, "tx-3", "QueryAllKeys", &[]);
    assert_eq!(
        all,
        json!({
            "message": "All keys retrieved successfully",
            "keys": [
                {"key": "x", "transactionID": "tx-1", "consumed": false},
                {"key": "y", "transactionID": "tx-1", "consumed": true}
            ]
        })
    );
}

#[test]
fn invoke_from_host_json() {
    let store = MemoryStore::new();
    let contract = KeyContract::default();
    let mut txn = store.begin();

    let inv = Invocation::from_json(r#"{"function":"CreateKey","Args":["11223344556688"]}"#).unwrap();
    contract.invoke(&mut txn, &inv).unwrap();

    let inv = Invocation::new("ReadKey", ["11223344556688"]);
    let out: Value = serde_json::from_str(&contract.invoke(&mut txn, &inv).unwrap()).unwrap();
    assert_eq!(out["consumed"], false);
}

#[test]
fn dispatch_errors() {
    let store = MemoryStore::new();
    let contract = KeyContract::default();
    let mut txn = store.begin();

    let err = contract.dispatch(&mut txn, "DeleteKey", &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownFunction);

    let err = contract.dispatch(&mut txn, "CreateKey", &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArguments);

    let err = contract
        .dispatch(&mut txn, "QueryAllKeys", &["extra".to_owned()])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArguments);

    let err = contract
        .dispatch(&mut txn, "CreateBulkKeys", &["a,b".to_owned()])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArguments);

    let err = contract
        .dispatch(&mut txn, "ReadKey", &["missing".to_owned()])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(txn.pending_writes(), 0);
}
