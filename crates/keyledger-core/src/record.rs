//! KeyRecord: the single-use record stored under each key.
//!
//! A record is created unconsumed, may be consumed exactly once, and is never
//! removed. Its origin transaction and attachment are fixed at creation, so
//! the only mutator exposed here is [`KeyRecord::consume`].
//!
//! ## Stored form
//!
//! The key itself is the store key and is not repeated in the value. The value
//! is a JSON object:
//!
//! ```json
//! {"consumed":false,"txID":"<origin tx>","imageURL":""}
//! ```
//!
//! `imageURL` is written as `""` when there is no attachment. Decoding accepts
//! what older writers left behind:
//!
//! - field names match case-insensitively (`Consumed`, `TxID`, `ImageURL`),
//!   an exact match winning over a folded one
//! - missing or `null` fields take their zero value, and a bare `null` value
//!   decodes as an all-zero record
//! - unknown fields are ignored
//!
//! Anything else that is not an object, or a field of the wrong type, is
//! rejected.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CodecError;
use crate::types::TxId;

#[derive(Serialize)]
struct StoredRecordRef<'a> {
    consumed: bool,
    #[serde(rename = "txID")]
    tx_id: &'a str,
    #[serde(rename = "imageURL")]
    image_url: &'a str,
}


/// A key record as seen by the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRecord {
    key: String,
    consumed: bool,
    origin_tx_id: TxId,
    attachment_ref: Option<String>,
}

impl KeyRecord {
    /// A fresh, unconsumed record created by `origin_tx_id`.
    pub fn new(key: impl Into<String>, origin_tx_id: TxId) -> Self {
        Self {
            key: key.into(),
            consumed: false,
            origin_tx_id,
            attachment_ref: None,
        }
    }

    /// A fresh record carrying an attachment reference.
    ///
    /// The reference is stored verbatim. An empty reference is
    /// indistinguishable from no attachment once stored, so it is normalized
    /// to `None` here.
    pub fn with_attachment(
        key: impl Into<String>,
        origin_tx_id: TxId,
        attachment_ref: impl Into<String>,
    ) -> Self {
        let attachment_ref = attachment_ref.into();
        Self {
            key: key.into(),
            consumed: false,
            origin_tx_id,
            attachment_ref: (!attachment_ref.is_empty()).then_some(attachment_ref),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    pub fn origin_tx_id(&self) -> &TxId {
        &self.origin_tx_id
    }

    pub fn attachment_ref(&self) -> Option<&str> {
        self.attachment_ref.as_deref()
    }

    /// Mark the record consumed.
    ///
    /// Returns `false` without changing anything if it was already consumed.
    pub fn consume(&mut self) -> bool {
        if self.consumed {
            return false;
        }
        self.consumed = true;
        true
    }

    /// Encode the stored value (the key is not included).
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let stored = StoredRecordRef {
            consumed: self.consumed,
            tx_id: self.origin_tx_id.as_str(),
            image_url: self.attachment_ref.as_deref().unwrap_or(""),
        };
        serde_json::to_vec(&stored).map_err(CodecError::Encoding)
    }

    /// Decode the stored value found under `key`.
    pub fn decode(key: impl Into<String>, bytes: &[u8]) -> Result<Self, CodecError> {
        let fields: Option<Map<String, Value>> =
            serde_json::from_slice(bytes).map_err(CodecError::Malformed)?;
        let fields = fields.unwrap_or_default();

        let consumed: Option<bool> = stored_field(&fields, "consumed")?;
        let tx_id: Option<String> = stored_field(&fields, "txID")?;
        let image_url: Option<String> = stored_field(&fields, "imageURL")?;

        Ok(Self {
            key: key.into(),
            consumed: consumed.unwrap_or(false),
            origin_tx_id: TxId::new(tx_id.unwrap_or_default()),
            attachment_ref: image_url.filter(|url| !url.is_empty()),
        })
    }
}

/// Look up `name`, falling back to an ASCII case-insensitive match.
fn stored_field<'de, T>(fields: &'de Map<String, Value>, name: &str) -> Result<Option<T>, CodecError>
where
    T: Deserialize<'de>,
{
    let value = fields.get(name).or_else(|| {
        fields
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    });

    match value {
        Some(value) => Option::<T>::deserialize(value).map_err(CodecError::Malformed),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_unconsumed() {
        let record = KeyRecord::new("k1", TxId::new("tx1"));
        assert!(!record.is_consumed());
        assert_eq!(record.origin_tx_id(), "tx1");
        assert_eq!(record.attachment_ref(), None);
    }

    #[test]
    fn test_consume_is_one_way() {
        let mut record = KeyRecord::new("k1", TxId::new("tx1"));
        assert!(record.consume());
        assert!(record.is_consumed());
        assert!(!record.consume());
        assert!(record.is_consumed());
    }

    #[test]
    fn test_encoded_shape() {
        let record = KeyRecord::new("k1", TxId::new("tx1"));
        let bytes = record.encode().unwrap();
        assert_eq!(
            std::str::from_utf8(&bytes).unwrap(),
            r#"{"consumed":false,"txID":"tx1","imageURL":""}"#
        );
    }

    #[test]
    fn test_decode_keeps_attachment_and_origin() {
        let record = KeyRecord::decode(
            "p",
            br#"{"consumed":true,"txID":"abc","imageURL":"img://1"}"#,
        )
        .unwrap();
        assert_eq!(record.key(), "p");
        assert!(record.is_consumed());
        assert_eq!(record.origin_tx_id(), "abc");
        assert_eq!(record.attachment_ref(), Some("img://1"));
    }

    #[test]
    fn test_decode_empty_attachment_is_absent() {
        let record = KeyRecord::decode("q", br#"{"consumed":false,"txID":"t","imageURL":""}"#).unwrap();
        assert_eq!(record.attachment_ref(), None);
    }

    #[test]
    fn test_decode_tolerates_missing_and_null_fields() {
        let record = KeyRecord::decode("q", br#"{"txID":"t","imageURL":null,"extra":1}"#).unwrap();
        assert!(!record.is_consumed());
        assert_eq!(record.origin_tx_id(), "t");
        assert_eq!(record.attachment_ref(), None);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            KeyRecord::decode("bad", b"not json"),
            Err(CodecError::Malformed(_))
        ));
        assert!(KeyRecord::decode("bad", b"[]").is_err());
        assert!(KeyRecord::decode("bad", br#"{"consumed":"yes"}"#).is_err());
        assert!(KeyRecord::decode("bad", br#"{"TxID":7}"#).is_err());
    }

    #[test]
    fn test_decode_matches_field_names_case_insensitively() {
        let record = KeyRecord::decode(
            "cap",
            br#"{"Consumed":true,"TxID":"old","ImageURL":"img://legacy"}"#,
        )
        .unwrap();
        assert!(record.is_consumed());
        assert_eq!(record.origin_tx_id(), "old");
        assert_eq!(record.attachment_ref(), Some("img://legacy"));
    }

    #[test]
    fn test_decode_prefers_exact_field_name() {
        let record = KeyRecord::decode("k", br#"{"TXID":"folded","txID":"exact"}"#).unwrap();
        assert_eq!(record.origin_tx_id(), "exact");
    }

    #[test]
    fn test_decode_bare_null_is_zero_record() {
        let record = KeyRecord::decode("n", b"null").unwrap();
        assert!(!record.is_consumed());
        assert_eq!(record.origin_tx_id(), "");
        assert_eq!(record.attachment_ref(), None);
    }

    #[test]
    fn test_empty_attachment_normalized() {
        let record = KeyRecord::with_attachment("p", TxId::new("t"), "");
        assert_eq!(record.attachment_ref(), None);
    }

    #[test]
    fn test_consume_preserves_write_once_fields() {
        let mut record = KeyRecord::with_attachment("p", TxId::new("t0"), "img://1");
        record.consume();
        let back = KeyRecord::decode("p", &record.encode().unwrap()).unwrap();
        assert_eq!(back.origin_tx_id(), "t0");
        assert_eq!(back.attachment_ref(), Some("img://1"));
        assert!(back.is_consumed());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
                let _ = KeyRecord::decode("k", &bytes);
            }

            #[test]
            fn stored_form_preserves_fields(
                tx in "[a-f0-9]{0,64}",
                url in "\\PC{0,20}",
                consumed in any::<bool>(),
            ) {
                let mut record = KeyRecord::with_attachment("k", TxId::new(tx.clone()), url.clone());
                if consumed {
                    record.consume();
                }
                let back = KeyRecord::decode("k", &record.encode().unwrap()).unwrap();
                prop_assert_eq!(back, record);
            }
        }
    }
}
