//! Proptest generators for property-based testing.

use std::collections::BTreeSet;

use proptest::prelude::*;

/// An ordinary ASCII key.
pub fn key() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,16}".prop_map(String::from)
}

/// A key drawn from arbitrary printable Unicode, to exercise byte ordering.
pub fn unicode_key() -> impl Strategy<Value = String> {
    "\\PC{1,12}".prop_map(String::from)
}

/// Distinct keys, in arbitrary (non-sorted) order.
pub fn distinct_keys(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(unicode_key(), 0..=max)
        .prop_flat_map(|set: BTreeSet<String>| {
            Just(set.into_iter().collect::<Vec<_>>()).prop_shuffle()
        })
}

/// A key list drawn from a tiny alphabet so that duplicates are likely.
pub fn keys_with_duplicates(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-d]{1,2}".prop_map(String::from), 0..=max)
}

/// An attachment reference such as `img://a/b.png`.
pub fn attachment_ref() -> impl Strategy<Value = String> {
    "(img|https?)://[a-z0-9/._-]{1,24}".prop_map(String::from)
}
