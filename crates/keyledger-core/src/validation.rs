//! Key acceptance policy.
//!
//! Ledger deployments have historically accepted any string as a key, so the
//! default policy is [`KeyPolicy::Permissive`]. [`KeyPolicy::Strict`] rejects
//! keys that are empty, oversized, collide with the composite-key namespace, or
//! contain control characters.

use serde::{Deserialize, Serialize};

use crate::error::KeyViolation;

/// Maximum key length in bytes under the strict policy.
pub const MAX_KEY_LEN: usize = 1024;

/// Which keys the contract accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPolicy {
    /// Accept every string, including the empty string.
    #[default]
    Permissive,
    /// Reject empty, oversized, reserved, or control-character keys.
    Strict,
}

impl KeyPolicy {
    /// Check a key against this policy.
    pub fn check(self, key: &str) -> Result<(), KeyViolation> {
        match self {
            KeyPolicy::Permissive => Ok(()),
            KeyPolicy::Strict => check_strict(key),
        }
    }
}

fn check_strict(key: &str) -> Result<(), KeyViolation> {
    if key.is_empty() {
        return Err(KeyViolation::Empty);
    }
    if key.len() > MAX_KEY_LEN {
        return Err(KeyViolation::TooLong {
            len: key.len(),
            max: MAX_KEY_LEN,
        });
    }
    if key.starts_with('\u{0}') {
        return Err(KeyViolation::ReservedPrefix);
    }
    if let Some((idx, _)) = key.char_indices().find(|(_, c)| c.is_control()) {
        return Err(KeyViolation::ControlCharacter(idx));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissive_accepts_anything() {
        let policy = KeyPolicy::default();
        assert_eq!(policy, KeyPolicy::Permissive);
        assert!(policy.check("").is_ok());
        assert!(policy.check("\u{0}weird\n").is_ok());
    }

    #[test]
    fn test_strict_accepts_ordinary_keys() {
        assert!(KeyPolicy::Strict.check("11223344556688").is_ok());
        assert!(KeyPolicy::Strict.check("img/key-01").is_ok());
    }

    #[test]
    fn test_strict_rejections() {
        let strict = KeyPolicy::Strict;
        assert_eq!(strict.check(""), Err(KeyViolation::Empty));
        assert_eq!(strict.check("\u{0}ns\u{0}k"), Err(KeyViolation::ReservedPrefix));
        assert_eq!(strict.check("ab\tc"), Err(KeyViolation::ControlCharacter(2)));

        let long = "x".repeat(MAX_KEY_LEN + 1);
        assert_eq!(
            strict.check(&long),
            Err(KeyViolation::TooLong {
                len: MAX_KEY_LEN + 1,
                max: MAX_KEY_LEN
            })
        );
    }

    #[test]
    fn test_policy_deserializes_from_snake_case() {
        let policy: KeyPolicy = serde_json::from_str("\"strict\"").unwrap();
        assert_eq!(policy, KeyPolicy::Strict);
    }
}
