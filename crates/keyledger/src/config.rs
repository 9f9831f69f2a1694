//! Contract configuration.

use keyledger_core::KeyPolicy;
use serde::{Deserialize, Serialize};

/// Configuration for the [`KeyContract`](crate::KeyContract).
///
/// The defaults reproduce the ledger's historical behavior: every key is
/// accepted and bulk requests are unbounded. Hosts can load this from JSON;
/// missing fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Which keys creation operations accept.
    pub key_policy: KeyPolicy,
    /// Largest accepted `CreateBulkKeys` request, if any.
    pub max_bulk_keys: Option<usize>,
}

impl ContractConfig {
    /// Strict key validation, no bulk limit.
    pub fn strict() -> Self {
        Self {
            key_policy: KeyPolicy::Strict,
            ..Self::default()
        }
    }

    pub fn with_max_bulk_keys(mut self, max: usize) -> Self {
        self.max_bulk_keys = Some(max);
        self
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
