//! Transaction id generation for the reference hosts.

use std::sync::atomic::{AtomicU64, Ordering};

/// Produces unique 64-character lowercase hex transaction ids.
///
/// Each id is `blake3(nonce || counter)`, with a random per-generator nonce
/// so that ids from two stores never collide.
pub struct TxIdGenerator {
    nonce: [u8; 32],
    counter: AtomicU64,
}

impl TxIdGenerator {
    pub fn new() -> Self {
        Self::with_nonce(rand::random())
    }

    /// Deterministic generator, for reproducible tests.
    pub fn with_nonce(nonce: [u8; 32]) -> Self {
        Self {
            nonce,
            counter: AtomicU64::new(0),
        }
    }

    pub fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.nonce);
        hasher.update(&n.to_le_bytes());
        hex::encode(hasher.finalize().as_bytes())
    }
}

impl Default for TxIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
