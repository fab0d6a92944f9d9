//! Per-sender nonce bookkeeping for the admitted set (spec.md §4.1).
//!
//! `SenderNonces` is the admission-side mirror of "which (sender, nonce)
//! pairs are currently in the pool, and at what fee". It is intentionally
//! not thread-safe on its own — `Container` holds the single RW lock that
//! guards it alongside the ordered sequence and hash index.

use std::collections::HashMap;

/// `{txHash, fee}` recorded for one admitted (sender, nonce) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonceInfo {
    pub tx_hash: String,
    pub fee: u128,
}

/// nonce -> NonceInfo, for a single sender.
pub type NonceCollection = HashMap<u64, NonceInfo>;

/// sender address -> NonceCollection. A sender with zero nonces is never
/// represented (the entry is deleted), per spec.md §3's SenderNonces
/// invariant.
#[derive(Debug, Default)]
pub struct SenderNonces {
    by_sender: HashMap<String, NonceCollection>,
}

impl SenderNonces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty collection if the sender is absent; does not insert.
    pub fn get(&self, addr: &str) -> NonceCollection {
        self.by_sender.get(addr).cloned().unwrap_or_default()
    }

    pub fn add(&mut self, addr: &str, nonce: u64, info: NonceInfo) {
        self.by_sender
            .entry(addr.to_string())
            .or_default()
            .insert(nonce, info);
    }

    pub fn has(&self, addr: &str, nonce: u64) -> bool {
        self.by_sender
            .get(addr)
            .map(|c| c.contains_key(&nonce))
            .unwrap_or(false)
    }

    pub fn get_info(&self, addr: &str, nonce: u64) -> Option<NonceInfo> {
        self.by_sender.get(addr).and_then(|c| c.get(&nonce)).cloned()
    }

    /// Deletes the nonce; if the sender has no remaining nonces, deletes
    /// the sender entry too.
    pub fn remove(&mut self, addr: &str, nonce: u64) {
        if let Some(collection) = self.by_sender.get_mut(addr) {
            collection.remove(&nonce);
            if collection.is_empty() {
                self.by_sender.remove(addr);
            }
        }
    }

    pub fn count_for(&self, addr: &str) -> usize {
        self.by_sender.get(addr).map(|c| c.len()).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.by_sender.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_sender.is_empty()
    }
}
