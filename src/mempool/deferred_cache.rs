//! FIFO-bounded holding area for txs whose nonce is ahead of the sender's
//! next expected nonce (spec.md §4.2).
//!
//! A tx parked here cannot yet be admitted because its predecessor hasn't
//! arrived. `Container::add` drains the cache after every successful
//! admission so a closing gap promotes everything behind it.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::tx::{TxEnvelope, TxRef};
use thiserror::Error;

/// Recommended depth per spec.md §4.2.
pub const DEFAULT_CAPACITY: usize = 10_000;

struct Inner {
    fifo: VecDeque<TxRef>,
    /// sender -> nonce -> hash, mirrors the FIFO for O(1) (sender, nonce)
    /// membership and per-sender counts.
    by_sender: HashMap<String, HashMap<u64, String>>,
    /// hash -> first-seen instant, bounded to the same capacity as the
    /// FIFO; oldest entries are evicted on overflow.
    first_seen: HashMap<String, Instant>,
    first_seen_order: VecDeque<String>,
}

impl Inner {
    fn new() -> Self {
        Self {
            fifo: VecDeque::new(),
            by_sender: HashMap::new(),
            first_seen: HashMap::new(),
            first_seen_order: VecDeque::new(),
        }
    }

    fn has(&self, sender: &str, nonce: u64) -> bool {
        self.by_sender
            .get(sender)
            .map(|m| m.contains_key(&nonce))
            .unwrap_or(false)
    }

    fn mirror_insert(&mut self, sender: &str, nonce: u64, hash: String) {
        self.by_sender
            .entry(sender.to_string())
            .or_default()
            .insert(nonce, hash);
    }

    fn mirror_remove(&mut self, sender: &str, nonce: u64) {
        if let Some(m) = self.by_sender.get_mut(sender) {
            m.remove(&nonce);
            if m.is_empty() {
                self.by_sender.remove(sender);
            }
        }
    }

    fn note_first_seen(&mut self, hash: &str, now: Instant, capacity: usize) {
        if self.first_seen.contains_key(hash) {
            return;
        }
        self.first_seen.insert(hash.to_string(), now);
        self.first_seen_order.push_back(hash.to_string());
        while self.first_seen_order.len() > capacity {
            if let Some(oldest) = self.first_seen_order.pop_front() {
                self.first_seen.remove(&oldest);
            }
        }
    }

    fn evict_oldest(&mut self) {
        if let Some(tx) = self.fifo.pop_front() {
            self.mirror_remove(tx.sender(), tx.nonce());
        }
    }
}

/// Errors `DeferredCache::add` can return, matching the sentinel wording
/// spec.md §6 lists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("cache already contains a transaction with matching sender and nonce")]
    Duplicate,
    #[error("refused to cache old transaction")]
    AgedOut,
}

pub struct DeferredCache {
    inner: Mutex<Inner>,
    capacity: usize,
    ttl: Duration,
}

impl DeferredCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner::new()),
            capacity,
            ttl,
        }
    }

    /// Appends `tx` iff there is no existing (sender, nonce) entry and the
    /// tx hasn't already aged out of a prior caching attempt.
    pub fn add(&self, tx: TxRef) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut inner = self.inner.lock().unwrap();

        if inner.has(tx.sender(), tx.nonce()) {
            return Err(CacheError::Duplicate);
        }

        if let Some(&seen_at) = inner.first_seen.get(&tx.hash()) {
            if now.duration_since(seen_at) > self.ttl {
                inner.first_seen.remove(&tx.hash());
                inner.first_seen_order.retain(|h| h != &tx.hash());
                return Err(CacheError::AgedOut);
            }
        }

        if inner.fifo.len() >= self.capacity {
            inner.evict_oldest();
        }

        inner.mirror_insert(tx.sender(), tx.nonce(), tx.hash());
        inner.note_first_seen(&tx.hash(), now, self.capacity);
        inner.fifo.push_back(tx);
        Ok(())
    }

    /// Pops the head, non-blocking. Returns `None` if empty.
    pub fn get(&self) -> Option<TxRef> {
        let mut inner = self.inner.lock().unwrap();
        let tx = inner.fifo.pop_front()?;
        inner.mirror_remove(tx.sender(), tx.nonce());
        Some(tx)
    }

    /// (sender, nonce) based, not hash-based.
    pub fn has(&self, sender: &str, nonce: u64) -> bool {
        self.inner.lock().unwrap().has(sender, nonce)
    }

    pub fn size_by_addr(&self, sender: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .by_sender
            .get(sender)
            .map(|m| m.len())
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().fifo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
