//! The ordered, sorted, locked collection of admitted transactions
//! (spec.md §4.3). This is the heart of the mempool: per-sender nonce
//! monotonicity interleaved with global fee-rate ranking, replace-by-fee,
//! TTL eviction, and the deferred-cache drain.

use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::errors::{KeeperError, ProtocolError};
use crate::events::{Event, EventBus};
use crate::mempool::deferred_cache::{CacheError, DeferredCache};
use crate::mempool::nonce_index::{NonceInfo, SenderNonces};
use crate::tx::{TxEnvelope, TxRef};

/// Wraps a transaction with its precomputed fee-rate and admission time.
#[derive(Clone)]
pub struct ContainerItem {
    pub tx: TxRef,
    pub fee_rate: f64,
    pub time_added: Instant,
}

impl ContainerItem {
    fn new(tx: TxRef) -> Self {
        let economy_size = tx.economy_size().max(1) as f64;
        let fee_rate = tx.fee() as f64 / economy_size;
        Self { tx, fee_rate, time_added: Instant::now() }
    }
}

/// Orders two items per spec.md §4.3: same sender means strictly
/// increasing nonce; otherwise strictly decreasing fee-rate (higher
/// fee-rate sorts earlier). Ties fall through to the underlying stable
/// sort.
fn item_order(a: &ContainerItem, b: &ContainerItem) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    if a.tx.sender() == b.tx.sender() {
        a.tx.nonce().cmp(&b.tx.nonce())
    } else {
        b.fee_rate.total_cmp(&a.fee_rate)
    }
}

struct State {
    items: Vec<ContainerItem>,
    hash_index: std::collections::HashSet<String>,
    nonces: SenderNonces,
    economy_size_total: usize,
}

impl State {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            hash_index: std::collections::HashSet::new(),
            nonces: SenderNonces::new(),
            economy_size_total: 0,
        }
    }
}

/// Constructor configuration for a `Container`, grounded on spec.md §4.3's
/// configuration list. `nonce_getter` is passed as a closure parameter
/// (not a held reference to a parent object) per spec.md §9's cyclic
/// reference note.
pub struct ContainerConfig {
    pub cap: usize,
    pub sender_tx_limit: usize,
    pub tx_ttl: Duration,
    pub no_sorting: bool,
    pub deferred_cache_capacity: usize,
}

pub struct Container {
    state: RwLock<State>,
    cache: DeferredCache,
    config: ContainerConfig,
    nonce_getter: Box<dyn Fn(&str) -> Result<u64, KeeperError> + Send + Sync>,
    events: EventBus,
}

impl Container {
    pub fn new(
        config: ContainerConfig,
        nonce_getter: Box<dyn Fn(&str) -> Result<u64, KeeperError> + Send + Sync>,
        events: EventBus,
    ) -> Self {
        let cache = DeferredCache::new(config.deferred_cache_capacity, config.tx_ttl);
        Self { state: RwLock::new(State::new()), cache, config, nonce_getter, events }
    }

    fn current_nonce_or_zero(&self, sender: &str) -> Result<u64, ProtocolError> {
        match (self.nonce_getter)(sender) {
            Ok(n) => Ok(n),
            Err(KeeperError::AccountUnknown) => Ok(0),
            Err(e) => Err(ProtocolError::Keeper(e)),
        }
    }

    /// spec.md §4.3's 11-step `Add` contract. Returns `Ok(true)` if
    /// admitted directly, `Ok(false)` if deferred to the cache.
    pub fn add(&self, tx: TxRef) -> Result<bool, ProtocolError> {
        let sender = tx.sender().to_string();
        let nonce = tx.nonce();
        let item = ContainerItem::new(tx.clone());

        // Step 1: exact duplicate by hash.
        {
            let state = self.state.read().unwrap();
            if state.hash_index.contains(&item.tx.hash()) {
                return Err(ProtocolError::TxAlreadyAdded);
            }
        }

        // Steps 2-4: existing NonceInfo / RBF arbitration.
        let mut replace_hash: Option<String> = None;
        {
            let state = self.state.read().unwrap();
            if let Some(existing) = state.nonces.get_info(&sender, nonce) {
                if existing.fee >= item.tx.fee() {
                    return Err(ProtocolError::FailedReplaceByFee);
                }
                replace_hash = Some(existing.tx_hash);
            }
        }

        {
            let mut state = self.state.write().unwrap();
            if let Some(old_hash) = &replace_hash {
                remove_item_locked(&mut state, old_hash);
            }

            // Step 5: per-sender quota, admitted + cached.
            let admitted_for_sender = state.nonces.count_for(&sender);
            let cached_for_sender = self.cache.size_by_addr(&sender);
            if admitted_for_sender + cached_for_sender == self.config.sender_tx_limit {
                return Err(ProtocolError::SenderTxLimitReached);
            }

            // Step 6: container-wide capacity.
            if state.items.len() == self.config.cap {
                return Err(ProtocolError::ContainerFull);
            }

            // Steps 7-8: current on-chain nonce vs tx nonce.
            let current_nonce = self.current_nonce_or_zero(&sender)?;
            if current_nonce >= nonce {
                return Err(ProtocolError::StaleNonce);
            }

            // Step 9: nonce-gap deferral.
            if nonce - current_nonce > 1 && !state.nonces.has(&sender, nonce - 1) {
                drop(state);
                match self.cache.add(tx) {
                    Ok(()) => return Ok(false),
                    Err(CacheError::Duplicate) => return Err(ProtocolError::CacheDuplicate),
                    Err(CacheError::AgedOut) => return Err(ProtocolError::CacheAgedOut),
                }
            }

            // Step 10: admit.
            state.nonces.add(
                &sender,
                nonce,
                NonceInfo { tx_hash: item.tx.hash(), fee: item.tx.fee() },
            );
            state.hash_index.insert(item.tx.hash());
            state.economy_size_total += item.tx.economy_size();
            state.items.push(item.clone());
            if !self.config.no_sorting {
                state.items.sort_by(item_order);
            }
            sweep_ttl_locked(&mut state, self.config.tx_ttl, &self.events);
        }

        self.events.publish(Event::MempoolTxAdded { hash: item.tx.hash() });
        self.drain_cache();
        Ok(true)
    }

    /// Iteratively pops the cache head and re-attempts admission. Runs
    /// after the write lock from `add` above has been released, so it
    /// never re-enters a lock it already holds.
    fn drain_cache(&self) {
        while let Some(tx) = self.cache.get() {
            let hash = tx.hash();
            match self.add(tx) {
                Ok(true) => self.events.publish(Event::MempoolBroadcastTx { hash }),
                Ok(false) => {}
                Err(e) => {
                    self.events.publish(Event::MempoolTxRejected { hash, reason: e.to_string() });
                    break;
                }
            }
        }
    }

    /// Pops the front (lowest order) item.
    pub fn first(&self) -> Option<TxRef> {
        let mut state = self.state.write().unwrap();
        if state.items.is_empty() {
            return None;
        }
        let item = state.items.remove(0);
        unindex_locked(&mut state, &item);
        Some(item.tx)
    }

    /// Pops the back (highest order) item.
    pub fn last(&self) -> Option<TxRef> {
        let mut state = self.state.write().unwrap();
        let item = state.items.pop()?;
        unindex_locked(&mut state, &item);
        Some(item.tx)
    }

    /// Removes every admitted tx whose hash is in `hashes`.
    pub fn remove(&self, hashes: &std::collections::HashSet<String>) {
        let mut state = self.state.write().unwrap();
        let mut i = 0;
        while i < state.items.len() {
            if hashes.contains(&state.items[i].tx.hash()) {
                let item = state.items.remove(i);
                unindex_locked(&mut state, &item);
                self.events.publish(Event::MempoolTxRemoved { hash: item.tx.hash() });
            } else {
                i += 1;
            }
        }
    }

    /// Drops every admitted item whose TTL has expired. Collects expired
    /// hashes under a read lock, releases it, then removes under a single
    /// write-lock acquisition — per spec.md §9's resolved open question,
    /// never calling a write-locking helper while a read lock is held.
    pub fn clean(&self) {
        let expired: Vec<String> = {
            let state = self.state.read().unwrap();
            let now = Instant::now();
            state
                .items
                .iter()
                .filter(|i| now.duration_since(i.time_added) > self.config.tx_ttl)
                .map(|i| i.tx.hash())
                .collect()
        };
        if expired.is_empty() {
            return;
        }
        let set: std::collections::HashSet<String> = expired.into_iter().collect();
        self.remove(&set);
    }

    pub fn sort(&self) {
        let mut state = self.state.write().unwrap();
        state.items.sort_by(item_order);
    }

    pub fn flush(&self) {
        let mut state = self.state.write().unwrap();
        state.items.clear();
        state.hash_index.clear();
        state.nonces = SenderNonces::new();
        state.economy_size_total = 0;
    }

    pub fn byte_size(&self) -> usize {
        self.state.read().unwrap().economy_size_total
    }

    pub fn size(&self) -> usize {
        self.state.read().unwrap().items.len()
    }

    pub fn has_by_hash(&self, hash: &str) -> bool {
        self.state.read().unwrap().hash_index.contains(hash)
    }

    pub fn has(&self, tx: &dyn crate::tx::TxEnvelope) -> bool {
        let state = self.state.read().unwrap();
        state.nonces.has(tx.sender(), tx.nonce()) || self.cache.has(tx.sender(), tx.nonce())
    }

    pub fn get(&self, index: usize) -> Option<TxRef> {
        self.state.read().unwrap().items.get(index).map(|i| i.tx.clone())
    }

    pub fn get_by_hash(&self, hash: &str) -> Option<TxRef> {
        self.state
            .read()
            .unwrap()
            .items
            .iter()
            .find(|i| i.tx.hash() == hash)
            .map(|i| i.tx.clone())
    }

    pub fn fee_rate_by_hash(&self, hash: &str) -> Option<f64> {
        self.state.read().unwrap().items.iter().find(|i| i.tx.hash() == hash).map(|i| i.fee_rate)
    }

    pub fn size_by_addr(&self, sender: &str) -> usize {
        let state = self.state.read().unwrap();
        state.nonces.count_for(sender) + self.cache.size_by_addr(sender)
    }

    /// Snapshot of admitted items in current order, front to back. Used by
    /// `Mempool::reap`, which must pop under a held lock one at a time
    /// (see `mempool::adapter`) but needs a stable read first for
    /// byte-budget accounting tests.
    pub fn snapshot(&self) -> Vec<TxRef> {
        self.state.read().unwrap().items.iter().map(|i| i.tx.clone()).collect()
    }
}

fn remove_item_locked(state: &mut State, hash: &str) {
    if let Some(pos) = state.items.iter().position(|i| i.tx.hash() == hash) {
        let item = state.items.remove(pos);
        unindex_locked(state, &item);
    }
}

fn unindex_locked(state: &mut State, item: &ContainerItem) {
    state.hash_index.remove(&item.tx.hash());
    state.nonces.remove(item.tx.sender(), item.tx.nonce());
    state.economy_size_total = state.economy_size_total.saturating_sub(item.tx.economy_size());
}

fn sweep_ttl_locked(state: &mut State, ttl: Duration, events: &EventBus) {
    let now = Instant::now();
    let expired: Vec<usize> = state
        .items
        .iter()
        .enumerate()
        .filter(|(_, i)| now.duration_since(i.time_added) > ttl)
        .map(|(idx, _)| idx)
        .collect();
    for idx in expired.into_iter().rev() {
        let item = state.items.remove(idx);
        unindex_locked(state, &item);
        events.publish(Event::MempoolTxRemoved { hash: item.tx.hash() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::{SignedTx, TxPayload};
    use std::sync::Arc;

    fn tx_with_fee(sender: &str, nonce: u64, fee: u128) -> TxRef {
        Arc::new(SignedTx::new(
            TxPayload::CoinTransfer { to: "bob".into(), value: 1 },
            sender,
            nonce,
            fee,
            1,
            vec![1, 2, 3],
        ))
    }

    fn container(cap: usize) -> Container {
        Container::new(
            ContainerConfig {
                cap,
                sender_tx_limit: 64,
                tx_ttl: Duration::from_secs(3600),
                no_sorting: false,
                deferred_cache_capacity: 1024,
            },
            Box::new(|_addr| Err(KeeperError::AccountUnknown)),
            EventBus::new(),
        )
    }

    #[test]
    fn simple_admit() {
        let c = container(10);
        assert!(c.add(tx_with_fee("s1", 1, 100)).unwrap());
        assert_eq!(c.size(), 1);
        assert_eq!(c.first().unwrap().sender(), "s1");
    }

    #[test]
    fn fee_rate_ordering_across_senders() {
        let c = container(10);
        c.add(tx_with_fee("s1", 1, 2)).unwrap();
        c.add(tx_with_fee("s2", 1, 100)).unwrap();
        assert_eq!(c.get(0).unwrap().sender(), "s2");
    }

    #[test]
    fn intra_sender_nonce_beats_fee() {
        let c = container(10);
        c.add(tx_with_fee("s1", 1, 2)).unwrap();
        c.add(tx_with_fee("s1", 2, 100)).unwrap();
        assert_eq!(c.get(0).unwrap().nonce(), 1);
    }

    #[test]
    fn rbf_requires_strictly_higher_fee() {
        let c = container(10);
        c.add(tx_with_fee("s1", 1, 100)).unwrap();
        let err = c.add(tx_with_fee("s1", 1, 100)).unwrap_err();
        assert_eq!(err, ProtocolError::FailedReplaceByFee);
        assert!(c.add(tx_with_fee("s1", 1, 150)).unwrap());
        assert_eq!(c.size(), 1);
    }

    #[test]
    fn nonce_gap_defers_then_drains() {
        let c = container(10);
        // current nonce 0, so nonce 1 is next expected.
        assert!(!c.add(tx_with_fee("s1", 3, 10)).unwrap());
        assert_eq!(c.size(), 0);
        assert!(c.add(tx_with_fee("s1", 1, 10)).unwrap());
        // n3's predecessor (n2) still missing.
        assert_eq!(c.size(), 1);
        assert!(c.add(tx_with_fee("s1", 2, 10)).unwrap());
        assert_eq!(c.size(), 3);
        assert_eq!(c.get(0).unwrap().nonce(), 1);
        assert_eq!(c.get(2).unwrap().nonce(), 3);
    }

    #[test]
    fn container_full_rejects() {
        let c = container(1);
        c.add(tx_with_fee("s1", 1, 10)).unwrap();
        let err = c.add(tx_with_fee("s2", 1, 10)).unwrap_err();
        assert_eq!(err, ProtocolError::ContainerFull);
        assert_eq!(c.size(), 1);
    }

    #[test]
    fn sender_quota_rejects_another_tx_from_same_sender() {
        let c = Container::new(
            ContainerConfig {
                cap: 100,
                sender_tx_limit: 1,
                tx_ttl: Duration::from_secs(3600),
                no_sorting: false,
                deferred_cache_capacity: 1024,
            },
            Box::new(|_| Err(KeeperError::AccountUnknown)),
            EventBus::new(),
        );
        c.add(tx_with_fee("s1", 1, 10)).unwrap();
        let err = c.add(tx_with_fee("s1", 2, 10)).unwrap_err();
        assert_eq!(err, ProtocolError::SenderTxLimitReached);
        assert!(c.add(tx_with_fee("s2", 1, 10)).unwrap());
    }

    #[test]
    fn stale_nonce_rejected() {
        let c = Container::new(
            ContainerConfig {
                cap: 10,
                sender_tx_limit: 64,
                tx_ttl: Duration::from_secs(3600),
                no_sorting: false,
                deferred_cache_capacity: 1024,
            },
            Box::new(|_| Ok(5)),
            EventBus::new(),
        );
        let err = c.add(tx_with_fee("s1", 5, 10)).unwrap_err();
        assert_eq!(err, ProtocolError::StaleNonce);
    }

    #[test]
    fn ttl_sweep_removes_aged_items() {
        let c = Container::new(
            ContainerConfig {
                cap: 10,
                sender_tx_limit: 64,
                tx_ttl: Duration::from_millis(3),
                no_sorting: false,
                deferred_cache_capacity: 1024,
            },
            Box::new(|_| Err(KeeperError::AccountUnknown)),
            EventBus::new(),
        );
        c.add(tx_with_fee("s1", 1, 10)).unwrap();
        std::thread::sleep(Duration::from_millis(5));
        c.clean();
        assert_eq!(c.size(), 0);
    }

    #[test]
    fn byte_size_equals_sum_of_economy_sizes() {
        let c = container(10);
        let t1 = tx_with_fee("s1", 1, 10);
        let t2 = tx_with_fee("s2", 1, 20);
        let expected = t1.economy_size() + t2.economy_size();
        c.add(t1).unwrap();
        c.add(t2).unwrap();
        assert_eq!(c.byte_size(), expected);
    }
}
