//! `Pool` is the thin duplicate/capacity façade spec.md §4.4 describes:
//! it owns a `Container` and nothing else, translating the consensus
//! adapter's calls into container operations without its own locking.

use crate::errors::{KeeperError, ProtocolError};
use crate::events::EventBus;
use crate::mempool::container::{Container, ContainerConfig};
use crate::tx::{TxEnvelope, TxRef};
use std::time::Duration;

pub struct PoolConfig {
    pub cap: usize,
    pub sender_tx_limit: usize,
    pub tx_ttl: Duration,
    pub no_sorting: bool,
    pub deferred_cache_capacity: usize,
}

pub struct Pool {
    container: Container,
}

impl Pool {
    pub fn new(
        config: PoolConfig,
        nonce_getter: Box<dyn Fn(&str) -> Result<u64, KeeperError> + Send + Sync>,
        events: EventBus,
    ) -> Self {
        let container = Container::new(
            ContainerConfig {
                cap: config.cap,
                sender_tx_limit: config.sender_tx_limit,
                tx_ttl: config.tx_ttl,
                no_sorting: config.no_sorting,
                deferred_cache_capacity: config.deferred_cache_capacity,
            },
            nonce_getter,
            events,
        );
        Self { container }
    }

    /// Rejects an exact duplicate before handing off to the Container, per
    /// spec.md §4.4 — duplicate detection is intentionally redundant with
    /// the Container's own hash-index check (spec.md §9).
    pub fn add(&self, tx: TxRef) -> Result<bool, ProtocolError> {
        if self.container.has_by_hash(&tx.hash()) {
            return Err(ProtocolError::TxAlreadyAdded);
        }
        self.container.add(tx)
    }

    pub fn first(&self) -> Option<TxRef> {
        self.container.first()
    }

    pub fn last(&self) -> Option<TxRef> {
        self.container.last()
    }

    pub fn remove(&self, hashes: &std::collections::HashSet<String>) {
        self.container.remove(hashes)
    }

    pub fn clean(&self) {
        self.container.clean()
    }

    pub fn flush(&self) {
        self.container.flush()
    }

    pub fn size(&self) -> usize {
        self.container.size()
    }

    pub fn byte_size(&self) -> usize {
        self.container.byte_size()
    }

    pub fn has(&self, tx: &dyn crate::tx::TxEnvelope) -> bool {
        self.container.has(tx)
    }

    pub fn has_by_hash(&self, hash: &str) -> bool {
        self.container.has_by_hash(hash)
    }

    pub fn get_by_hash(&self, hash: &str) -> Option<TxRef> {
        self.container.get_by_hash(hash)
    }

    pub fn size_by_addr(&self, sender: &str) -> usize {
        self.container.size_by_addr(sender)
    }

    pub fn snapshot(&self) -> Vec<TxRef> {
        self.container.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::{SignedTx, TxPayload};
    use std::sync::Arc;

    fn tx(sender: &str, nonce: u64, fee: u128) -> TxRef {
        Arc::new(SignedTx::new(
            TxPayload::CoinTransfer { to: "bob".into(), value: 1 },
            sender,
            nonce,
            fee,
            1,
            vec![1, 2, 3],
        ))
    }

    fn pool() -> Pool {
        Pool::new(
            PoolConfig {
                cap: 10,
                sender_tx_limit: 64,
                tx_ttl: Duration::from_secs(3600),
                no_sorting: false,
                deferred_cache_capacity: 1024,
            },
            Box::new(|_| Err(KeeperError::AccountUnknown)),
            EventBus::new(),
        )
    }

    #[test]
    fn rejects_exact_duplicate_before_container() {
        let p = pool();
        let t = tx("s1", 1, 10);
        assert!(p.add(t.clone()).unwrap());
        let err = p.add(t).unwrap_err();
        assert_eq!(err, ProtocolError::TxAlreadyAdded);
    }

    #[test]
    fn size_and_byte_size_track_container() {
        let p = pool();
        p.add(tx("s1", 1, 10)).unwrap();
        assert_eq!(p.size(), 1);
        assert!(p.byte_size() > 0);
    }
}
