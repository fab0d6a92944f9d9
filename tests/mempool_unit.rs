//! Container/Pool-level integration tests exercised through the public
//! crate API (no consensus adapter involved).

use forge_mempool::errors::{KeeperError, ProtocolError};
use forge_mempool::events::EventBus;
use forge_mempool::mempool::{Container, ContainerConfig, Pool, PoolConfig};
use forge_mempool::tx::{SignedTx, TxEnvelope, TxPayload, TxRef};
use std::sync::Arc;
use std::time::Duration;

fn tx(sender: &str, nonce: u64, fee: u128) -> TxRef {
    Arc::new(SignedTx::new(
        TxPayload::CoinTransfer { to: "bob".into(), value: 1 },
        sender,
        nonce,
        fee,
        1,
        vec![4, 5, 6],
    ))
}

fn pool_with_cap(cap: usize, sender_tx_limit: usize) -> Pool {
    Pool::new(
        PoolConfig {
            cap,
            sender_tx_limit,
            tx_ttl: Duration::from_secs(3600),
            no_sorting: false,
            deferred_cache_capacity: 1024,
        },
        Box::new(|_| Err(KeeperError::AccountUnknown)),
        EventBus::new(),
    )
}

#[test]
fn admits_and_reports_size_and_bytes() {
    let pool = pool_with_cap(10, 64);
    assert!(pool.add(tx("alice", 1, 10)).unwrap());
    assert_eq!(pool.size(), 1);
    assert!(pool.byte_size() > 0);
}

#[test]
fn duplicate_hash_is_rejected_by_pool_before_container() {
    let pool = pool_with_cap(10, 64);
    let t = tx("alice", 1, 10);
    pool.add(t.clone()).unwrap();
    let err = pool.add(t).unwrap_err();
    assert_eq!(err, ProtocolError::TxAlreadyAdded);
}

#[test]
fn cross_sender_ordering_is_fee_rate_descending() {
    let pool = pool_with_cap(10, 64);
    pool.add(tx("low", 1, 1)).unwrap();
    pool.add(tx("high", 1, 1_000_000)).unwrap();
    let snapshot = pool.snapshot();
    assert_eq!(snapshot[0].sender(), "high");
    assert_eq!(snapshot[1].sender(), "low");
}

#[test]
fn same_sender_ordering_is_nonce_ascending_regardless_of_fee() {
    let pool = pool_with_cap(10, 64);
    pool.add(tx("alice", 2, 1_000_000)).unwrap();
    pool.add(tx("alice", 1, 1)).unwrap();
    let snapshot = pool.snapshot();
    assert_eq!(snapshot[0].nonce(), 1);
    assert_eq!(snapshot[1].nonce(), 2);
}

#[test]
fn container_full_rejects_new_sender() {
    let container = Container::new(
        ContainerConfig {
            cap: 1,
            sender_tx_limit: 64,
            tx_ttl: Duration::from_secs(3600),
            no_sorting: false,
            deferred_cache_capacity: 16,
        },
        Box::new(|_| Err(KeeperError::AccountUnknown)),
        EventBus::new(),
    );
    container.add(tx("a", 1, 10)).unwrap();
    let err = container.add(tx("b", 1, 10)).unwrap_err();
    assert_eq!(err, ProtocolError::ContainerFull);
}

#[test]
fn nonce_gap_is_deferred_and_promoted_on_predecessor_arrival() {
    let pool = pool_with_cap(10, 64);
    assert!(!pool.add(tx("alice", 2, 10)).unwrap());
    assert_eq!(pool.size(), 0);
    assert!(pool.add(tx("alice", 1, 10)).unwrap());
    assert_eq!(pool.size(), 2);
}
