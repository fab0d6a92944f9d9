//! Replace-by-fee and TTL-sweep behavior, exercised through the public
//! Container API.

use forge_mempool::errors::{KeeperError, ProtocolError};
use forge_mempool::events::EventBus;
use forge_mempool::mempool::{Container, ContainerConfig};
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
        vec![9, 9, 9],
    ))
}

fn container(ttl: Duration) -> Container {
    Container::new(
        ContainerConfig {
            cap: 50,
            sender_tx_limit: 64,
            tx_ttl: ttl,
            no_sorting: false,
            deferred_cache_capacity: 1024,
        },
        Box::new(|_| Err(KeeperError::AccountUnknown)),
        EventBus::new(),
    )
}

#[test]
fn equal_fee_replacement_is_rejected() {
    let c = container(Duration::from_secs(3600));
    c.add(tx("alice", 1, 100)).unwrap();
    let err = c.add(tx("alice", 1, 100)).unwrap_err();
    assert_eq!(err, ProtocolError::FailedReplaceByFee);
}

#[test]
fn higher_fee_replacement_swaps_the_hash_in_place() {
    let c = container(Duration::from_secs(3600));
    let low = tx("alice", 1, 100);
    let low_hash = low.hash();
    c.add(low).unwrap();
    let high = tx("alice", 1, 200);
    let high_hash = high.hash();
    assert!(c.add(high).unwrap());
    assert_eq!(c.size(), 1);
    assert!(!c.has_by_hash(&low_hash));
    assert!(c.has_by_hash(&high_hash));
}

#[test]
fn ttl_sweep_on_admission_drops_aged_siblings() {
    let c = container(Duration::from_millis(5));
    c.add(tx("alice", 1, 10)).unwrap();
    std::thread::sleep(Duration::from_millis(10));
    // Admitting a second, unrelated tx triggers the in-admission TTL sweep
    // (spec.md §4.3 step 11), which should drop the now-expired first tx.
    c.add(tx("bob", 1, 10)).unwrap();
    assert_eq!(c.size(), 1);
}

#[test]
fn explicit_clean_call_sweeps_without_a_new_admission() {
    let c = container(Duration::from_millis(5));
    c.add(tx("alice", 1, 10)).unwrap();
    std::thread::sleep(Duration::from_millis(10));
    c.clean();
    assert_eq!(c.size(), 0);
}
