//! Consensus-facing adapter (spec.md §4.5). This is the only piece of the
//! mempool module that speaks the engine's vocabulary — `CheckTx`,
//! `ReapMaxBytesMaxGas`, `Lock`/`Unlock`, `Update`, `TxsAvailable` — and the
//! only piece that needs an async mutex, since `Update` and reap run under
//! consensus-driven exclusion rather than plain CPU-bound contention.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify};

use crate::errors::{KeeperError, ProtocolError};
use crate::events::{Event, EventBus};
use crate::keepers::Keepers;
use crate::mempool::pool::{Pool, PoolConfig};
use crate::params::Params;
use crate::tx::{TxEnvelope, TxKind, TxRef};
use crate::validator::TxValidator;

/// The boundary caps `check_tx` enforces before a tx is ever handed to the
/// `Pool`, per spec.md §4.5.
pub struct Mempool {
    pool: Pool,
    validator: TxValidator,
    params: Params,
    /// Guards `reap`/`update`/`lock` against concurrent mutation from the
    /// consensus engine; `check_tx` does not take this, since admission is
    /// meant to proceed concurrently with a held lock per spec.md §5.
    proxy: Mutex<()>,
    events: EventBus,
    notify: Notify,
    kinds_by_hash: std::sync::Mutex<HashMap<String, TxKind>>,
}

impl Mempool {
    pub fn new(params: Params, keepers: Keepers, events: EventBus) -> Self {
        let accounts = keepers.accounts.clone();
        let nonce_getter: Box<dyn Fn(&str) -> Result<u64, KeeperError> + Send + Sync> =
            Box::new(move |addr| accounts.nonce_of(addr));
        let pool = Pool::new(
            PoolConfig {
                cap: params.container_cap,
                sender_tx_limit: params.sender_tx_limit,
                tx_ttl: params.tx_ttl,
                no_sorting: false,
                deferred_cache_capacity: params.deferred_cache_capacity,
            },
            nonce_getter,
            events.clone(),
        );
        let validator = TxValidator::new(keepers, params.clone());
        Self {
            pool,
            validator,
            params,
            proxy: Mutex::new(()),
            events,
            notify: Notify::new(),
            kinds_by_hash: std::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Boundary validation, then full sanity + consistency checks, then
    /// admission into the `Pool`. Mirrors ABCI `CheckTx`'s three-stage
    /// shape: size caps, stateless checks, stateful checks.
    pub fn check_tx(&self, tx: TxRef) -> Result<(), ProtocolError> {
        if tx.wire_size() > self.params.mempool_max_tx_size {
            return Err(ProtocolError::TxTooLarge { max: self.params.mempool_max_tx_size });
        }
        if self.pool.size() >= self.params.mempool_size
            || self.pool.byte_size() + tx.wire_size() > self.params.mempool_max_txs_size
        {
            return Err(ProtocolError::MempoolFull {
                txs: self.pool.size(),
                bytes: self.pool.byte_size(),
            });
        }

        if let Err(errs) = self.validator.validate(tx.as_ref()) {
            let reason = errs.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ");
            self.events.publish(Event::MempoolTxRejected { hash: tx.hash(), reason: reason.clone() });
            return Err(ProtocolError::Other(reason));
        }

        let kind = tx.kind();
        let hash = tx.hash();
        let admitted = self.pool.add(tx)?;
        if admitted {
            self.kinds_by_hash.lock().unwrap().insert(hash, kind);
            self.notify.notify_waiters();
        }
        Ok(())
    }

    /// Reaps up to `max_bytes`/`max_txs`, honoring the per-type ticket
    /// quota from spec.md §4.5 (at most `max_val_tickets_per_block`
    /// `TicketPurchase`/`TicketUnbond` transactions per reap).
    ///
    /// Reaping does not remove txs from the pool — per ABCI semantics a
    /// proposed block may fail to commit, so only `update` (block commit)
    /// drops txs. Calling this twice before a commit can return the same
    /// txs again.
    pub async fn reap_max_bytes_max_gas(&self, max_bytes: usize, max_txs: usize) -> Vec<TxRef> {
        let _guard = self.proxy.lock().await;
        let mut out = Vec::new();
        let mut bytes = 0usize;
        let mut ticket_count = 0usize;

        for tx in self.pool.snapshot() {
            if out.len() >= max_txs || bytes >= max_bytes {
                break;
            }
            let is_ticket = tx.kind().is_ticket_purchase();
            if is_ticket && ticket_count >= self.params.max_val_tickets_per_block {
                continue;
            }
            if bytes + tx.wire_size() > max_bytes {
                continue;
            }
            bytes += tx.wire_size();
            if is_ticket {
                ticket_count += 1;
            }
            out.push(tx);
        }
        out
    }

    /// Called on block commit with each committed tx's hash and ABCI
    /// response code. Removing from the pool (which publishes
    /// `MempoolTxRemoved` for every hash actually removed) happens
    /// regardless of code; `MempoolTxCommitted` only fires for code 0,
    /// since a nonzero code means the tx was included but rejected.
    pub async fn update(&self, committed: &[(String, u32)]) {
        let _guard = self.proxy.lock().await;
        let set: std::collections::HashSet<String> = committed.iter().map(|(hash, _)| hash.clone()).collect();
        self.pool.remove(&set);
        for (hash, code) in committed {
            self.kinds_by_hash.lock().unwrap().remove(hash);
            if *code == 0 {
                self.events.publish(Event::MempoolTxCommitted { hash: hash.clone() });
            }
        }
        self.pool.clean();
    }

    /// Blocks out `check_tx`-driven mutation for the duration the caller
    /// holds the returned guard, matching ABCI's `Lock`/`Unlock` pairing
    /// around block execution.
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.proxy.lock().await
    }

    pub fn size(&self) -> usize {
        self.pool.size()
    }

    pub fn byte_size(&self) -> usize {
        self.pool.byte_size()
    }

    pub fn is_full(&self) -> bool {
        self.pool.size() >= self.params.mempool_size
            || self.pool.byte_size() >= self.params.mempool_max_txs_size
    }

    /// Resolves once a tx is admitted, for callers that want to block until
    /// there is something worth reaping rather than poll.
    pub async fn txs_available(&self, timeout: Duration) -> bool {
        if self.pool.size() > 0 {
            return true;
        }
        tokio::time::timeout(timeout, self.notify.notified()).await.is_ok()
    }

    pub fn events(&self) -> EventBus {
        self.events.clone()
    }
}

pub fn new_shared(params: Params, keepers: Keepers, events: EventBus) -> Arc<Mempool> {
    Arc::new(Mempool::new(params, keepers, events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keepers::testutil::fake_keepers;
    use crate::repo_config::RepoConfig;
    use crate::tx::{SignedTx, TxPayload};
    use ed25519_dalek::{Keypair, SecretKey, Signer};

    /// A well-formed but unsigned tx, good enough for boundary checks
    /// (`check_tx` rejects on size/capacity before it ever reaches the
    /// validator).
    fn tx(sender: &str, nonce: u64, fee: u128) -> TxRef {
        Arc::new(SignedTx::new(
            TxPayload::CoinTransfer { to: "bob".into(), value: 1 },
            sender,
            nonce,
            fee,
            1,
            vec![1; 32],
        ))
    }

    /// A real Ed25519-signed `RepoCreate` tx, timestamped to line up with
    /// `keepers_with_clock`'s fixed current time, which passes both sanity
    /// and consistency against the default (empty) fake keeper state.
    fn signed_repo_create(sender: &str, repo: &str, nonce: u64) -> TxRef {
        let secret = SecretKey::from_bytes(&[3u8; 32]).unwrap();
        let public = (&secret).into();
        let kp = Keypair { secret, public };
        let payload = TxPayload::RepoCreate {
            name: repo.to_string(),
            description: String::new(),
            config: RepoConfig::default(),
        };
        let unsigned = SignedTx::new(payload, sender, nonce, 0, 1_700_000_000, kp.public.to_bytes().to_vec());
        let sig = kp.sign(&unsigned.bytes_without_signature());
        Arc::new(unsigned.with_signature(sig.to_bytes().to_vec()))
    }

    /// `fake_keepers()`'s `FakeSystem` defaults its clock to zero, which
    /// would reject any tx with a realistic timestamp as "in the future" —
    /// tests that need `check_tx` to admit use this instead.
    fn keepers_with_clock() -> Keepers {
        use crate::keepers::testutil::FakeSystem;
        Keepers {
            system: Arc::new(FakeSystem {
                height: std::sync::Mutex::new(1),
                time: std::sync::Mutex::new(1_700_000_000),
            }),
            ..fake_keepers()
        }
    }

    #[tokio::test]
    async fn check_tx_rejects_oversized_tx() {
        let mut params = Params::default();
        params.mempool_max_tx_size = 1;
        let mempool = Mempool::new(params, fake_keepers(), EventBus::new());
        let err = mempool.check_tx(tx("alice", 1, 10)).unwrap_err();
        assert!(matches!(err, ProtocolError::TxTooLarge { .. }));
    }

    #[tokio::test]
    async fn check_tx_rejects_when_mempool_full() {
        let mut params = Params::default();
        params.mempool_size = 0;
        let mempool = Mempool::new(params, fake_keepers(), EventBus::new());
        let err = mempool.check_tx(tx("alice", 1, 10)).unwrap_err();
        assert!(matches!(err, ProtocolError::MempoolFull { .. }));
    }

    fn permissive_params() -> Params {
        let mut params = Params::default();
        params.fee_per_byte = 0;
        params
    }

    #[tokio::test]
    async fn update_removes_committed_and_cleans() {
        let mempool = Mempool::new(permissive_params(), keepers_with_clock(), EventBus::new());
        let t = signed_repo_create("alice", "repo1", 1);
        let hash = t.hash();
        mempool.check_tx(t).unwrap();
        assert_eq!(mempool.size(), 1);
        mempool.update(&[(hash, 0)]).await;
        assert_eq!(mempool.size(), 0);
    }

    #[tokio::test]
    async fn txs_available_resolves_once_admitted() {
        let mempool = Arc::new(Mempool::new(permissive_params(), keepers_with_clock(), EventBus::new()));
        let m2 = mempool.clone();
        let waiter = tokio::spawn(async move { m2.txs_available(Duration::from_secs(1)).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        mempool.check_tx(signed_repo_create("alice", "repo1", 1)).unwrap();
        assert!(waiter.await.unwrap());
    }
}
