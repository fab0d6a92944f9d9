//! Frozen protocol parameters and mempool configuration.
//!
//! The source this crate is modeled on treats these as process-wide mutable
//! globals for test convenience. Here they are a single frozen `Params`
//! record injected at construction into `Container`, `Mempool`, and
//! `TxValidator`; nothing mutates it after startup. Tests override by
//! passing an alternate `Params` value, never by mutating a global.

use std::env;
use std::time::Duration;

/// Protocol parameters consumed by the validator and the container's
/// capacity/ordering logic. Grounded on `mempool/mod.rs`'s
/// `MempoolConfig::default()` env-override convention.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    /// `Mempool.Size` — max admitted tx count at the boundary.
    pub mempool_size: usize,
    /// `Mempool.MaxTxsSize` — max total bytes across admitted txs.
    pub mempool_max_txs_size: usize,
    /// `Mempool.MaxTxSize` — max bytes for a single tx.
    pub mempool_max_tx_size: usize,

    /// Container capacity (max admitted tx count). Distinct from
    /// `mempool_size` per the redundant-boundary-checks design note —
    /// `Mempool` enforces the byte-aware cap, `Pool`/`Container` enforce
    /// their own count cap independently.
    pub container_cap: usize,
    /// `MempoolSenderTxLimit` — per-sender quota, admitted + cached.
    pub sender_tx_limit: usize,
    /// `MempoolTxTTL` — age after which an admitted tx is swept.
    pub tx_ttl: Duration,
    /// Deferred cache FIFO depth (recommended 10,000).
    pub deferred_cache_capacity: usize,

    /// `FeePerByte` — minimum fee rate (fee / economy-size) a tx must clear.
    pub fee_per_byte: u128,
    /// `MinHostStake` — minimum value for a host ticket purchase.
    pub min_host_stake: u128,
    /// `MinValidatorsTicketPrice` — floor price referenced by ticket checks.
    pub min_validator_ticket_price: u128,
    /// `NumTopHostsLimit` — size of the top-host set eligible to endorse.
    pub num_top_hosts_limit: usize,
    /// `PushEndorseQuorumSize` — minimum endorsement count for a Push tx.
    pub push_endorse_quorum_size: usize,
    /// `MaxValTicketsPerBlock` — per-block cap on validator-ticket txs.
    pub max_val_tickets_per_block: usize,
    /// `NamespaceRegFee` — exact fee required to register a namespace.
    pub namespace_reg_fee: u128,
    /// `MinDelegatorCommission` — lower bound on delegate commission (0-100).
    pub min_delegator_commission: u8,
    /// `DefaultMinProposalFee` — floor for any governance proposal fee.
    pub default_min_proposal_fee: u128,
    /// `TxRepoCreateMaxCharDesc` — max chars for a repo description.
    pub repo_create_max_char_desc: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            mempool_size: 5_000,
            mempool_max_txs_size: 64 * 1024 * 1024,
            mempool_max_tx_size: 256 * 1024,

            container_cap: 5_000,
            sender_tx_limit: 64,
            tx_ttl: Duration::from_secs(3 * 60 * 60),
            deferred_cache_capacity: 10_000,

            fee_per_byte: 1,
            min_host_stake: 1_000_000,
            min_validator_ticket_price: 1_000_000,
            num_top_hosts_limit: 128,
            push_endorse_quorum_size: 3,
            max_val_tickets_per_block: 20,
            namespace_reg_fee: 100_000,
            min_delegator_commission: 10,
            default_min_proposal_fee: 10_000,
            repo_create_max_char_desc: 140,
        }
    }
}

impl Params {
    /// Load parameters from the environment, falling back to defaults for
    /// anything unset or unparsable. Intended for binaries/tests that want
    /// `.env`-driven overrides; library callers that already have a `Params`
    /// value should just construct one directly.
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        let d = Self::default();
        Self {
            mempool_size: env_usize("FORGE_MEMPOOL_SIZE", d.mempool_size),
            mempool_max_txs_size: env_usize("FORGE_MEMPOOL_MAX_TXS_SIZE", d.mempool_max_txs_size),
            mempool_max_tx_size: env_usize("FORGE_MEMPOOL_MAX_TX_SIZE", d.mempool_max_tx_size),
            container_cap: env_usize("FORGE_CONTAINER_CAP", d.container_cap),
            sender_tx_limit: env_usize("FORGE_SENDER_TX_LIMIT", d.sender_tx_limit),
            tx_ttl: Duration::from_millis(env_u64(
                "FORGE_TX_TTL_MS",
                d.tx_ttl.as_millis() as u64,
            )),
            deferred_cache_capacity: env_usize(
                "FORGE_DEFERRED_CACHE_CAPACITY",
                d.deferred_cache_capacity,
            ),
            fee_per_byte: env_u128("FORGE_FEE_PER_BYTE", d.fee_per_byte),
            min_host_stake: env_u128("FORGE_MIN_HOST_STAKE", d.min_host_stake),
            min_validator_ticket_price: env_u128(
                "FORGE_MIN_VALIDATOR_TICKET_PRICE",
                d.min_validator_ticket_price,
            ),
            num_top_hosts_limit: env_usize("FORGE_NUM_TOP_HOSTS_LIMIT", d.num_top_hosts_limit),
            push_endorse_quorum_size: env_usize(
                "FORGE_PUSH_ENDORSE_QUORUM_SIZE",
                d.push_endorse_quorum_size,
            ),
            max_val_tickets_per_block: env_usize(
                "FORGE_MAX_VAL_TICKETS_PER_BLOCK",
                d.max_val_tickets_per_block,
            ),
            namespace_reg_fee: env_u128("FORGE_NAMESPACE_REG_FEE", d.namespace_reg_fee),
            min_delegator_commission: env_usize(
                "FORGE_MIN_DELEGATOR_COMMISSION",
                d.min_delegator_commission as usize,
            ) as u8,
            default_min_proposal_fee: env_u128(
                "FORGE_DEFAULT_MIN_PROPOSAL_FEE",
                d.default_min_proposal_fee,
            ),
            repo_create_max_char_desc: env_usize(
                "FORGE_REPO_CREATE_MAX_CHAR_DESC",
                d.repo_create_max_char_desc,
            ),
        }
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u128(key: &str, default: u128) -> u128 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Initializes the `tracing` subscriber once. Safe to call more than once
/// (later calls are no-ops); intended for test harnesses and binaries that
/// embed this crate.
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_internally_consistent() {
        let p = Params::default();
        assert!(p.container_cap > 0);
        assert!(p.deferred_cache_capacity >= p.sender_tx_limit);
        assert!(p.default_min_proposal_fee > 0);
    }
}
