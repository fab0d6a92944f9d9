//! Capability record over the state keepers.
//!
//! The source this crate is modeled on exposes many narrow keeper
//! interfaces and lets the validator reach into a god object. Per spec.md
//! §9 this is instead a single capability record of small interface-like
//! contracts (`accounts`, `repos`, `namespaces`, `push_keys`, `tickets`,
//! `system`, `dht`), handed to `TxValidator` read-only. Keepers never hold
//! a reference back to the pool — the only place a keeper feeds the pool is
//! the nonce-getter closure `Container` takes as a constructor parameter,
//! not a field.

use crate::errors::KeeperError;
use crate::repo_config::RepoConfig;
use std::sync::Arc;

pub trait AccountKeeper: Send + Sync {
    /// Current on-chain nonce. Implementations should surface an unknown
    /// account as `Err(KeeperError::AccountUnknown)`; callers that want the
    /// "unknown account means nonce zero" sentinel handle the conversion
    /// themselves (see `Container::current_nonce_or_zero`).
    fn nonce_of(&self, addr: &str) -> Result<u64, KeeperError>;
    fn balance_of(&self, addr: &str) -> Result<u128, KeeperError>;
    /// Simulates a transfer without mutating state; used by CoinTransfer's
    /// consistency check ("dry-send must succeed").
    fn dry_send(&self, from: &str, to: &str, amount: u128) -> Result<(), KeeperError>;
}

pub trait RepoKeeper: Send + Sync {
    fn exists(&self, name: &str) -> bool;
    fn is_owner(&self, repo: &str, addr: &str) -> bool;
    fn config(&self, repo: &str) -> RepoConfig;
    fn proposal_exists(&self, repo: &str, proposal_id: &str) -> bool;
    fn proposal_finalized(&self, repo: &str, proposal_id: &str) -> bool;
    fn proposal_in_deposit_window(&self, repo: &str, proposal_id: &str) -> bool;
    fn proposal_fee_deposited(&self, repo: &str, proposal_id: &str) -> u128;
    fn proposal_fee_deposit_enabled(&self, repo: &str) -> bool;
    fn has_voted(&self, repo: &str, proposal_id: &str, voter: &str) -> bool;
    fn voter_has_veto_right(&self, repo: &str, voter: &str) -> bool;
    fn requires_owner_to_create_proposal(&self, repo: &str) -> bool;
    fn top_hosts(&self, limit: usize) -> Vec<String>;
    fn current_ref_hash(&self, repo: &str, reference: &str) -> Option<String>;
}

pub trait NamespaceKeeper: Send + Sync {
    fn exists(&self, name: &str) -> bool;
    fn owner(&self, name: &str) -> Option<String>;
    fn in_grace_period(&self, name: &str) -> bool;
    /// Resolves a `ns/<domain>` URI one hop to its target (repo name, user
    /// address, or another namespace URI); consistency checks recurse on
    /// the result.
    fn resolve(&self, uri: &str) -> Option<String>;
}

pub trait PushKeyKeeper: Send + Sync {
    fn exists(&self, push_key_id: &str) -> bool;
    fn owner(&self, push_key_id: &str) -> Option<String>;
    fn scope_count(&self, push_key_id: &str) -> usize;
    fn namespace_owned_by(&self, namespace: &str, repo: &str) -> bool;
}

pub trait TicketKeeper: Send + Sync {
    fn exists(&self, ticket_hash: &str) -> bool;
    fn is_active(&self, ticket_hash: &str) -> bool;
    fn proposer(&self, ticket_hash: &str) -> Option<String>;
    fn delegator(&self, ticket_hash: &str) -> Option<String>;
    fn has_active_nondelegated_ticket(&self, addr: &str) -> bool;
    fn current_host_ticket_price(&self) -> u128;
}

pub trait SystemKeeper: Send + Sync {
    fn current_height(&self) -> u64;
    fn current_time(&self) -> i64;
}

pub trait DhtKeeper: Send + Sync {
    fn is_reachable(&self, host_addr: &str) -> bool;
}

/// The capability record passed to `TxValidator`. Cheap to clone — every
/// field is an `Arc` to a trait object.
#[derive(Clone)]
pub struct Keepers {
    pub accounts: Arc<dyn AccountKeeper>,
    pub repos: Arc<dyn RepoKeeper>,
    pub namespaces: Arc<dyn NamespaceKeeper>,
    pub push_keys: Arc<dyn PushKeyKeeper>,
    pub tickets: Arc<dyn TicketKeeper>,
    pub system: Arc<dyn SystemKeeper>,
    pub dht: Arc<dyn DhtKeeper>,
}
