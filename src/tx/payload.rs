use crate::repo_config::RepoConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How the fee for a `RepoProposalRegisterPushKey` is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeMode {
    PusherPays,
    RepoPays,
    RepoPaysCapped,
}

/// Minimal shape of a push note's per-reference content, sufficient for the
/// Push tx's sanity/consistency checks. The remote-git push server that
/// produces the full note is an external collaborator (spec.md §1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushNote {
    /// reference name -> new object hash
    pub references: BTreeMap<String, String>,
}

/// A single host's signed attestation over a push note's per-reference
/// hashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endorsement {
    pub endorser: String,
    pub bls_pubkey: Vec<u8>,
    pub references: BTreeMap<String, String>,
}

impl Endorsement {
    /// Canonical bytes this endorser signed, used both as the message fed
    /// to `bls_aggregate_verify` and as the per-reference comparison
    /// against the on-chain ref hash.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        crate::crypto::canonical_json(&self.references).unwrap_or_default()
    }
}

/// The 15 transaction payload variants spec.md §4.6 lists, grounded on
/// `storage/tx.rs`'s signable/canonical field split and on
/// `runtime/governance.rs`'s `Proposal`/`Vote`/`VoteOption` shapes for the
/// governance family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TxPayload {
    CoinTransfer {
        to: String,
        value: u128,
    },
    /// Host ticket purchase. Per the resolved open question (spec.md §9),
    /// this chain has no validator-ticket admission path.
    TicketPurchase {
        value: u128,
        bls_pubkey: Vec<u8>,
        delegate: Option<Vec<u8>>,
    },
    TicketUnbond {
        ticket_hash: String,
    },
    RepoCreate {
        name: String,
        description: String,
        config: RepoConfig,
    },
    RegisterPushKey {
        public_key: Vec<u8>,
        scopes: Vec<String>,
        fee_cap: Option<u128>,
    },
    UpDelPushKey {
        push_key_id: String,
        add_scopes: Vec<String>,
        remove_indices: Vec<usize>,
    },
    NamespaceRegister {
        name: String,
        to: Option<String>,
        value: u128,
        domains: BTreeMap<String, String>,
    },
    NamespaceDomainUpdate {
        name: String,
        domains: BTreeMap<String, String>,
    },
    Push {
        repo: String,
        note: PushNote,
        endorsements: Vec<Endorsement>,
        agg_signature: Vec<u8>,
    },
    RepoProposalUpsertOwner {
        repo: String,
        proposal_id: String,
        value: u128,
        targets: Vec<String>,
        add: bool,
    },
    RepoProposalVote {
        repo: String,
        proposal_id: String,
        /// -2 (no-with-veto), -1 (no), 0 (abstain), 1 (yes).
        vote: i8,
    },
    RepoProposalSendFee {
        repo: String,
        proposal_id: String,
        value: u128,
    },
    RepoProposalUpdate {
        repo: String,
        proposal_id: String,
        value: u128,
        config: Option<RepoConfig>,
        description: Option<String>,
    },
    RepoProposalRegisterPushKey {
        repo: String,
        proposal_id: String,
        push_key_ids: Vec<String>,
        fee_mode: FeeMode,
        fee_cap: Option<u128>,
        namespace: Option<String>,
        namespace_only: Option<String>,
    },
    SetDelegateCommission {
        commission: String,
    },
}

impl TxPayload {
    pub fn kind(&self) -> crate::tx::TxKind {
        use crate::tx::TxKind as K;
        match self {
            TxPayload::CoinTransfer { .. } => K::CoinTransfer,
            TxPayload::TicketPurchase { .. } => K::TicketPurchase,
            TxPayload::TicketUnbond { .. } => K::TicketUnbond,
            TxPayload::RepoCreate { .. } => K::RepoCreate,
            TxPayload::RegisterPushKey { .. } => K::RegisterPushKey,
            TxPayload::UpDelPushKey { .. } => K::UpDelPushKey,
            TxPayload::NamespaceRegister { .. } => K::NamespaceRegister,
            TxPayload::NamespaceDomainUpdate { .. } => K::NamespaceDomainUpdate,
            TxPayload::Push { .. } => K::Push,
            TxPayload::RepoProposalUpsertOwner { .. } => K::RepoProposalUpsertOwner,
            TxPayload::RepoProposalVote { .. } => K::RepoProposalVote,
            TxPayload::RepoProposalSendFee { .. } => K::RepoProposalSendFee,
            TxPayload::RepoProposalUpdate { .. } => K::RepoProposalUpdate,
            TxPayload::RepoProposalRegisterPushKey { .. } => K::RepoProposalRegisterPushKey,
            TxPayload::SetDelegateCommission { .. } => K::SetDelegateCommission,
        }
    }
}
