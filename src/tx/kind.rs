use serde::{Deserialize, Serialize};

/// The tag every transaction exposes, dispatched on by `TxValidator` and by
/// `Mempool::ReapMaxBytesMaxGas`'s per-type ticket cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxKind {
    CoinTransfer,
    TicketPurchase,
    TicketUnbond,
    RepoCreate,
    RegisterPushKey,
    UpDelPushKey,
    NamespaceRegister,
    NamespaceDomainUpdate,
    Push,
    RepoProposalUpsertOwner,
    RepoProposalVote,
    RepoProposalSendFee,
    RepoProposalUpdate,
    RepoProposalRegisterPushKey,
    SetDelegateCommission,
}

impl TxKind {
    /// Whether reap's per-block quota (`MaxValTicketsPerBlock`) applies to
    /// this kind. Per the resolved open question, only host tickets exist
    /// in this chain so the one ticket-purchase kind is the only one
    /// subject to the cap.
    pub fn is_ticket_purchase(&self) -> bool {
        matches!(self, TxKind::TicketPurchase)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::CoinTransfer => "coin_transfer",
            TxKind::TicketPurchase => "ticket_purchase",
            TxKind::TicketUnbond => "ticket_unbond",
            TxKind::RepoCreate => "repo_create",
            TxKind::RegisterPushKey => "register_push_key",
            TxKind::UpDelPushKey => "up_del_push_key",
            TxKind::NamespaceRegister => "namespace_register",
            TxKind::NamespaceDomainUpdate => "namespace_domain_update",
            TxKind::Push => "push",
            TxKind::RepoProposalUpsertOwner => "repo_proposal_upsert_owner",
            TxKind::RepoProposalVote => "repo_proposal_vote",
            TxKind::RepoProposalSendFee => "repo_proposal_send_fee",
            TxKind::RepoProposalUpdate => "repo_proposal_update",
            TxKind::RepoProposalRegisterPushKey => "repo_proposal_register_push_key",
            TxKind::SetDelegateCommission => "set_delegate_commission",
        }
    }
}

impl std::fmt::Display for TxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
