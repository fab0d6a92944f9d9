//! Per-kind sanity and consistency checks, dispatched on `TxKind`
//! (spec.md §4.6). Sanity checks are pure functions of the tx and the
//! frozen `Params`; consistency checks additionally consult the `Keepers`
//! capability record for state that only the chain's executed history can
//! answer (does this repo exist, has this address already voted, ...).

pub mod common;

use crate::errors::FieldError;
use crate::keepers::Keepers;
use crate::params::Params;
use crate::repo_config::{check_repo_config, dry_merge, RepoConfig};
use crate::tx::{FeeMode, TxEnvelope, TxPayload};
use crate::validator::common::{
    classify_recipient, common_sanity, derive_account_address, derive_push_key_id,
    is_valid_bech32_push_address, is_valid_identifier, is_valid_proposal_id, is_valid_scope,
    Recipient,
};

/// Owns the `Keepers` and `Params` every dispatch entry needs. Cheap to
/// clone; hand one to each `Mempool` adapter.
#[derive(Clone)]
pub struct TxValidator {
    keepers: Keepers,
    params: Params,
}

impl TxValidator {
    pub fn new(keepers: Keepers, params: Params) -> Self {
        Self { keepers, params }
    }

    /// Runs sanity then, only if sanity passed, consistency. Matches
    /// `CheckTx`'s "don't touch state for a tx that's malformed anyway"
    /// ordering.
    pub fn validate(&self, tx: &dyn TxEnvelope) -> Result<(), Vec<FieldError>> {
        self.validate_sanity(tx, -1)?;
        self.validate_consistency(tx, -1)
    }

    pub fn validate_sanity(&self, tx: &dyn TxEnvelope, index: i64) -> Result<(), Vec<FieldError>> {
        let mut errors = common_sanity(tx, index, self.keepers.system.current_time(), &self.params);
        errors.extend(kind_sanity(tx, index, &self.params));
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn validate_consistency(&self, tx: &dyn TxEnvelope, index: i64) -> Result<(), Vec<FieldError>> {
        let errors = kind_consistency(tx, index, &self.keepers, &self.params);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn kind_sanity(tx: &dyn TxEnvelope, index: i64, params: &Params) -> Vec<FieldError> {
    let mut errors = Vec::new();
    match tx.payload() {
        TxPayload::CoinTransfer { to, value } => {
            if classify_recipient(to).is_none() {
                errors.push(FieldError::new(index, "to", "recipient is malformed"));
            }
            if *value == 0 {
                errors.push(FieldError::new(index, "value", "value must be > 0"));
            }
        }
        TxPayload::TicketPurchase { value, bls_pubkey, delegate } => {
            if *value < params.min_host_stake {
                errors.push(FieldError::new(index, "value", format!("value must be >= min host stake {}", params.min_host_stake)));
            }
            if !crate::crypto::bls_pubkey_has_valid_length(bls_pubkey) {
                errors.push(FieldError::new(index, "bls_pubkey", "must be a 128-byte BLS public key"));
            }
            if let Some(delegate) = delegate {
                if !crate::crypto::ed25519_pubkey_is_valid(delegate) {
                    errors.push(FieldError::new(index, "delegate", "delegate is not a valid public key"));
                }
            }
        }
        TxPayload::TicketUnbond { ticket_hash } => {
            if ticket_hash.is_empty() {
                errors.push(FieldError::new(index, "ticket_hash", "ticket_hash is required"));
            }
        }
        TxPayload::RepoCreate { name, description, config } => {
            if !is_valid_identifier(name) {
                errors.push(FieldError::new(index, "name", "invalid repo name"));
            }
            if description.chars().count() > params.repo_create_max_char_desc {
                errors.push(FieldError::new(index, "description", format!("must be at most {} characters", params.repo_create_max_char_desc)));
            }
            if let Err(cfg_errors) = check_repo_config(index, config, params) {
                errors.extend(cfg_errors);
            }
        }
        TxPayload::RegisterPushKey { public_key, scopes, .. } => {
            if !crate::crypto::ed25519_pubkey_is_valid(public_key) {
                errors.push(FieldError::new(index, "public_key", "not a valid Ed25519 public key"));
            }
            for scope in scopes {
                if !is_valid_scope(scope) {
                    errors.push(FieldError::new(index, "scopes", format!("'{}' is not a valid namespace path or repo name", scope)));
                }
            }
        }
        TxPayload::UpDelPushKey { push_key_id, add_scopes, .. } => {
            if !is_valid_bech32_push_address(push_key_id) {
                errors.push(FieldError::new(index, "push_key_id", "malformed push key id"));
            }
            for scope in add_scopes {
                if !is_valid_scope(scope) {
                    errors.push(FieldError::new(index, "add_scopes", format!("'{}' is not a valid namespace path or repo name", scope)));
                }
            }
        }
        TxPayload::NamespaceRegister { name, to, value, domains } => {
            if !is_valid_identifier(name) {
                errors.push(FieldError::new(index, "name", "invalid namespace name"));
            }
            if *value != params.namespace_reg_fee {
                errors.push(FieldError::new(index, "value", format!("must be exactly the namespace registration fee {}", params.namespace_reg_fee)));
            }
            if let Some(to) = to {
                if classify_recipient(to).is_none() {
                    errors.push(FieldError::new(index, "to", "recipient is malformed"));
                }
            }
            for (domain, target) in domains {
                if !is_valid_identifier(domain) {
                    errors.push(FieldError::new(index, "domains", format!("'{}' is not a valid domain name", domain)));
                }
                if classify_recipient(target).is_none() {
                    errors.push(FieldError::new(index, "domains", format!("'{}' is not a valid target for domain '{}'", target, domain)));
                }
            }
        }
        TxPayload::NamespaceDomainUpdate { name, .. } => {
            if !is_valid_identifier(name) {
                errors.push(FieldError::new(index, "name", "invalid namespace name"));
            }
        }
        TxPayload::Push { repo, endorsements, agg_signature, .. } => {
            if !is_valid_identifier(repo) {
                errors.push(FieldError::new(index, "repo", "invalid repo name"));
            }
            if endorsements.len() < params.push_endorse_quorum_size {
                errors.push(FieldError::new(index, "endorsements", format!("need at least {} endorsements", params.push_endorse_quorum_size)));
            }
            if agg_signature.is_empty() {
                errors.push(FieldError::new(index, "agg_signature", "aggregate signature is required"));
            }
        }
        TxPayload::RepoProposalUpsertOwner { repo, proposal_id, value, targets, .. } => {
            check_repo_proposal_ids(repo, proposal_id, index, &mut errors);
            if *value < params.default_min_proposal_fee {
                errors.push(FieldError::new(index, "value", format!("value must be >= the default minimum proposal fee {}", params.default_min_proposal_fee)));
            }
            if targets.is_empty() || targets.len() > 10 {
                errors.push(FieldError::new(index, "targets", "must name between 1 and 10 targets"));
            }
            for target in targets {
                if classify_recipient(target).is_none() {
                    errors.push(FieldError::new(index, "targets", format!("'{}' is not a valid target address", target)));
                }
            }
        }
        TxPayload::RepoProposalVote { repo, proposal_id, vote } => {
            check_repo_proposal_ids(repo, proposal_id, index, &mut errors);
            if !(-2..=1).contains(vote) {
                errors.push(FieldError::new(index, "vote", "must be one of -2, -1, 0, 1"));
            }
        }
        TxPayload::RepoProposalSendFee { repo, proposal_id, value } => {
            check_repo_proposal_ids(repo, proposal_id, index, &mut errors);
            if *value == 0 {
                errors.push(FieldError::new(index, "value", "value must be > 0"));
            }
        }
        TxPayload::RepoProposalUpdate { repo, proposal_id, value, config, description } => {
            check_repo_proposal_ids(repo, proposal_id, index, &mut errors);
            if config.is_none() && description.is_none() {
                errors.push(FieldError::new(index, "config", "either config or description must be set"));
            }
            if let Some(description) = description {
                if description.chars().count() > params.repo_create_max_char_desc {
                    errors.push(FieldError::new(index, "description", format!("must be at most {} characters", params.repo_create_max_char_desc)));
                }
            }
            if let Some(config) = config {
                if let Err(cfg_errors) = check_repo_config(index, config, params) {
                    errors.extend(cfg_errors);
                }
            }
            if *value < params.default_min_proposal_fee {
                errors.push(FieldError::new(index, "value", format!("value must be >= the default minimum proposal fee {}", params.default_min_proposal_fee)));
            }
        }
        TxPayload::RepoProposalRegisterPushKey { repo, proposal_id, push_key_ids, fee_mode, fee_cap, namespace, namespace_only } => {
            check_repo_proposal_ids(repo, proposal_id, index, &mut errors);
            if push_key_ids.is_empty() {
                errors.push(FieldError::new(index, "push_key_ids", "at least one push key id is required"));
            }
            let mut seen = std::collections::HashSet::new();
            for id in push_key_ids {
                if !is_valid_bech32_push_address(id) {
                    errors.push(FieldError::new(index, "push_key_ids", format!("'{}' is not a valid push key id", id)));
                }
                if !seen.insert(id) {
                    errors.push(FieldError::new(index, "push_key_ids", format!("duplicate push key id '{}'", id)));
                }
            }
            match fee_mode {
                FeeMode::RepoPaysCapped => {
                    if !matches!(fee_cap, Some(cap) if *cap > 0) {
                        errors.push(FieldError::new(index, "fee_cap", "fee_cap must be present and positive when fee_mode is RepoPaysCapped"));
                    }
                }
                FeeMode::PusherPays | FeeMode::RepoPays => {
                    if fee_cap.is_some() {
                        errors.push(FieldError::new(index, "fee_cap", "fee_cap must not be set unless fee_mode is RepoPaysCapped"));
                    }
                }
            }
            if namespace.is_some() && namespace_only.is_some() {
                errors.push(FieldError::new(index, "namespace", "namespace and namespace_only are mutually exclusive"));
            }
        }
        TxPayload::SetDelegateCommission { commission } => match commission.parse::<u8>() {
            Ok(v) if v >= params.min_delegator_commission && v <= 100 => {}
            Ok(_) => errors.push(FieldError::new(index, "commission", format!("must be between {} and 100", params.min_delegator_commission))),
            Err(_) => errors.push(FieldError::new(index, "commission", "not a valid integer")),
        },
    }
    errors
}

fn check_repo_proposal_ids(repo: &str, proposal_id: &str, index: i64, errors: &mut Vec<FieldError>) {
    if !is_valid_identifier(repo) {
        errors.push(FieldError::new(index, "repo", "invalid repo name"));
    }
    if !is_valid_proposal_id(proposal_id) {
        errors.push(FieldError::new(index, "proposal_id", "must be numeric, optionally MR-prefixed, and at most 16 characters"));
    }
}

fn kind_consistency(tx: &dyn TxEnvelope, index: i64, keepers: &Keepers, params: &Params) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let sender = tx.sender();
    match tx.payload() {
        TxPayload::CoinTransfer { to, value } => {
            let target = match classify_recipient(to) {
                Some(Recipient::User(addr)) => addr,
                Some(Recipient::Repo(name)) => {
                    if !keepers.repos.exists(&name) {
                        errors.push(FieldError::new(index, "to", format!("repo '{}' does not exist", name)));
                    }
                    name
                }
                Some(Recipient::Namespace(name)) => {
                    if !keepers.namespaces.exists(&name) {
                        errors.push(FieldError::new(index, "to", format!("namespace '{}' does not exist", name)));
                    }
                    name
                }
                Some(Recipient::UserNamespace(addr)) => addr,
                None => return errors,
            };
            if let Err(e) = keepers.accounts.dry_send(sender, &target, *value) {
                errors.push(FieldError::new(index, "value", format!("transfer would fail: {}", e)));
            }
        }
        TxPayload::TicketPurchase { value, delegate, .. } => {
            let floor = keepers.tickets.current_host_ticket_price().max(params.min_host_stake);
            if *value < floor {
                errors.push(FieldError::new(index, "value", format!("below current host ticket price {}", floor)));
            }
            if let Some(delegate) = delegate {
                let addr = derive_account_address(delegate);
                if !keepers.tickets.has_active_nondelegated_ticket(&addr) {
                    errors.push(FieldError::new(index, "delegate", "delegate has no active non-delegated ticket"));
                }
            }
        }
        TxPayload::TicketUnbond { ticket_hash } => {
            if !keepers.tickets.exists(ticket_hash) {
                errors.push(FieldError::new(index, "ticket_hash", "no such ticket"));
            } else {
                if !keepers.tickets.is_active(ticket_hash) {
                    errors.push(FieldError::new(index, "ticket_hash", "ticket is not active"));
                }
                let is_holder = keepers.tickets.proposer(ticket_hash).as_deref() == Some(sender)
                    || keepers.tickets.delegator(ticket_hash).as_deref() == Some(sender);
                if !is_holder {
                    errors.push(FieldError::new(index, "ticket_hash", "sender does not hold this ticket"));
                }
            }
        }
        TxPayload::RepoCreate { name, .. } => {
            if keepers.repos.exists(name) {
                errors.push(FieldError::new(index, "name", format!("repo '{}' already exists", name)));
            }
        }
        TxPayload::RegisterPushKey { public_key, .. } => {
            let id = derive_push_key_id(public_key);
            if keepers.push_keys.exists(&id) {
                errors.push(FieldError::new(index, "public_key", "push key already registered"));
            }
        }
        TxPayload::UpDelPushKey { push_key_id, remove_indices, .. } => {
            if !keepers.push_keys.exists(push_key_id) {
                errors.push(FieldError::new(index, "push_key_id", "no such push key"));
            } else {
                if keepers.push_keys.owner(push_key_id).as_deref() != Some(sender) {
                    errors.push(FieldError::new(index, "push_key_id", "sender does not own this push key"));
                }
                let scopes = keepers.push_keys.scope_count(push_key_id);
                if remove_indices.iter().any(|i| *i >= scopes) {
                    errors.push(FieldError::new(index, "remove_indices", "index out of range for this push key's scopes"));
                }
            }
        }
        TxPayload::NamespaceRegister { name, .. } => {
            if keepers.namespaces.exists(name) && !keepers.namespaces.in_grace_period(name) {
                errors.push(FieldError::new(index, "name", format!("namespace '{}' already taken", name)));
            }
        }
        TxPayload::NamespaceDomainUpdate { name, .. } => {
            if !keepers.namespaces.exists(name) {
                errors.push(FieldError::new(index, "name", "namespace does not exist"));
            } else if keepers.namespaces.owner(name).as_deref() != Some(sender) {
                errors.push(FieldError::new(index, "name", "sender does not own this namespace"));
            }
        }
        TxPayload::Push { repo, note, endorsements, agg_signature } => {
            validate_push_consistency(repo, note, endorsements, agg_signature, index, keepers, params, &mut errors);
        }
        TxPayload::RepoProposalUpsertOwner { repo, proposal_id, .. } => {
            validate_new_proposal(repo, proposal_id, sender, index, keepers, &mut errors);
        }
        TxPayload::RepoProposalVote { repo, proposal_id, vote } => {
            if !keepers.repos.exists(repo) {
                errors.push(FieldError::new(index, "repo", "repo does not exist"));
                return errors;
            }
            if !keepers.repos.proposal_exists(repo, proposal_id) {
                errors.push(FieldError::new(index, "proposal_id", "no such proposal"));
                return errors;
            }
            if keepers.repos.proposal_finalized(repo, proposal_id) {
                errors.push(FieldError::new(index, "proposal_id", "proposal is already finalized"));
            }
            if keepers.repos.has_voted(repo, proposal_id, sender) {
                errors.push(FieldError::new(index, "proposal_id", "sender has already voted on this proposal"));
            }
            if *vote == -2 && !keepers.repos.voter_has_veto_right(repo, sender) {
                errors.push(FieldError::new(index, "vote", "sender does not hold veto rights on this repo"));
            }
        }
        TxPayload::RepoProposalSendFee { repo, proposal_id, .. } => {
            if !keepers.repos.exists(repo) {
                errors.push(FieldError::new(index, "repo", "repo does not exist"));
                return errors;
            }
            if !keepers.repos.proposal_exists(repo, proposal_id) {
                errors.push(FieldError::new(index, "proposal_id", "no such proposal"));
                return errors;
            }
            if !keepers.repos.proposal_fee_deposit_enabled(repo) {
                errors.push(FieldError::new(index, "proposal_id", "this repo does not accept fee deposits"));
            } else if !keepers.repos.proposal_in_deposit_window(repo, proposal_id) {
                errors.push(FieldError::new(index, "proposal_id", "deposit window has closed"));
            }
        }
        TxPayload::RepoProposalUpdate { repo, proposal_id, config, .. } => {
            if !keepers.repos.exists(repo) {
                errors.push(FieldError::new(index, "repo", "repo does not exist"));
                return errors;
            }
            if !keepers.repos.proposal_exists(repo, proposal_id) {
                errors.push(FieldError::new(index, "proposal_id", "no such proposal"));
                return errors;
            }
            if let Some(overrides) = config {
                let merged: RepoConfig = dry_merge(&keepers.repos.config(repo), overrides);
                if let Err(cfg_errors) = check_repo_config(index, &merged, params) {
                    errors.extend(cfg_errors);
                }
            }
        }
        TxPayload::RepoProposalRegisterPushKey { repo, proposal_id, push_key_ids, namespace, .. } => {
            if !keepers.repos.exists(repo) {
                errors.push(FieldError::new(index, "repo", "repo does not exist"));
                return errors;
            }
            if !keepers.repos.proposal_exists(repo, proposal_id) {
                errors.push(FieldError::new(index, "proposal_id", "no such proposal"));
            }
            for id in push_key_ids {
                if !keepers.push_keys.exists(id) {
                    errors.push(FieldError::new(index, "push_key_ids", format!("push key '{}' does not exist", id)));
                }
            }
            if let Some(namespace) = namespace {
                if !keepers.push_keys.namespace_owned_by(namespace, repo) {
                    errors.push(FieldError::new(index, "namespace", "namespace is not owned by this repo"));
                }
            }
        }
        TxPayload::SetDelegateCommission { .. } => {
            if !keepers.tickets.has_active_nondelegated_ticket(sender) {
                errors.push(FieldError::new(index, "commission", "sender has no active non-delegated ticket"));
            }
        }
    }
    errors
}

fn validate_new_proposal(repo: &str, proposal_id: &str, sender: &str, index: i64, keepers: &Keepers, errors: &mut Vec<FieldError>) {
    if !keepers.repos.exists(repo) {
        errors.push(FieldError::new(index, "repo", "repo does not exist"));
        return;
    }
    if keepers.repos.proposal_exists(repo, proposal_id) {
        errors.push(FieldError::new(index, "proposal_id", "a proposal with this id already exists"));
    }
    if keepers.repos.requires_owner_to_create_proposal(repo) && !keepers.repos.is_owner(repo, sender) {
        errors.push(FieldError::new(index, "repo", "this repo requires the sender to be an owner to propose"));
    }
}

fn validate_push_consistency(
    repo: &str,
    note: &crate::tx::PushNote,
    endorsements: &[crate::tx::Endorsement],
    agg_signature: &[u8],
    index: i64,
    keepers: &Keepers,
    params: &Params,
    errors: &mut Vec<FieldError>,
) {
    if !keepers.repos.exists(repo) {
        errors.push(FieldError::new(index, "repo", "repo does not exist"));
        return;
    }

    let top_hosts = keepers.repos.top_hosts(params.num_top_hosts_limit);
    for endorsement in endorsements {
        if !top_hosts.contains(&endorsement.endorser) {
            errors.push(FieldError::new(index, "endorsements", format!("'{}' is not in the current top-host set", endorsement.endorser)));
        }
        if !keepers.dht.is_reachable(&endorsement.endorser) {
            errors.push(FieldError::new(index, "endorsements", format!("endorser '{}' is not reachable", endorsement.endorser)));
        }
        if endorsement.references != note.references {
            errors.push(FieldError::new(index, "endorsements", format!("'{}' endorsed a different reference set than the push note", endorsement.endorser)));
        }
    }

    if !errors.is_empty() {
        return;
    }

    let messages: Vec<Vec<u8>> = endorsements.iter().map(|e| e.canonical_bytes()).collect();
    let message_refs: Vec<&[u8]> = messages.iter().map(|m| m.as_slice()).collect();
    let pubkeys: Vec<&[u8]> = endorsements.iter().map(|e| e.bls_pubkey.as_slice()).collect();
    if !crate::crypto::bls_aggregate_verify(&message_refs, &pubkeys, agg_signature) {
        errors.push(FieldError::new(index, "agg_signature", "aggregate signature does not verify"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keepers::testutil::fake_keepers;
    use crate::tx::SignedTx;
    use ed25519_dalek::{Keypair, SecretKey, Signer};

    fn keypair() -> Keypair {
        let secret = SecretKey::from_bytes(&[7u8; 32]).unwrap();
        let public = (&secret).into();
        Keypair { secret, public }
    }

    fn signed(payload: TxPayload, sender: &str, nonce: u64, fee: u128) -> SignedTx {
        let kp = keypair();
        let unsigned = SignedTx::new(payload, sender, nonce, fee, 1, kp.public.to_bytes().to_vec());
        let sig = kp.sign(&unsigned.bytes_without_signature());
        unsigned.with_signature(sig.to_bytes().to_vec())
    }

    fn validator_with(keepers: Keepers) -> TxValidator {
        let mut params = Params::default();
        params.fee_per_byte = 0;
        TxValidator::new(keepers, params)
    }

    #[test]
    fn coin_transfer_requires_funded_sender() {
        let keepers = fake_keepers();
        let validator = validator_with(keepers);
        let tx = signed(TxPayload::CoinTransfer { to: "bob".into(), value: 10 }, "alice", 1, 0);
        let errors = validator.validate(&tx).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "value"));
    }

    #[test]
    fn coin_transfer_sanity_passes_independent_of_balance() {
        // `fake_keepers()`'s clock defaults to zero, which would reject this
        // tx's timestamp as "in the future"; give it a clock that has
        // already reached it.
        use crate::keepers::testutil::FakeSystem;
        let keepers = Keepers {
            system: std::sync::Arc::new(FakeSystem {
                height: std::sync::Mutex::new(1),
                time: std::sync::Mutex::new(1),
            }),
            ..fake_keepers()
        };
        let validator = validator_with(keepers);
        let tx = signed(TxPayload::CoinTransfer { to: "bob".into(), value: 10 }, "alice", 1, 0);
        // Sanity (signature, nonce, fee, timestamp, recipient shape) does
        // not consult account balance; only `validate_consistency` does.
        let sanity = validator.validate_sanity(&tx, -1);
        assert!(sanity.is_ok(), "{:?}", sanity);
    }

    #[test]
    fn repo_create_rejects_duplicate_name() {
        let keepers = fake_keepers();
        // SAFETY-free: FakeRepos is behind an Arc<dyn RepoKeeper>, so
        // reaching the concrete type to seed it requires downcasting via
        // the testutil constructor instead; build keepers with a
        // pre-seeded FakeRepos directly.
        let repos = std::sync::Arc::new(crate::keepers::testutil::FakeRepos::default());
        repos.create("r1", "alice");
        let keepers = Keepers { repos: repos.clone(), ..keepers };
        let validator = validator_with(keepers);
        let tx = signed(
            TxPayload::RepoCreate { name: "r1".into(), description: "".into(), config: RepoConfig::default() },
            "alice",
            1,
            0,
        );
        let errors = validator.validate(&tx).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "name"));
    }

    #[test]
    fn repo_proposal_vote_rejects_double_vote() {
        let repos = std::sync::Arc::new(crate::keepers::testutil::FakeRepos::default());
        repos.create("r1", "alice");
        let keepers = Keepers { repos: repos.clone(), ..fake_keepers() };
        let validator = validator_with(keepers);
        let tx = signed(
            TxPayload::RepoProposalVote { repo: "r1".into(), proposal_id: "1".into(), vote: 1 },
            "alice",
            1,
            0,
        );
        // proposal doesn't exist yet, so this should fail on proposal_id,
        // not on vote shape.
        let errors = validator.validate(&tx).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "proposal_id"));
    }

    #[test]
    fn set_delegate_commission_requires_active_ticket() {
        let validator = validator_with(fake_keepers());
        let tx = signed(TxPayload::SetDelegateCommission { commission: "20".into() }, "alice", 1, 0);
        let errors = validator.validate(&tx).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "commission"));
    }
}
