//! Shared predicates used across several dispatch entries: identifier
//! shape, recipient classification, and the common sanity checks every tx
//! kind runs before its distinctive checks.

use crate::crypto::{ed25519_pubkey_is_valid, ed25519_verify};
use crate::errors::FieldError;
use crate::params::Params;
use crate::tx::TxEnvelope;

/// `[A-Za-z0-9_-]+`, used for repo names, namespace names, and proposal
/// target identifiers.
pub fn is_valid_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    User(String),
    Repo(String),
    Namespace(String),
    UserNamespace(String),
}

/// Classifies a `CoinTransfer`/`NamespaceRegister` target by its prefix
/// convention: `r/<name>` (repo), `ns/<domain>` (namespace), `a/<addr>`
/// (user-namespace alias, explicitly excluded from the "repo" path), or a
/// bare user address.
pub fn classify_recipient(raw: &str) -> Option<Recipient> {
    if raw.is_empty() {
        return None;
    }
    if let Some(name) = raw.strip_prefix("r/") {
        return is_valid_identifier(name).then(|| Recipient::Repo(name.to_string()));
    }
    if let Some(domain) = raw.strip_prefix("ns/") {
        return is_valid_identifier(domain).then(|| Recipient::Namespace(domain.to_string()));
    }
    if let Some(addr) = raw.strip_prefix("a/") {
        return (!addr.is_empty()).then(|| Recipient::UserNamespace(addr.to_string()));
    }
    Some(Recipient::User(raw.to_string()))
}

pub fn is_valid_bech32_push_address(s: &str) -> bool {
    s.starts_with("pk1") && s.len() > 3 && s[3..].chars().all(|c| c.is_ascii_alphanumeric())
}

/// Derives a push-key id from its public key the way the source derives
/// addresses from key material: a content hash of the key, tagged with the
/// `pk1` prefix `UpDelPushKey`/bech32 checks expect.
pub fn derive_push_key_id(public_key: &[u8]) -> String {
    format!("pk1{}", crate::crypto::content_hash_hex(public_key))
}

/// Derives a plain account address from key material, the same
/// content-hash derivation `derive_push_key_id` uses minus the `pk1` tag —
/// used to resolve a ticket's `delegate` public key to the address
/// `TicketKeeper::has_active_nondelegated_ticket` keys off of.
pub fn derive_account_address(public_key: &[u8]) -> String {
    crate::crypto::content_hash_hex(public_key)
}

/// A push-key scope: either a bare repo name or a `ns/<domain>` namespace
/// path.
pub fn is_valid_scope(scope: &str) -> bool {
    match scope.strip_prefix("ns/") {
        Some(domain) => is_valid_identifier(domain),
        None => is_valid_identifier(scope),
    }
}

/// Proposal ids are numeric, optionally prefixed with `MR`, and at most 16
/// characters including that prefix.
pub fn is_valid_proposal_id(id: &str) -> bool {
    let digits = id.strip_prefix("MR").unwrap_or(id);
    id.len() <= 16 && !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Runs spec.md §4.6's "common" checks: nonce required and > 0; fee
/// numeric, non-negative (trivially true for `u128`), and >= fee-per-byte
/// × economy-size; timestamp required and not in the future; sender public
/// key present and a valid Ed25519 key; signature present, decodable, and
/// verifying against the canonical bytes-without-signature.
///
/// `now` is passed explicitly rather than read from a wall clock so
/// sanity checking stays a pure function of its inputs.
pub fn common_sanity(tx: &dyn TxEnvelope, index: i64, now: i64, params: &Params) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if tx.nonce() == 0 {
        errors.push(FieldError::new(index, "nonce", "nonce must be > 0"));
    }

    let min_fee = params.fee_per_byte.saturating_mul(tx.economy_size() as u128);
    if tx.fee() < min_fee {
        errors.push(FieldError::new(
            index,
            "fee",
            format!("fee {} is below the minimum {} for a {}-byte tx", tx.fee(), min_fee, tx.economy_size()),
        ));
    }

    if tx.timestamp() <= 0 {
        errors.push(FieldError::new(index, "timestamp", "timestamp is required"));
    } else if tx.timestamp() > now {
        errors.push(FieldError::new(index, "timestamp", "timestamp is in the future"));
    }

    if tx.public_key().is_empty() || !ed25519_pubkey_is_valid(tx.public_key()) {
        errors.push(FieldError::new(index, "public_key", "sender public key is missing or invalid"));
    }

    if tx.signature().is_empty() {
        errors.push(FieldError::new(index, "signature", "signature is required"));
    } else if !ed25519_pubkey_is_valid(tx.public_key())
        || !ed25519_verify(tx.public_key(), &tx.bytes_without_signature(), tx.signature())
    {
        errors.push(FieldError::new(index, "signature", "signature does not verify"));
    }

    errors
}
