//! Signature verification collaborators.
//!
//! Per spec.md §1 the key/signature primitives themselves are external
//! collaborators — this module does not implement Ed25519 or BLS, it only
//! calls into `ed25519-dalek`/`blst` the way `TxValidator`'s common and
//! Push-specific checks require.

mod hash;
pub use hash::{canonical_json, content_hash_hex, sha3_256};

use blst::min_pk::{PublicKey, Signature};
use blst::BLST_ERROR;
use ed25519_dalek::{PublicKey as EdPublicKey, Signature as EdSignature, Verifier};

/// Domain separation tag for BLS aggregate verification, scoped to this
/// chain's Push-endorsement signing context.
const PUSH_ENDORSEMENT_DST: &[u8] = b"FORGE_PUSH_ENDORSEMENT_BLS12381G2_XMD:SHA-256_SSWU_RO_";

/// Verifies a single Ed25519 signature over `msg`. Returns `false` (never
/// panics) on malformed key/signature bytes.
pub fn ed25519_verify(pubkey: &[u8], msg: &[u8], sig: &[u8]) -> bool {
    let Ok(pk) = EdPublicKey::from_bytes(pubkey) else {
        return false;
    };
    let Ok(s) = EdSignature::from_bytes(sig) else {
        return false;
    };
    pk.verify(msg, &s).is_ok()
}

/// Checks a byte slice parses as a well-formed Ed25519 public key, without
/// verifying any signature. Used by sanity checks that only need to reject
/// malformed keys before a consistency check ever runs.
pub fn ed25519_pubkey_is_valid(pubkey: &[u8]) -> bool {
    EdPublicKey::from_bytes(pubkey).is_ok()
}

/// Verifies a BLS aggregate signature over one message per signer (as the
/// Push tx's per-endorser endorsement bytes are not identical across
/// endorsers). `messages` and `pubkeys` must be the same length and
/// ordered so that `messages[i]` was signed by `pubkeys[i]`.
pub fn bls_aggregate_verify(messages: &[&[u8]], pubkeys: &[&[u8]], agg_sig: &[u8]) -> bool {
    if messages.is_empty() || messages.len() != pubkeys.len() {
        return false;
    }
    let Ok(sig) = Signature::from_bytes(agg_sig) else {
        return false;
    };
    let parsed: Option<Vec<PublicKey>> = pubkeys.iter().map(|b| PublicKey::from_bytes(b).ok()).collect();
    let Some(parsed) = parsed else {
        return false;
    };
    let pk_refs: Vec<&PublicKey> = parsed.iter().collect();
    let result = sig.aggregate_verify(true, messages, PUSH_ENDORSEMENT_DST, &pk_refs, true);
    result == BLST_ERROR::BLST_SUCCESS
}

/// A BLS public key must be exactly 128 bytes in the uncompressed
/// serialization this chain standardizes on for host tickets.
pub fn bls_pubkey_has_valid_length(pubkey: &[u8]) -> bool {
    pubkey.len() == 128
}
