//! Transaction envelope and payload types.
//!
//! spec.md treats the transaction as opaque to the core, describing only
//! the shape every tx must expose (type code, nonce, sender, fee,
//! economy-size, wire-size, timestamp, signature, content hash). This
//! module gives that shape a concrete form so the rest of the crate can be
//! written against it, grounded on `storage/tx.rs`'s `Transaction` /
//! `canonical_fields()` split, generalized from a single money-transfer
//! shape to the full 15-variant dispatch table spec.md §4.6 names.

mod envelope;
mod kind;
mod payload;
mod signed;

pub use envelope::TxEnvelope;
pub use kind::TxKind;
pub use payload::{
    Endorsement, FeeMode, PushNote, TxPayload,
};
pub use signed::SignedTx;

/// A reference-counted handle to an admitted/cached transaction. The core
/// is generic over any `TxEnvelope` implementation — `SignedTx` is the one
/// concrete shape this crate provides, but `Container`/`DeferredCache` only
/// ever touch transactions through this trait object.
pub type TxRef = std::sync::Arc<dyn TxEnvelope>;
