use crate::tx::{TxKind, TxPayload};

/// What every transaction exposes to the core, per spec.md §3. The core
/// does not define the byte layout (that is the codec's job, an external
/// collaborator per spec.md §6) — it only requires these accessors.
pub trait TxEnvelope: Send + Sync {
    fn kind(&self) -> TxKind;
    fn sender(&self) -> &str;
    fn nonce(&self) -> u64;
    fn fee(&self) -> u128;
    fn timestamp(&self) -> i64;
    fn public_key(&self) -> &[u8];
    fn signature(&self) -> &[u8];
    fn payload(&self) -> &TxPayload;

    /// Canonical byte length excluding the fee field, used for fee-rate
    /// calculations.
    fn economy_size(&self) -> usize;
    /// Full canonical byte length, used for capacity accounting.
    fn wire_size(&self) -> usize;
    /// Canonical bytes with the signature field omitted; this is what
    /// `signature()` must verify against.
    fn bytes_without_signature(&self) -> Vec<u8>;
    /// Stable, collision-resistant content hash (hex-encoded).
    fn hash(&self) -> String;
}
