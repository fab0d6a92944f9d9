use crate::crypto::{canonical_json, content_hash_hex};
use crate::tx::envelope::TxEnvelope;
use crate::tx::{TxKind, TxPayload};
use serde::Serialize;

/// A concrete, owned transaction. Grounded on `storage/tx.rs`'s
/// `Transaction` struct and its `canonical_fields()` signable-subset
/// pattern, generalized to the tagged `TxPayload` union and to the
/// economy-size/wire-size split spec.md §3 requires.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTx {
    payload: TxPayload,
    sender: String,
    nonce: u64,
    fee: u128,
    timestamp: i64,
    public_key: Vec<u8>,
    signature: Vec<u8>,
}

#[derive(Serialize)]
struct EconomyView<'a> {
    kind: TxKind,
    payload: &'a TxPayload,
    sender: &'a str,
    nonce: u64,
    timestamp: i64,
}

#[derive(Serialize)]
struct SigningView<'a> {
    kind: TxKind,
    payload: &'a TxPayload,
    sender: &'a str,
    nonce: u64,
    fee: u128,
    timestamp: i64,
    public_key: &'a [u8],
}

#[derive(Serialize)]
struct FullView<'a> {
    kind: TxKind,
    payload: &'a TxPayload,
    sender: &'a str,
    nonce: u64,
    fee: u128,
    timestamp: i64,
    public_key: &'a [u8],
    signature: &'a [u8],
}

impl SignedTx {
    pub fn new(
        payload: TxPayload,
        sender: impl Into<String>,
        nonce: u64,
        fee: u128,
        timestamp: i64,
        public_key: Vec<u8>,
    ) -> Self {
        Self {
            payload,
            sender: sender.into(),
            nonce,
            fee,
            timestamp,
            public_key,
            signature: Vec::new(),
        }
    }

    pub fn with_signature(mut self, signature: Vec<u8>) -> Self {
        self.signature = signature;
        self
    }

    fn economy_view(&self) -> EconomyView<'_> {
        EconomyView {
            kind: self.payload.kind(),
            payload: &self.payload,
            sender: &self.sender,
            nonce: self.nonce,
            timestamp: self.timestamp,
        }
    }

    fn signing_view(&self) -> SigningView<'_> {
        SigningView {
            kind: self.payload.kind(),
            payload: &self.payload,
            sender: &self.sender,
            nonce: self.nonce,
            fee: self.fee,
            timestamp: self.timestamp,
            public_key: &self.public_key,
        }
    }

    fn full_view(&self) -> FullView<'_> {
        FullView {
            kind: self.payload.kind(),
            payload: &self.payload,
            sender: &self.sender,
            nonce: self.nonce,
            fee: self.fee,
            timestamp: self.timestamp,
            public_key: &self.public_key,
            signature: &self.signature,
        }
    }
}

impl TxEnvelope for SignedTx {
    fn kind(&self) -> TxKind {
        self.payload.kind()
    }

    fn sender(&self) -> &str {
        &self.sender
    }

    fn nonce(&self) -> u64 {
        self.nonce
    }

    fn fee(&self) -> u128 {
        self.fee
    }

    fn timestamp(&self) -> i64 {
        self.timestamp
    }

    fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    fn signature(&self) -> &[u8] {
        &self.signature
    }

    fn payload(&self) -> &TxPayload {
        &self.payload
    }

    fn economy_size(&self) -> usize {
        canonical_json(&self.economy_view()).map(|b| b.len()).unwrap_or(0)
    }

    fn wire_size(&self) -> usize {
        canonical_json(&self.full_view()).map(|b| b.len()).unwrap_or(0)
    }

    fn bytes_without_signature(&self) -> Vec<u8> {
        canonical_json(&self.signing_view()).unwrap_or_default()
    }

    fn hash(&self) -> String {
        let bytes = canonical_json(&self.full_view()).unwrap_or_default();
        content_hash_hex(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::TxPayload;

    fn sample() -> SignedTx {
        SignedTx::new(
            TxPayload::CoinTransfer { to: "bob".into(), value: 1000 },
            "alice",
            1,
            10,
            1_700_000_000,
            vec![1, 2, 3],
        )
    }

    #[test]
    fn economy_size_excludes_fee() {
        let low_fee = sample();
        let high_fee = SignedTx::new(
            TxPayload::CoinTransfer { to: "bob".into(), value: 1000 },
            "alice",
            1,
            999_999,
            1_700_000_000,
            vec![1, 2, 3],
        );
        assert_eq!(low_fee.economy_size(), high_fee.economy_size());
    }

    #[test]
    fn wire_size_is_at_least_economy_size() {
        let tx = sample().with_signature(vec![9; 64]);
        assert!(tx.wire_size() >= tx.economy_size());
    }

    #[test]
    fn hash_changes_when_signature_changes() {
        let a = sample().with_signature(vec![1; 64]);
        let b = sample().with_signature(vec![2; 64]);
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn bytes_without_signature_is_stable_regardless_of_signature() {
        let a = sample().with_signature(vec![1; 64]);
        let b = sample().with_signature(vec![2; 64]);
        assert_eq!(a.bytes_without_signature(), b.bytes_without_signature());
    }
}
