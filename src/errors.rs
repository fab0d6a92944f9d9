//! Error types for the mempool and validation pipeline.
//!
//! Two kinds, per spec: field-level errors surfaced to submission clients,
//! and protocol error sentinels that flow through the Pool/Mempool ABCI
//! response path. Neither carries a panic path for user input.

use thiserror::Error;

/// A single field-level validation failure.
///
/// `index` is the position of the tx within a batch, or `-1` when the tx is
/// not part of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub index: i64,
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(index: i64, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            index,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn standalone(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(-1, field, message)
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.index, self.field, self.message)
    }
}

/// Errors raised while a keeper (external state collaborator) is consulted
/// during consistency checking. Keeper errors are wrapped and reported; they
/// never poison the pool.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeeperError {
    #[error("account unknown")]
    AccountUnknown,
    #[error("keeper lookup failed: {0}")]
    Lookup(String),
}

/// Protocol-level error sentinels. These are the fixed strings spec.md §6
/// names; `Display` renders exactly that wording so callers can match on it
/// as a log string the way the ABCI response path expects.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("container is full")]
    ContainerFull,

    #[error("exact transaction already in the pool")]
    TxAlreadyAdded,

    #[error("sender's pool transaction limit reached")]
    SenderTxLimitReached,

    #[error("an existing transaction by same sender and at same nonce exists; fee must be higher")]
    FailedReplaceByFee,

    #[error("tx nonce cannot be less than or equal to current account nonce")]
    StaleNonce,

    #[error("cache already contains a transaction with matching sender and nonce")]
    CacheDuplicate,

    #[error("refused to cache old transaction")]
    CacheAgedOut,

    #[error("mempool is full: number of txs {txs}, total txs bytes {bytes}")]
    MempoolFull { txs: usize, bytes: usize },

    #[error("tx too large. Max size is {max}")]
    TxTooLarge { max: usize },

    #[error("keeper error: {0}")]
    Keeper(#[from] KeeperError),

    #[error("{0}")]
    Other(String),
}

/// Outcome of a sanity or consistency pass: either clean, or a non-empty
/// list of field errors.
pub type ValidationResult = Result<(), Vec<FieldError>>;
