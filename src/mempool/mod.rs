//! Mempool core: admission, ordering, and reaping of transactions.
//!
//! Split per the component breakdown in spec.md §4: `nonce_index` and
//! `deferred_cache` are the two small supporting structures, `container`
//! is the ordered/locked admitted set, `pool` is a thin façade over it, and
//! `adapter` is the only piece that speaks the consensus engine's
//! vocabulary (`CheckTx`, `ReapMaxBytesMaxGas`, `Update`, `Lock`/`Unlock`).

mod adapter;
mod container;
mod deferred_cache;
mod nonce_index;
mod pool;

pub use adapter::{new_shared, Mempool};
pub use container::{Container, ContainerConfig, ContainerItem};
pub use deferred_cache::{CacheError, DeferredCache, DEFAULT_CAPACITY};
pub use nonce_index::{NonceCollection, NonceInfo, SenderNonces};
pub use pool::{Pool, PoolConfig};
