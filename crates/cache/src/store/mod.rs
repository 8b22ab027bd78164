//! Per-shard storage
//!
//! Each shard actor owns one [`ShardStore`]. The cache picks
//! [`UnboundedStore`] or [`LruStore`] from its configuration; custom stores
//! can be supplied through `Cache::with_store_factory`.

mod bounded;
mod factory;
mod traits;
mod unbounded;

pub use bounded::LruStore;
pub use factory::create_store;
pub use traits::{ShardStore, StoreError, StoreResult};
pub use unbounded::UnboundedStore;
