//! Cache Module
//!
//! Provides the LRU cache engine with size-bounded eviction and TTL
//! expiration, plus a keyed store built on top of it.

mod expiry;
mod hooks;
mod list;
mod lru;
mod node;
mod size;
mod stats;
mod store;


// Re-export public types
pub use expiry::{unix_now, ExpirationPolicy};
pub use hooks::{AddHook, DeleteHook, EliminateLengthHook, FetchHook, StoreHook};
pub use list::{EvictionList, Iter};
pub use lru::LruCache;
pub use node::{Length, Node, NodeId};
pub use size::SizeAccountant;
pub use stats::CacheStats;
pub use store::CacheStore;
