//! Ring LRU - A size- and time-bounded LRU cache engine
//!
//! Entries live in an arena-backed circular doubly-linked list. Least
//! recently used entries are evicted when a size budget is exceeded, and
//! entries can expire after a time-to-live. Storage and notification hooks
//! let callers keep values or indexes outside the engine.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheStats, CacheStore, Length, LruCache, Node, NodeId};
pub use config::Config;
pub use error::{CacheError, HookError, Result};
