//! Cache Store Module
//!
//! Keyed cache combining a HashMap index with the LRU engine.
//!
//! The engine reports every eviction and expiration through its delete
//! hook; the store uses that hook to drop the matching index entry, so the
//! index never holds a handle to a discarded node.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use crate::cache::{CacheStats, Length, LruCache, NodeId};
use crate::config::Config;
use crate::error::{CacheError, Result};

type Index<K> = Rc<RefCell<HashMap<K, NodeId>>>;

// == Cache Store ==
/// Key-value cache with LRU eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key to node handle, shared with the engine's delete hook
    index: Index<K>,
    /// LRU engine holding the values
    lru: LruCache<K, V>,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone + Debug + 'static,
    V: Length + Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore with the given size budget and TTL.
    ///
    /// # Arguments
    /// * `max_size` - Maximum aggregate value length
    /// * `ttl_seconds` - TTL for every entry, 0 disables expiration
    pub fn new(max_size: i64, ttl_seconds: i64) -> Self {
        Self::with_engine(LruCache::new(max_size, ttl_seconds))
    }

    /// Creates a new CacheStore from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::with_engine(LruCache::from_config(config)?))
    }

    fn with_engine(mut lru: LruCache<K, V>) -> Self {
        let index: Index<K> = Rc::new(RefCell::new(HashMap::new()));
        let sink = Rc::clone(&index);
        lru.set_on_delete(move |key| {
            sink.borrow_mut().remove(key);
            Ok(())
        });
        Self { index, lru }
    }

    fn handle(&self, key: &K) -> Option<NodeId> {
        self.index.borrow().get(key).copied()
    }

    // == Set ==
    /// Stores a key-value pair.
    ///
    /// If the key already exists, its value is replaced in place and its
    /// TTL restarts. Least recently used entries are evicted as needed.
    pub fn set(&mut self, key: K, value: V) -> Result<()> {
        match self.handle(&key) {
            Some(id) => self.lru.replace(id, value, None),
            None => {
                let id = self.lru.insert(key.clone(), value, None)?;
                self.index.borrow_mut().insert(key, id);
                Ok(())
            }
        }
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Expired entries are removed and reported as `Expired`.
    pub fn get(&mut self, key: &K) -> Result<V> {
        let Some(id) = self.handle(key) else {
            self.lru.record_miss();
            return Err(CacheError::NotFound(format!("{key:?}")));
        };
        match self.lru.access(id)? {
            Some(node) => Ok(node.value().clone()),
            None => Err(CacheError::Expired(format!("{key:?}"))),
        }
    }

    // == Delete ==
    /// Removes an entry by key.
    pub fn delete(&mut self, key: &K) -> Result<()> {
        match self.handle(key) {
            Some(id) => self.lru.delete(id),
            None => Err(CacheError::NotFound(format!("{key:?}"))),
        }
    }

    // == Purge Expired ==
    /// Removes all expired entries and returns how many were dropped.
    pub fn purge_expired(&mut self) -> Result<usize> {
        self.lru.purge_expired()
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<K> {
        self.lru.traverse().map(|(_, node)| node.key().clone()).collect()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lru.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lru.is_empty()
    }

    pub fn current_size(&self) -> i64 {
        self.lru.current_size()
    }

    pub fn stats(&self) -> CacheStats {
        self.lru.stats()
    }

    /// The underlying engine, for read-only inspection.
    pub fn engine(&self) -> &LruCache<K, V> {
        &self.lru
    }
}
