//! LRU Cache Module
//!
//! The cache facade: combines the eviction list, size accounting, TTL
//! expiration and storage hooks into insert/access/replace/delete.
//!
//! The cache does not index keys. Callers keep the [`NodeId`] returned by
//! [`LruCache::insert`] and pass it back on later calls; the delete hook is
//! how they learn that a node was evicted or expired.

use tracing::debug;

use crate::cache::expiry::{unix_now, ExpirationPolicy};
use crate::cache::hooks::Hooks;
use crate::cache::list::{EvictionList, Iter};
use crate::cache::node::{Length, Node, NodeId};
use crate::cache::size::SizeAccountant;
use crate::cache::stats::CacheStats;
use crate::config::Config;
use crate::error::{CacheError, HookError, Result};

// == LRU Cache ==
/// Size- and time-bounded LRU cache engine.
///
/// Single-threaded: wrap it in a lock to share it between threads.
#[derive(Debug)]
pub struct LruCache<K, V, X = ()> {
    list: EvictionList<K, V, X>,
    size: SizeAccountant,
    expiry: ExpirationPolicy,
    hooks: Hooks<K, V, X>,
    stats: CacheStats,
}

impl<K, V: Length, X> LruCache<K, V, X> {
    // == Constructors ==
    /// Creates a cache bounded to `max_size` with a TTL in seconds (0 = none).
    pub fn new(max_size: i64, ttl_seconds: i64) -> Self {
        Self {
            list: EvictionList::new(),
            size: SizeAccountant::new(max_size),
            expiry: ExpirationPolicy::new(ttl_seconds),
            hooks: Hooks::default(),
            stats: CacheStats::new(),
        }
    }

    /// Creates an unbounded cache whose deletes are reported to `on_delete`.
    pub fn with_delete_callback<F>(ttl_seconds: i64, on_delete: F) -> Self
    where
        F: FnMut(&K) -> std::result::Result<(), HookError> + 'static,
    {
        let mut cache = Self::new(i64::MAX, ttl_seconds);
        cache.set_on_delete(on_delete);
        cache
    }

    /// Creates a cache from validated configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let mut cache = Self::new(config.max_size, config.ttl_seconds);
        if let Some(length) = config.eliminate_length {
            cache.set_eliminate_length(move || length);
        }
        Ok(cache)
    }

    // == Hook Setters ==
    /// Called with every newly linked node.
    pub fn set_on_add<F>(&mut self, hook: F)
    where
        F: FnMut(&Node<K, V, X>) + 'static,
    {
        self.hooks.set_on_add(hook);
    }

    /// Called with the key of every deleted, evicted or expired node.
    pub fn set_on_delete<F>(&mut self, hook: F)
    where
        F: FnMut(&K) -> std::result::Result<(), HookError> + 'static,
    {
        self.hooks.set_on_delete(hook);
    }

    /// Fixed amount to release whenever the budget overflows.
    pub fn set_eliminate_length<F>(&mut self, hook: F)
    where
        F: Fn() -> i64 + 'static,
    {
        self.hooks.set_eliminate_length(hook);
    }

    /// Persists values on insert and replace.
    pub fn set_store_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&K, &V) -> std::result::Result<(), HookError> + 'static,
    {
        self.hooks.set_store(hook);
    }

    /// Reloads values on access.
    pub fn set_fetch_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&K) -> std::result::Result<V, HookError> + 'static,
    {
        self.hooks.set_fetch(hook);
    }

    // == Insert ==
    /// Links a new node for `key` at the head and returns its handle.
    ///
    /// A failing store hook aborts the insert before anything changes.
    /// Least recently used nodes are then evicted if the new value would
    /// push the cache over its budget.
    ///
    /// If a delete notification fails during that eviction, the eviction
    /// still completes and the new node is still linked at the head; the
    /// first notification error is returned afterwards and the new node's
    /// handle is available from [`LruCache::head`].
    pub fn insert(&mut self, key: K, value: V, extra: Option<X>) -> Result<NodeId> {
        self.hooks.store(&key, &value)?;

        let length = value.length();
        let failure = match self
            .size
            .eviction_target(length, self.hooks.eliminate_length())
        {
            Some(target) => self.evict(target, None),
            None => None,
        };

        let now = unix_now();
        let node = Node::new(key, value, extra, now, self.expiry.stamp(now));
        let id = self.list.push_front(node);
        if let Some(node) = self.list.get(id) {
            self.hooks.notify_add(node);
        }
        self.size.charge(length);
        self.stats.record_insertion();
        debug!(node = %id, length, current_size = self.size.current(), "inserted");
        match failure {
            Some(err) => Err(err),
            None => Ok(id),
        }
    }

    // == Access ==
    /// Looks up a node, promoting it to most recently used.
    ///
    /// Returns `Ok(None)` if the node had expired; it is deleted in that
    /// case. A failing fetch hook leaves the node untouched.
    pub fn access(&mut self, id: NodeId) -> Result<Option<&Node<K, V, X>>> {
        let now = unix_now();
        let node = self.list.get(id).ok_or(CacheError::InvalidHandle(id))?;

        if self.expiry.is_expired(node.expire_at, now) {
            debug!(node = %id, expire_at = node.expire_at, "expired on access");
            self.stats.record_expiration();
            self.stats.record_miss();
            self.delete_node(id)?;
            return Ok(None);
        }

        let refreshed = self.hooks.fetch(&node.key)?;

        self.list.promote(id);
        if let Some(node) = self.list.get_mut(id) {
            if let Some(value) = refreshed {
                self.size.adjust(node.refresh(value));
            }
            node.touch(now);
        }
        self.stats.record_hit();
        Ok(self.list.get(id))
    }

    // == Replace ==
    /// Rewrites a node's value in place and promotes it to the head.
    ///
    /// Growth is paid for by evicting other nodes; the replaced node itself
    /// is never evicted. `extra = None` keeps the node's current extra.
    /// A failed delete notification during eviction is returned only after
    /// the rewrite has been applied.
    pub fn replace(&mut self, id: NodeId, value: V, extra: Option<X>) -> Result<()> {
        let node = self.list.get(id).ok_or(CacheError::InvalidHandle(id))?;
        self.hooks.store(&node.key, &value)?;
        let delta = value.length() - node.length;

        self.list.promote(id);
        let failure = match self
            .size
            .eviction_target(delta, self.hooks.eliminate_length())
        {
            Some(target) => self.evict(target, Some(id)),
            None => None,
        };
        self.size.adjust(delta);

        let now = unix_now();
        let expire_at = self.expiry.stamp(now);
        if let Some(node) = self.list.get_mut(id) {
            node.rewrite(value, extra, now, expire_at);
        }
        self.stats.record_replacement();
        debug!(node = %id, delta, current_size = self.size.current(), "replaced");
        failure.map_or(Ok(()), Err)
    }

    // == Delete ==
    /// Unlinks a node and fires the delete notification.
    ///
    /// The node is gone even if the notification fails.
    pub fn delete(&mut self, id: NodeId) -> Result<()> {
        if !self.list.contains(id) {
            return Err(CacheError::InvalidHandle(id));
        }
        self.stats.record_deletion();
        self.delete_node(id)
    }

    fn delete_node(&mut self, id: NodeId) -> Result<()> {
        let Some(node) = self.list.remove(id) else {
            return Err(CacheError::InvalidHandle(id));
        };
        self.size.release(node.length);
        self.hooks.notify_delete(&node.key)
    }

    // == Evict ==
    /// Deletes nodes from the tail until `target` has been released or no
    /// candidates remain. `protect` stops the walk when it becomes the tail.
    ///
    /// A failed delete notification does not stop the walk; the first such
    /// error is handed back once the target is met.
    fn evict(&mut self, target: i64, protect: Option<NodeId>) -> Option<CacheError> {
        let mut remaining = target;
        let mut evicted = 0;
        let mut failure = None;
        while remaining > 0 {
            let Some(tail) = self.list.tail() else {
                break;
            };
            if Some(tail) == protect {
                break;
            }
            remaining -= self.list.get(tail).map_or(0, |node| node.length);
            self.stats.record_eviction();
            evicted += 1;
            if let Err(err) = self.delete_node(tail) {
                failure.get_or_insert(err);
            }
        }
        debug!(
            eviction_target = target,
            evicted,
            current_size = self.size.current(),
            "eviction finished"
        );
        failure
    }

    // == Purge Expired ==
    /// Deletes every expired node and returns how many were removed.
    ///
    /// Expiration is otherwise only noticed on access; callers that want
    /// expired nodes released sooner call this periodically.
    pub fn purge_expired(&mut self) -> Result<usize> {
        let now = unix_now();
        let expired: Vec<NodeId> = self
            .list
            .iter()
            .filter(|(_, node)| self.expiry.is_expired(node.expire_at, now))
            .map(|(id, _)| id)
            .collect();

        let count = expired.len();
        let mut failure = None;
        for id in expired {
            self.stats.record_expiration();
            if let Err(err) = self.delete_node(id) {
                failure.get_or_insert(err);
            }
        }
        if count > 0 {
            debug!(count, "purged expired nodes");
        }
        failure.map_or(Ok(count), Err)
    }
}

impl<K, V, X> LruCache<K, V, X> {
    // == Traverse ==
    /// Walks the nodes from most to least recently used.
    pub fn traverse(&self) -> Iter<'_, K, V, X> {
        self.list.iter()
    }

    /// Reads a node without promoting it or checking expiration.
    pub fn get(&self, id: NodeId) -> Option<&Node<K, V, X>> {
        self.list.get(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.list.contains(id)
    }

    /// Most recently used node.
    pub fn head(&self) -> Option<NodeId> {
        self.list.head()
    }

    /// Least recently used node, the next eviction candidate.
    pub fn tail(&self) -> Option<NodeId> {
        self.list.tail()
    }

    /// Sum of the lengths of all linked nodes.
    pub fn current_size(&self) -> i64 {
        self.size.current()
    }

    pub fn max_size(&self) -> i64 {
        self.size.max_size()
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.expiry.ttl_seconds()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.list.len(), self.size.current())
    }

    /// Counts a lookup that never reached the engine, e.g. an unknown key.
    pub fn record_miss(&mut self) {
        self.stats.record_miss();
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> std::result::Result<(), String> {
        self.list.check_invariants()?;
        let sum: i64 = self.list.iter().map(|(_, node)| node.length).sum();
        if sum != self.size.current() {
            return Err(format!(
                "current size {} but nodes sum to {}",
                self.size.current(),
                sum
            ));
        }
        Ok(())
    }
}
