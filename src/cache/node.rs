//! Cache Node Module
//!
//! Defines a single cache entry, its handle, and the length capability
//! every cached value must provide.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

// == Length Capability ==
/// Reports the size a value contributes to the cache budget.
///
/// The returned length must be non-negative.
pub trait Length {
    fn length(&self) -> i64;
}

impl Length for str {
    fn length(&self) -> i64 {
        self.len() as i64
    }
}

impl Length for String {
    fn length(&self) -> i64 {
        self.len() as i64
    }
}

impl Length for [u8] {
    fn length(&self) -> i64 {
        self.len() as i64
    }
}

impl Length for Vec<u8> {
    fn length(&self) -> i64 {
        self.len() as i64
    }
}

impl<T: Length + ?Sized> Length for &T {
    fn length(&self) -> i64 {
        (**self).length()
    }
}

impl<T: Length + ?Sized> Length for Box<T> {
    fn length(&self) -> i64 {
        (**self).length()
    }
}

impl<T: Length + ?Sized> Length for Rc<T> {
    fn length(&self) -> i64 {
        (**self).length()
    }
}

impl<T: Length + ?Sized> Length for Arc<T> {
    fn length(&self) -> i64 {
        (**self).length()
    }
}

// == Node Handle ==
/// Opaque handle to a node linked in an [`LruCache`](crate::cache::LruCache).
///
/// Handles stay valid until the node is deleted or evicted. A slot reused
/// for a later node carries a new generation, so an old handle never
/// aliases a different entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: usize,
    pub(crate) generation: u64,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.index, self.generation)
    }
}

// == Node ==
/// A single cache entry with its payload and access metadata.
///
/// Nodes are only built by the cache; list linkage lives in the arena slot
/// that owns the node.
#[derive(Debug, Clone)]
pub struct Node<K, V, X = ()> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) extra: Option<X>,
    pub(crate) length: i64,
    pub(crate) created_at: i64,
    pub(crate) access_time: i64,
    pub(crate) access_count: u64,
    /// Unix seconds after which the node is stale, 0 = never
    pub(crate) expire_at: i64,
}

impl<K, V: Length, X> Node<K, V, X> {
    // == Constructor ==
    pub(crate) fn new(key: K, value: V, extra: Option<X>, now: i64, expire_at: i64) -> Self {
        let length = value.length();
        Self {
            key,
            value,
            extra,
            length,
            created_at: now,
            access_time: now,
            access_count: 0,
            expire_at,
        }
    }

    // == Touch ==
    /// Records an access at `now`.
    pub(crate) fn touch(&mut self, now: i64) {
        self.access_time = now;
        self.access_count += 1;
    }

    // == Refresh ==
    /// Swaps in a value fetched from external storage.
    ///
    /// Returns the change in length.
    pub(crate) fn refresh(&mut self, value: V) -> i64 {
        let length = value.length();
        let delta = length - self.length;
        self.value = value;
        self.length = length;
        delta
    }

    // == Rewrite ==
    /// Replaces the payload and resets access metadata.
    pub(crate) fn rewrite(&mut self, value: V, extra: Option<X>, now: i64, expire_at: i64) {
        self.length = value.length();
        self.value = value;
        if extra.is_some() {
            self.extra = extra;
        }
        self.access_time = now;
        self.access_count = 0;
        self.expire_at = expire_at;
    }
}

impl<K, V, X> Node<K, V, X> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn extra(&self) -> Option<&X> {
        self.extra.as_ref()
    }

    /// Size this node contributes to the cache's current size.
    pub fn length(&self) -> i64 {
        self.length
    }

    /// Unix seconds of the node's construction.
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Unix seconds of the last access or replacement.
    pub fn access_time(&self) -> i64 {
        self.access_time
    }

    /// Accesses since the node was inserted or last replaced.
    pub fn access_count(&self) -> u64 {
        self.access_count
    }

    /// Absolute expiration in Unix seconds, or `None` if the node never expires.
    pub fn expire_at(&self) -> Option<i64> {
        (self.expire_at > 0).then_some(self.expire_at)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_impls() {
        assert_eq!("abc".length(), 3);
        assert_eq!(String::from("hello").length(), 5);
        assert_eq!(vec![0u8; 7].length(), 7);
        assert_eq!(Box::new(String::from("xy")).length(), 2);
        assert_eq!(Arc::<str>::from("four").length(), 4);
    }

    #[test]
    fn test_node_creation() {
        let node: Node<&str, String> = Node::new("k", "value".to_string(), None, 100, 0);

        assert_eq!(*node.key(), "k");
        assert_eq!(node.length(), 5);
        assert_eq!(node.created_at(), 100);
        assert_eq!(node.access_count(), 0);
        assert!(node.expire_at().is_none());
    }

    #[test]
    fn test_node_touch_counts_accesses() {
        let mut node: Node<u32, String> = Node::new(1, "v".to_string(), None, 100, 0);

        node.touch(101);
        node.touch(105);

        assert_eq!(node.access_count(), 2);
        assert_eq!(node.access_time(), 105);
    }

    #[test]
    fn test_node_refresh_returns_delta() {
        let mut node: Node<u32, String> = Node::new(1, "abc".to_string(), None, 0, 0);

        assert_eq!(node.refresh("abcdef".to_string()), 3);
        assert_eq!(node.length(), 6);
        assert_eq!(node.refresh("a".to_string()), -5);
    }

    #[test]
    fn test_node_rewrite_resets_counters_and_keeps_extra() {
        let mut node: Node<u32, String, &str> =
            Node::new(1, "abc".to_string(), Some("meta"), 100, 110);
        node.touch(102);

        node.rewrite("longer".to_string(), None, 103, 113);

        assert_eq!(node.value(), "longer");
        assert_eq!(node.length(), 6);
        assert_eq!(node.extra(), Some(&"meta"));
        assert_eq!(node.access_count(), 0);
        assert_eq!(node.access_time(), 103);
        assert_eq!(node.expire_at(), Some(113));
    }

    #[test]
    fn test_node_id_display() {
        let id = NodeId {
            index: 3,
            generation: 2,
        };
        assert_eq!(id.to_string(), "#3@2");
    }
}
