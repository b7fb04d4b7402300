//! Integration Tests for the Cache Engine
//!
//! Exercises the public API end to end: eviction, expiration, replacement
//! and the keyed store.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::thread::sleep;
use std::time::Duration;

use ring_lru::{CacheError, CacheStore, Length, LruCache, NodeId};

// == Helper Types ==

#[derive(Debug, Clone, PartialEq)]
struct Value {
    data: String,
}

impl Value {
    fn new(data: &str) -> Self {
        Self {
            data: data.to_string(),
        }
    }
}

impl Length for Value {
    fn length(&self) -> i64 {
        self.data.len() as i64
    }
}

fn keys(cache: &LruCache<String, Value>) -> Vec<String> {
    cache.traverse().map(|(_, n)| n.key().clone()).collect()
}

// == Eviction ==

#[test]
fn test_eviction_of_least_recently_used() {
    let mut cache: LruCache<String, Value> = LruCache::new(100, 0);
    for i in 0..10 {
        cache
            .insert(format!("key{i}"), Value::new("1234567890"), None)
            .unwrap();
    }
    assert_eq!(cache.current_size(), 100);

    let id = cache
        .insert("key10".to_string(), Value::new("hello"), None)
        .unwrap();

    assert_eq!(cache.current_size(), 95);
    assert_eq!(cache.len(), 10);
    assert_eq!(cache.head(), Some(id));
    let order = keys(&cache);
    assert!(!order.contains(&"key0".to_string()));
    assert_eq!(order.first().map(String::as_str), Some("key10"));
    assert_eq!(order.last().map(String::as_str), Some("key1"));
}

#[test]
fn test_eviction_skips_recently_accessed() {
    let mut cache: LruCache<String, Value> = LruCache::new(30, 0);
    let a = cache.insert("a".to_string(), Value::new("1234567890"), None).unwrap();
    cache.insert("b".to_string(), Value::new("1234567890"), None).unwrap();
    cache.insert("c".to_string(), Value::new("1234567890"), None).unwrap();

    cache.access(a).unwrap();
    cache.insert("d".to_string(), Value::new("1"), None).unwrap();

    assert_eq!(keys(&cache), vec!["d", "a", "c"]);
}

// == Expiration ==

#[test]
fn test_expired_nodes_report_absent() {
    let mut cache: LruCache<String, Value> = LruCache::new(100, 1);
    let a = cache.insert("123".to_string(), Value::new("234"), None).unwrap();
    let b = cache.insert("1231".to_string(), Value::new("2342"), None).unwrap();
    assert_eq!(cache.current_size(), 7);

    sleep(Duration::from_secs(2));

    assert!(cache.access(a).unwrap().is_none());
    assert!(!cache.contains(a));
    assert!(cache.access(b).unwrap().is_none());
    assert!(!cache.contains(b));
    assert_eq!(cache.traverse().count(), 0);
    assert_eq!(cache.current_size(), 0);
}

#[test]
fn test_unaccessed_expired_node_stays_resident() {
    let mut cache: LruCache<String, Value> = LruCache::new(100, 1);
    cache.insert("idle".to_string(), Value::new("abc"), None).unwrap();

    sleep(Duration::from_secs(2));

    // Expiration is lazy: nothing is removed until access or purge
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.current_size(), 3);
    assert_eq!(cache.purge_expired().unwrap(), 1);
    assert!(cache.is_empty());
}

// == Replace ==

#[test]
fn test_replace_evicts_others_but_never_target() {
    let mut cache: LruCache<String, Value> = LruCache::new(50, 0);
    let mut handles: Vec<NodeId> = Vec::new();
    for i in 0..5 {
        handles.push(
            cache
                .insert(format!("key{i}"), Value::new("1234567890"), None)
                .unwrap(),
        );
    }
    // key0 is the eviction candidate; give it some accesses first
    let target = handles[0];
    cache.access(target).unwrap();
    cache.access(target).unwrap();
    assert_eq!(cache.get(target).unwrap().access_count(), 2);

    cache.replace(target, Value::new(&"x".repeat(35)), None).unwrap();

    assert!(cache.contains(target));
    assert_eq!(cache.head(), Some(target));
    let node = cache.get(target).unwrap();
    assert_eq!(node.access_count(), 0);
    assert_eq!(node.length(), 35);
    assert_eq!(keys(&cache), vec!["key0", "key4"]);
    assert_eq!(cache.current_size(), 45);
}

// == Hooks ==

#[test]
fn test_external_index_follows_deletes() {
    let index: Rc<RefCell<HashMap<String, NodeId>>> = Rc::new(RefCell::new(HashMap::new()));
    let sink = Rc::clone(&index);
    let mut cache: LruCache<String, Value> = LruCache::new(20, 0);
    cache.set_on_delete(move |key| {
        sink.borrow_mut().remove(key);
        Ok(())
    });

    for key in ["a", "b", "c"] {
        let id = cache
            .insert(key.to_string(), Value::new("1234567890"), None)
            .unwrap();
        index.borrow_mut().insert(key.to_string(), id);
    }

    let mut indexed: Vec<String> = index.borrow().keys().cloned().collect();
    indexed.sort();
    assert_eq!(indexed, vec!["b", "c"]);
}

#[test]
fn test_value_store_hooks_round_trip() {
    let disk: Rc<RefCell<HashMap<String, Value>>> = Rc::new(RefCell::new(HashMap::new()));
    let mut cache: LruCache<String, Value> = LruCache::new(100, 0);

    let writer = Rc::clone(&disk);
    cache.set_store_hook(move |key, value| {
        writer.borrow_mut().insert(key.clone(), value.clone());
        Ok(())
    });
    let reader = Rc::clone(&disk);
    cache.set_fetch_hook(move |key| {
        reader
            .borrow()
            .get(key)
            .cloned()
            .ok_or_else(|| format!("{key} missing on disk").into())
    });

    let id = cache.insert("k".to_string(), Value::new("v1"), None).unwrap();
    disk.borrow_mut().insert("k".to_string(), Value::new("v2-on-disk"));

    let node = cache.access(id).unwrap().unwrap();
    assert_eq!(node.value(), &Value::new("v2-on-disk"));
    assert_eq!(cache.current_size(), 10);

    disk.borrow_mut().clear();
    assert!(matches!(cache.access(id), Err(CacheError::Storage(_))));
    assert!(cache.contains(id));
}

// == Keyed Store ==

#[test]
fn test_store_set_get_like_memcache() {
    let mut store: CacheStore<String, String> = CacheStore::new(100, 10);

    store.set("key1".to_string(), "value1".to_string()).unwrap();

    assert_eq!(store.get(&"key1".to_string()).unwrap(), "value1");
    assert!(matches!(
        store.get(&"key2".to_string()),
        Err(CacheError::NotFound(_))
    ));
}

#[test]
fn test_store_expired_key_reports_expired_once() {
    let mut store: CacheStore<String, String> = CacheStore::new(100, 1);
    store.set("key1".to_string(), "value1".to_string()).unwrap();

    sleep(Duration::from_secs(2));

    assert!(matches!(
        store.get(&"key1".to_string()),
        Err(CacheError::Expired(_))
    ));
    assert!(matches!(
        store.get(&"key1".to_string()),
        Err(CacheError::NotFound(_))
    ));
    assert_eq!(store.stats().expirations, 1);
}
