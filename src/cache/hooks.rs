//! Storage Hooks Module
//!
//! Optional extension points of an [`LruCache`](crate::cache::LruCache).
//! Each hook is independently settable; an unset hook means the default
//! in-memory behavior.

use std::fmt;

use tracing::warn;

use crate::cache::node::Node;
use crate::error::{CacheError, HookError, Result};

pub type AddHook<K, V, X> = Box<dyn FnMut(&Node<K, V, X>)>;
pub type DeleteHook<K> = Box<dyn FnMut(&K) -> std::result::Result<(), HookError>>;
pub type EliminateLengthHook = Box<dyn Fn() -> i64>;
pub type StoreHook<K, V> = Box<dyn FnMut(&K, &V) -> std::result::Result<(), HookError>>;
pub type FetchHook<K, V> = Box<dyn FnMut(&K) -> std::result::Result<V, HookError>>;

// == Hooks ==
pub struct Hooks<K, V, X> {
    on_add: Option<AddHook<K, V, X>>,
    on_delete: Option<DeleteHook<K>>,
    eliminate_length: Option<EliminateLengthHook>,
    set_value: Option<StoreHook<K, V>>,
    get_value: Option<FetchHook<K, V>>,
}

impl<K, V, X> Default for Hooks<K, V, X> {
    fn default() -> Self {
        Self {
            on_add: None,
            on_delete: None,
            eliminate_length: None,
            set_value: None,
            get_value: None,
        }
    }
}

impl<K, V, X> fmt::Debug for Hooks<K, V, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_add", &self.on_add.is_some())
            .field("on_delete", &self.on_delete.is_some())
            .field("eliminate_length", &self.eliminate_length.is_some())
            .field("set_value", &self.set_value.is_some())
            .field("get_value", &self.get_value.is_some())
            .finish()
    }
}

impl<K, V, X> Hooks<K, V, X> {
    pub(crate) fn set_on_add<F>(&mut self, hook: F)
    where
        F: FnMut(&Node<K, V, X>) + 'static,
    {
        self.on_add = Some(Box::new(hook));
    }

    pub(crate) fn set_on_delete<F>(&mut self, hook: F)
    where
        F: FnMut(&K) -> std::result::Result<(), HookError> + 'static,
    {
        self.on_delete = Some(Box::new(hook));
    }

    pub(crate) fn set_eliminate_length<F>(&mut self, hook: F)
    where
        F: Fn() -> i64 + 'static,
    {
        self.eliminate_length = Some(Box::new(hook));
    }

    pub(crate) fn set_store<F>(&mut self, hook: F)
    where
        F: FnMut(&K, &V) -> std::result::Result<(), HookError> + 'static,
    {
        self.set_value = Some(Box::new(hook));
    }

    pub(crate) fn set_fetch<F>(&mut self, hook: F)
    where
        F: FnMut(&K) -> std::result::Result<V, HookError> + 'static,
    {
        self.get_value = Some(Box::new(hook));
    }

    // == Store ==
    /// Persists a value through the set hook, if any.
    pub(crate) fn store(&mut self, key: &K, value: &V) -> Result<()> {
        match self.set_value.as_mut() {
            Some(hook) => hook(key, value).map_err(|err| {
                warn!(error = %err, "value store hook failed");
                CacheError::Storage(err)
            }),
            None => Ok(()),
        }
    }

    // == Fetch ==
    /// Reloads a value through the get hook. `Ok(None)` when no hook is set.
    pub(crate) fn fetch(&mut self, key: &K) -> Result<Option<V>> {
        match self.get_value.as_mut() {
            Some(hook) => hook(key).map(Some).map_err(|err| {
                warn!(error = %err, "value fetch hook failed");
                CacheError::Storage(err)
            }),
            None => Ok(None),
        }
    }

    pub(crate) fn notify_add(&mut self, node: &Node<K, V, X>) {
        if let Some(hook) = self.on_add.as_mut() {
            hook(node);
        }
    }

    pub(crate) fn notify_delete(&mut self, key: &K) -> Result<()> {
        match self.on_delete.as_mut() {
            Some(hook) => hook(key).map_err(|err| {
                warn!(error = %err, "delete notification failed");
                CacheError::Notification(err)
            }),
            None => Ok(()),
        }
    }

    /// Configured eviction batch size. Non-positive values are ignored.
    pub(crate) fn eliminate_length(&self) -> Option<i64> {
        self.eliminate_length
            .as_ref()
            .map(|hook| hook())
            .filter(|length| *length > 0)
    }
}
