//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

use crate::cache::NodeId;

/// Error type returned by storage and notification hooks.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The value-store or value-fetch hook failed
    #[error("Storage hook failed: {0}")]
    Storage(#[source] HookError),

    /// The delete notification failed after the node was unlinked
    #[error("Delete notification failed: {0}")]
    Notification(#[source] HookError),

    /// Handle does not refer to a node linked in this cache
    #[error("Invalid node handle: {0}")]
    InvalidHandle(NodeId),

    /// Key not found in the keyed store
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key has expired
    #[error("Key expired: {0}")]
    Expired(String),

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_storage_error_keeps_source() {
        let err = CacheError::Storage("disk full".into());
        assert_eq!(err.to_string(), "Storage hook failed: disk full");
        assert_eq!(err.source().map(|s| s.to_string()), Some("disk full".to_string()));
    }

    #[test]
    fn test_notification_error_message() {
        let err = CacheError::Notification("index gone".into());
        assert!(err.to_string().contains("index gone"));
    }

    #[test]
    fn test_keyed_errors_display() {
        assert_eq!(CacheError::NotFound("k".into()).to_string(), "Key not found: k");
        assert_eq!(CacheError::Expired("k".into()).to_string(), "Key expired: k");
    }
}
