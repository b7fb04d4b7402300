//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;

use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum aggregate length of all cached values
    pub max_size: i64,
    /// Time-to-live in seconds, 0 disables expiration
    pub ttl_seconds: i64,
    /// Fixed amount released on each overflow, None = exact overflow
    pub eliminate_length: Option<i64>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LRU_MAX_SIZE` - Size budget (default: 1048576)
    /// - `LRU_TTL_SECONDS` - TTL in seconds (default: 0, disabled)
    /// - `LRU_ELIMINATE_LENGTH` - Eviction batch size (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_size: env::var("LRU_MAX_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_size),
            ttl_seconds: env::var("LRU_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.ttl_seconds),
            eliminate_length: env::var("LRU_ELIMINATE_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|length: &i64| *length > 0),
        }
    }

    // == Validate ==
    /// Rejects negative sizes and TTLs.
    pub fn validate(&self) -> Result<()> {
        if self.max_size < 0 {
            return Err(CacheError::InvalidConfig(format!(
                "max_size must not be negative, got {}",
                self.max_size
            )));
        }
        if self.ttl_seconds < 0 {
            return Err(CacheError::InvalidConfig(format!(
                "ttl_seconds must not be negative, got {}",
                self.ttl_seconds
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_size: 1024 * 1024,
            ttl_seconds: 0,
            eliminate_length: None,
        }
    }
}
