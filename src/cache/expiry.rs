//! Expiration Policy Module
//!
//! Per-cache TTL stamping and lazy liveness checks.

use chrono::Utc;

// == Utility Functions ==
/// Returns current Unix timestamp in seconds.
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

// == Expiration Policy ==
/// Stamps nodes with an absolute expiration and checks them on access.
///
/// A TTL of zero (or below) disables expiration: nodes are stamped with 0
/// and never expire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpirationPolicy {
    ttl_seconds: i64,
}

impl ExpirationPolicy {
    pub fn new(ttl_seconds: i64) -> Self {
        Self {
            ttl_seconds: ttl_seconds.max(0),
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    pub fn is_enabled(&self) -> bool {
        self.ttl_seconds > 0
    }

    // == Stamp ==
    /// Expiration timestamp for a node built or replaced at `now`.
    pub fn stamp(&self, now: i64) -> i64 {
        if self.is_enabled() {
            now + self.ttl_seconds
        } else {
            0
        }
    }

    // == Is Expired ==
    /// A node is expired once `now` has moved past its stamp.
    ///
    /// Stamps of 0 never expire, whatever the current policy.
    pub fn is_expired(&self, expire_at: i64, now: i64) -> bool {
        expire_at > 0 && now > expire_at
    }
}
