//! Cache Entry Module
//!
//! Defines the structure for individual resolved-address entries.

use chrono::Utc;

// == Cache Entry ==
/// A single resolved address with its write timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Full formatted address text
    pub address: String,
    /// Secondary fragment (unit or street number), possibly empty
    pub details: String,
    /// Write timestamp (Unix milliseconds)
    pub timestamp_ms: i64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped with the current time.
    pub fn new(address: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            details: details.into(),
            timestamp_ms: current_timestamp_ms(),
        }
    }

    /// Creates an entry with an explicit timestamp, as read back from the
    /// durable store.
    pub fn with_timestamp(
        address: impl Into<String>,
        details: impl Into<String>,
        timestamp_ms: i64,
    ) -> Self {
        Self {
            address: address.into(),
            details: details.into(),
            timestamp_ms,
        }
    }

    // == Age ==
    /// Milliseconds elapsed since the entry was written.
    pub fn age_ms(&self) -> i64 {
        current_timestamp_ms().saturating_sub(self.timestamp_ms)
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived the given TTL.
    ///
    /// Boundary condition: an entry is expired once its age reaches the TTL,
    /// so a TTL of zero expires everything immediately.
    pub fn is_expired(&self, ttl_secs: u64) -> bool {
        self.age_ms() >= (ttl_secs as i64).saturating_mul(1000)
    }
}

// == Utility Functions ==
/// Returns the current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}
