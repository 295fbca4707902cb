//! Response DTOs for the resolution service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::ResolveStats;
use crate::provider::ResolvedAddress;

/// Response body for the resolve operation (GET /resolve)
#[derive(Debug, Clone, Serialize)]
pub struct ResolveResponse {
    /// Full formatted address text
    pub address: String,
    /// Secondary fragment (unit or street number), possibly empty
    pub details: String,
}

impl From<ResolvedAddress> for ResolveResponse {
    fn from(resolved: ResolvedAddress) -> Self {
        Self {
            address: resolved.address,
            details: resolved.details,
        }
    }
}

/// Response body for the cache clear operation (DELETE /cache)
#[derive(Debug, Clone, Serialize)]
pub struct ClearCacheResponse {
    /// Success message
    pub message: String,
    /// Number of entries removed from the hot cache
    pub cleared: usize,
}

impl ClearCacheResponse {
    /// Creates a new ClearCacheResponse
    pub fn new(cleared: usize) -> Self {
        Self {
            message: format!("Cleared {} cached entries", cleared),
            cleared,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Provider calls actually issued
    pub total_requests: u64,
    /// Lookups served from the hot cache
    pub cache_hits: u64,
    /// Lookups that required a new provider call
    pub cache_misses: u64,
    /// Lookups that attached to an already in-flight request
    pub deduplicated: u64,
    /// Current number of hot-cache entries
    pub entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from a counter snapshot
    pub fn new(stats: ResolveStats, entries: usize) -> Self {
        let hit_rate = stats.hit_rate();
        Self {
            total_requests: stats.total_requests,
            cache_hits: stats.cache_hits,
            cache_misses: stats.cache_misses,
            deduplicated: stats.deduplicated,
            entries,
            hit_rate,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
