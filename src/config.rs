//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::provider::Lang;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// The cache TTL and size bound are tuning defaults, not domain invariants.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the hot cache can hold
    pub max_entries: usize,
    /// Cache entry TTL in seconds
    pub cache_ttl_secs: u64,
    /// Decimal places kept when normalizing coordinates into cache keys
    pub coord_precision: u32,
    /// HTTP server port
    pub server_port: u16,
    /// Background maintenance sweep interval in seconds
    pub cleanup_interval: u64,
    /// Base URL of the reverse-geocoding provider
    pub provider_url: String,
    /// Language used when a request does not specify one
    pub default_lang: Lang,
    /// Path of the SQLite mirror; None disables persistence
    pub db_path: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum hot-cache entries (default: 2000)
    /// - `CACHE_TTL_SECS` - Entry TTL in seconds (default: 604800 = 7 days)
    /// - `COORD_PRECISION` - Coordinate rounding precision (default: 4)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Maintenance sweep frequency in seconds (default: 3600)
    /// - `GEOCODER_URL` - Provider base URL (default: public Nominatim)
    /// - `DEFAULT_LANG` - Fallback request language, "ar" or "en" (default: en)
    /// - `GEOCACHE_DB` - SQLite mirror path; empty string disables persistence
    ///   (default: geocache.db)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env::var("MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_entries),
            cache_ttl_secs: env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl_secs),
            coord_precision: env::var("COORD_PRECISION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.coord_precision),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cleanup_interval),
            provider_url: env::var("GEOCODER_URL")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.provider_url),
            default_lang: env::var("DEFAULT_LANG")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_lang),
            db_path: match env::var("GEOCACHE_DB") {
                Ok(v) if v.is_empty() => None,
                Ok(v) => Some(PathBuf::from(v)),
                Err(_) => defaults.db_path,
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: crate::cache::DEFAULT_MAX_ENTRIES,
            cache_ttl_secs: crate::cache::DEFAULT_TTL_SECS,
            coord_precision: crate::cache::DEFAULT_COORD_PRECISION,
            server_port: 3000,
            cleanup_interval: 3600,
            provider_url: "https://nominatim.openstreetmap.org".to_string(),
            default_lang: Lang::En,
            db_path: Some(PathBuf::from("geocache.db")),
        }
    }
}
