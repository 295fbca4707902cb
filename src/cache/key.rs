//! Cache Key Module
//!
//! Normalizes a (latitude, longitude, language) triple into a bounded-precision
//! cache key. Without rounding, floating-point GPS jitter would make every
//! reading a unique key and defeat caching entirely; the default precision of
//! four decimal places collapses readings within roughly eleven meters.

use std::fmt;

use crate::provider::Lang;

// == Cache Key ==
/// Normalized lookup key for a resolved coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    // == Build ==
    /// Builds a key from raw coordinates, rounding both to `precision`
    /// decimal places before joining with the language tag.
    ///
    /// Pure function; coordinate pairs that round identically are treated as
    /// the same place.
    pub fn build(lat: f64, lng: f64, lang: Lang, precision: u32) -> Self {
        let p = precision as usize;
        Self(format!("{lat:.p$},{lng:.p$},{lang}"))
    }

    /// Wraps a key string read back from the durable store.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
