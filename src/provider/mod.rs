//! Resolver Client Module
//!
//! Defines the narrow interface to the external reverse-geocoding provider
//! and the HTTP implementation used in production. The provider is injected
//! into the cache by the host; the cache never constructs or configures it.

mod http;

pub use http::HttpGeocoder;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

// == Lang ==
/// Request language for resolved addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// Arabic
    Ar,
    /// English
    En,
}

impl Lang {
    /// Returns the lowercase language tag sent to the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::Ar => "ar",
            Lang::En => "en",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ar" => Ok(Lang::Ar),
            "en" => Ok(Lang::En),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

// == Resolved Address ==
/// A successful reverse-geocoding result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    /// Full formatted address text
    pub address: String,
    /// Secondary fragment (unit or street number), possibly empty
    pub details: String,
}

impl ResolvedAddress {
    pub fn new(address: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            details: details.into(),
        }
    }
}

// == Reverse Geocoder Trait ==
/// Interface consumed by the cache to resolve coordinates.
///
/// Implementations fail with [`GeocodeError::Provider`] when the upstream
/// call fails or returns no usable address. Keeping this a trait allows the
/// host to inject the production HTTP client or a deterministic test double.
///
/// [`GeocodeError::Provider`]: crate::error::GeocodeError::Provider
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Resolves a coordinate pair to a formatted address in the given language.
    async fn reverse_geocode(&self, lat: f64, lng: f64, lang: Lang) -> Result<ResolvedAddress>;
}
