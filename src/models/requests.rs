//! Request DTOs for the resolution service API
//!
//! Defines the structure of incoming HTTP request parameters.

use serde::Deserialize;

use crate::provider::Lang;

/// Query parameters for the resolve operation (GET /resolve)
///
/// # Fields
/// - `lat`: Latitude in decimal degrees
/// - `lng`: Longitude in decimal degrees
/// - `lang`: Optional result language (falls back to the configured default)
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveQuery {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
    /// Result language
    #[serde(default)]
    pub lang: Option<Lang>,
}

impl ResolveQuery {
    /// Validates the coordinate ranges
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Some("Coordinates must be finite numbers".to_string());
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Some("Latitude must be between -90 and 90".to_string());
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Some("Longitude must be between -180 and 180".to_string());
        }
        None
    }
}
