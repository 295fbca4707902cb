//! HTTP reverse-geocoding client.
//!
//! Thin wrapper over a Nominatim-style `/reverse` endpoint. Connection
//! pooling and a transport timeout come from reqwest; the timeout also
//! bounds how long a hung provider call can keep its cache key in flight.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{GeocodeError, Result};

use super::{Lang, ResolvedAddress, ReverseGeocoder};

/// Wire format of the provider's reverse-geocoding response.
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
    #[serde(default)]
    address: AddressParts,
}

/// Structured sub-components of the resolved address.
#[derive(Debug, Default, Deserialize)]
struct AddressParts {
    unit: Option<String>,
    house_number: Option<String>,
}

// == HTTP Geocoder ==
/// Production resolver client over HTTP.
pub struct HttpGeocoder {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGeocoder {
    /// Creates a client for the given provider base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GeocodeError::Provider(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Picks the secondary address fragment from the structured response.
    ///
    /// Prefers the fine-grained unit field, falls back to the street number.
    fn extract_details(parts: &AddressParts) -> String {
        parts
            .unit
            .clone()
            .or_else(|| parts.house_number.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ReverseGeocoder for HttpGeocoder {
    async fn reverse_geocode(&self, lat: f64, lng: f64, lang: Lang) -> Result<ResolvedAddress> {
        let url = format!("{}/reverse", self.base_url);
        let lat_param = lat.to_string();
        let lng_param = lng.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("format", "jsonv2"),
                ("lat", lat_param.as_str()),
                ("lon", lng_param.as_str()),
                ("accept-language", lang.as_str()),
            ])
            .send()
            .await
            .map_err(|e| GeocodeError::Provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Provider(format!(
                "provider returned HTTP {status}"
            )));
        }

        let body: ReverseResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Provider(format!("malformed provider response: {e}")))?;

        let address = body
            .display_name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| GeocodeError::Provider("no usable address in response".to_string()))?;

        let details = Self::extract_details(&body.address);

        Ok(ResolvedAddress { address, details })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = HttpGeocoder::new("https://geo.example.com/").unwrap();
        assert_eq!(client.base_url, "https://geo.example.com");
    }

    #[test]
    fn test_extract_details_prefers_unit() {
        let parts = AddressParts {
            unit: Some("Apt 12".to_string()),
            house_number: Some("7".to_string()),
        };
        assert_eq!(HttpGeocoder::extract_details(&parts), "Apt 12");
    }

    #[test]
    fn test_extract_details_falls_back_to_house_number() {
        let parts = AddressParts {
            unit: None,
            house_number: Some("7".to_string()),
        };
        assert_eq!(HttpGeocoder::extract_details(&parts), "7");
    }

    #[test]
    fn test_extract_details_empty_when_absent() {
        let parts = AddressParts::default();
        assert_eq!(HttpGeocoder::extract_details(&parts), "");
    }

    #[test]
    fn test_reverse_response_deserializes_without_address_block() {
        let body: ReverseResponse =
            serde_json::from_str(r#"{"display_name": "King Fahd Rd, Riyadh"}"#).unwrap();
        assert_eq!(body.display_name.as_deref(), Some("King Fahd Rd, Riyadh"));
        assert!(body.address.unit.is_none());
        assert!(body.address.house_number.is_none());
    }
}
