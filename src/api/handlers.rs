//! API Handlers
//!
//! HTTP request handlers for each resolution service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::cache::GeocodeCache;
use crate::config::Config;
use crate::error::{GeocodeError, Result};
use crate::models::{
    ClearCacheResponse, HealthResponse, ResolveQuery, ResolveResponse, StatsResponse,
};
use crate::provider::Lang;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache instance
    pub cache: Arc<GeocodeCache>,
    /// Language used when a request does not specify one
    pub default_lang: Lang,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: Arc<GeocodeCache>, default_lang: Lang) -> Self {
        Self {
            cache,
            default_lang,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// The provider and durable store are injected separately by the host
    /// once constructed.
    pub fn from_config(config: &Config) -> Self {
        let cache = GeocodeCache::new(
            config.max_entries,
            config.cache_ttl_secs,
            config.coord_precision,
        );
        Self::new(Arc::new(cache), config.default_lang)
    }
}

/// Handler for GET /resolve
///
/// Resolves a coordinate pair to a formatted address, served from the hot
/// cache when possible.
pub async fn resolve_handler(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ResolveResponse>> {
    // Validate coordinate ranges before touching the cache
    if let Some(error_msg) = query.validate() {
        return Err(GeocodeError::InvalidRequest(error_msg));
    }

    let lang = query.lang.unwrap_or(state.default_lang);
    let resolved = state.cache.resolve(query.lat, query.lng, lang).await?;

    Ok(Json(resolved.into()))
}

/// Handler for DELETE /cache
///
/// Empties the hot cache; the durable mirror is left as-is.
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearCacheResponse> {
    let cleared = state.cache.clear_cache();
    Json(ClearCacheResponse::new(cleared))
}

/// Handler for GET /stats
///
/// Returns current resolution statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats();
    let entries = state.cache.len();
    Json(StatsResponse::new(stats, entries))
}

/// Handler for POST /stats/reset
///
/// Zeroes all counters and returns the fresh snapshot.
pub async fn reset_stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    state.cache.reset_stats();
    let entries = state.cache.len();
    Json(StatsResponse::new(state.cache.stats(), entries))
}

/// Handler for GET /health
///
/// Returns health status of the service.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::provider::{ResolvedAddress, ReverseGeocoder};

    struct StubGeocoder;

    #[async_trait]
    impl ReverseGeocoder for StubGeocoder {
        async fn reverse_geocode(
            &self,
            _lat: f64,
            _lng: f64,
            _lang: Lang,
        ) -> Result<ResolvedAddress> {
            Ok(ResolvedAddress::new("Olaya St, Riyadh", "12"))
        }
    }

    fn test_state() -> AppState {
        let state = AppState::from_config(&Config::default());
        state.cache.set_provider(Arc::new(StubGeocoder));
        state
    }

    fn query(lat: f64, lng: f64) -> Query<ResolveQuery> {
        Query(ResolveQuery {
            lat,
            lng,
            lang: None,
        })
    }

    #[tokio::test]
    async fn test_resolve_handler_success() {
        let state = test_state();

        let response = resolve_handler(State(state), query(24.7136, 46.6753))
            .await
            .unwrap();
        assert_eq!(response.address, "Olaya St, Riyadh");
        assert_eq!(response.details, "12");
    }

    #[tokio::test]
    async fn test_resolve_handler_rejects_bad_latitude() {
        let state = test_state();

        let result = resolve_handler(State(state), query(123.0, 46.6753)).await;
        assert!(matches!(result, Err(GeocodeError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_resolve_handler_provider_unavailable() {
        // No provider installed
        let state = AppState::from_config(&Config::default());

        let result = resolve_handler(State(state), query(24.7136, 46.6753)).await;
        assert!(matches!(result, Err(GeocodeError::ProviderUnavailable)));
    }

    #[tokio::test]
    async fn test_clear_cache_handler() {
        let state = test_state();

        resolve_handler(State(state.clone()), query(24.7136, 46.6753))
            .await
            .unwrap();
        assert_eq!(state.cache.len(), 1);

        let response = clear_cache_handler(State(state.clone())).await;
        assert_eq!(response.cleared, 1);
        assert!(state.cache.is_empty());
    }

    #[tokio::test]
    async fn test_stats_handler_counts_lookups() {
        let state = test_state();

        resolve_handler(State(state.clone()), query(24.7136, 46.6753))
            .await
            .unwrap();
        resolve_handler(State(state.clone()), query(24.7136, 46.6753))
            .await
            .unwrap();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.cache_misses, 1);
        assert_eq!(response.cache_hits, 1);
        assert_eq!(response.entries, 1);
    }

    #[tokio::test]
    async fn test_reset_stats_handler() {
        let state = test_state();

        resolve_handler(State(state.clone()), query(24.7136, 46.6753))
            .await
            .unwrap();

        let response = reset_stats_handler(State(state)).await;
        assert_eq!(response.total_requests, 0);
        assert_eq!(response.cache_hits, 0);
        // Resetting stats does not drop cached entries
        assert_eq!(response.entries, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
