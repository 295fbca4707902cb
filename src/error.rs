//! Error types for the resolution service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Geocode Error Enum ==
/// Unified error type for coordinate resolution.
///
/// Clone is required because a single resolution outcome is broadcast to
/// every caller attached to the same in-flight request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeocodeError {
    /// The resolution provider has not been installed yet
    #[error("resolution provider not initialized")]
    ProviderUnavailable,

    /// The provider call failed or returned no usable address
    #[error("provider error: {0}")]
    Provider(String),

    /// Invalid request data
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for GeocodeError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            GeocodeError::ProviderUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            GeocodeError::Provider(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            GeocodeError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Storage Error Enum ==
/// Errors from the durable mirror.
///
/// These never cross the public resolution boundary: they are caught at the
/// storage adapter, logged, and optionally handed to an observer hook. The
/// hot path treats the mirror as an optimization, not a dependency.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The underlying store could not be opened
    #[error("storage open failed: {0}")]
    Open(String),

    /// A whole-collection read failed
    #[error("storage read failed: {0}")]
    Read(String),

    /// A best-effort write failed
    #[error("storage write failed: {0}")]
    Write(String),
}

// == Result Type Alias ==
/// Convenience Result type for resolution operations.
pub type Result<T> = std::result::Result<T, GeocodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocode_error_display() {
        let err = GeocodeError::ProviderUnavailable;
        assert!(err.to_string().contains("not initialized"));

        let err = GeocodeError::Provider("HTTP 500".to_string());
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[test]
    fn test_geocode_error_clone_is_equal() {
        let err = GeocodeError::Provider("no usable address".to_string());
        assert_eq!(err.clone(), err);
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Write("disk full".to_string());
        assert!(err.to_string().contains("write failed"));
        assert!(err.to_string().contains("disk full"));
    }
}
