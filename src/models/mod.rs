//! Models Module
//!
//! Request and response DTOs for the resolution service API.

mod requests;
mod responses;

pub use requests::ResolveQuery;
pub use responses::{
    ClearCacheResponse, ErrorResponse, HealthResponse, ResolveResponse, StatsResponse,
};
