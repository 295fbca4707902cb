//! API Module
//!
//! HTTP handlers and routing for the resolution service REST API.
//!
//! # Endpoints
//! - `GET /resolve?lat=&lng=&lang=` - Resolve coordinates to an address
//! - `DELETE /cache` - Clear the hot cache
//! - `GET /stats` - Get resolution statistics
//! - `POST /stats/reset` - Zero the resolution statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
