//! Geocache - a caching reverse-geocoding service
//!
//! Fronts a metered resolution provider with an in-process hot cache,
//! per-key request coalescing, and a best-effort durable mirror.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod rate;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use cache::GeocodeCache;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
