//! Background Tasks Module
//!
//! Contains background tasks that run periodically during service operation.
//!
//! # Tasks
//! - Maintenance sweep: drops expired hot-cache entries and prunes expired
//!   durable-mirror rows at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
