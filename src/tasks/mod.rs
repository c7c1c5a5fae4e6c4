//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry sweep: reclaims memory held by expired cache entries

mod sweep;

pub use sweep::spawn_sweep_task;
