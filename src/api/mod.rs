//! API Module
//!
//! HTTP handlers, routing and lifecycle for the cache inspection endpoint.
//!
//! # Endpoints
//! - `GET /cache/stats` - Live entry counts per cache
//! - `GET /cache/entries` - Every live entry with TTL, age and hit statistics

pub mod handlers;
pub mod listener;
pub mod routes;
pub mod server;

pub use handlers::*;
pub use listener::bind_reuseport;
pub use routes::create_router;
pub use server::{InspectionServer, ServerState};
