//! Resolver Cache - DNS response cache for a resolver/forwarder
//!
//! Sharded positive and negative caches with lazily decaying TTLs, per-entry
//! query statistics, and a read-only HTTP endpoint exporting their contents.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::{AppState, InspectionServer};
pub use cache::DnsCache;
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_sweep_task;
