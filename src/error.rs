//! Error types for the resolver cache
//!
//! Provides unified error handling using thiserror.

use std::io;
use std::time::Duration;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache and its inspection endpoint.
///
/// A lookup miss is not an error; lookups return `Option`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Item was rejected before it reached a store
    #[error("Invalid cache item: {0}")]
    InvalidItem(String),

    /// Inspection listener could not be bound
    #[error("Failed to bind inspection listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Endpoint was started while not stopped
    #[error("Inspection endpoint is already running")]
    AlreadyRunning,

    /// Graceful shutdown did not finish within the grace period.
    /// The endpoint is stopped regardless.
    #[error("Inspection endpoint shutdown exceeded grace period of {0:?}")]
    ShutdownTimeout(Duration),

    /// Serve loop ended with an I/O error
    #[error("Inspection endpoint failed: {0}")]
    Server(#[from] io::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the resolver cache.
pub type Result<T> = std::result::Result<T, CacheError>;
