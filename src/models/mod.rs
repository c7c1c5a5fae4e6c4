//! Response models for the inspection API
//!
//! This module defines the DTOs (Data Transfer Objects) the cache exports
//! are serialized through.

pub mod responses;

// Re-export commonly used types
pub use responses::{EntryResponse, StatsResponse};
