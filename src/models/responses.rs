//! Response DTOs for the inspection API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Response body for the stats endpoint (GET /cache/stats)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsResponse {
    /// Live entries in the positive cache
    pub positive_entries: usize,
    /// Live entries in the negative cache
    pub negative_entries: usize,
    /// Sum of both
    pub total_entries: usize,
}

impl StatsResponse {
    /// Creates a new StatsResponse from the two store counts
    pub fn new(positive_entries: usize, negative_entries: usize) -> Self {
        Self {
            positive_entries,
            negative_entries,
            total_entries: positive_entries + negative_entries,
        }
    }
}

/// One element of the entries endpoint (GET /cache/entries)
///
/// Record lists are left out of the JSON when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryResponse {
    pub name: String,
    pub qtype: String,
    pub rcode: String,
    /// Remaining TTL in seconds
    pub ttl: u32,
    /// Storage time, RFC 3339
    pub stored: DateTime<Utc>,
    /// Seconds since storage
    pub age: u64,
    pub query_count: u64,
    /// Hits per client address
    pub source_ips: BTreeMap<String, u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub answer: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authority: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional: Vec<String>,
}
