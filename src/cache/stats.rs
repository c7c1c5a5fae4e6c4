//! Query Statistics Module
//!
//! Per-entry popularity counters: total hits and hits per client address.

use std::collections::{BTreeMap, HashMap};
use std::net::IpAddr;

use parking_lot::Mutex;

// == Query Stats ==
/// Hit counters embedded in every cache item.
///
/// The total and the per-source buckets are updated under one lock, so the
/// total always equals the sum of the buckets.
#[derive(Debug, Default)]
pub struct QueryStats {
    inner: Mutex<StatsInner>,
}

#[derive(Debug, Default)]
struct StatsInner {
    query_count: u64,
    source_ips: HashMap<IpAddr, u64>,
}

/// Point-in-time copy of an item's counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub query_count: u64,
    pub source_ips: BTreeMap<String, u64>,
}

impl QueryStats {
    // == Constructor ==
    /// Creates a new QueryStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    /// Counts one cache hit served to `source`.
    pub fn record_hit(&self, source: IpAddr) {
        let mut inner = self.inner.lock();
        inner.query_count += 1;
        *inner.source_ips.entry(source).or_insert(0) += 1;
    }

    pub fn query_count(&self) -> u64 {
        self.inner.lock().query_count
    }

    // == Snapshot ==
    /// Copies the counters out, keyed by the textual client address.
    pub fn snapshot(&self) -> StatsSnapshot {
        let inner = self.inner.lock();
        StatsSnapshot {
            query_count: inner.query_count,
            source_ips: inner
                .source_ips
                .iter()
                .map(|(ip, count)| (ip.to_string(), *count))
                .collect(),
        }
    }
}
