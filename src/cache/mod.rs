//! Cache Module
//!
//! Sharded positive/negative DNS response caches with decaying TTLs and
//! per-entry query statistics.

mod clock;
mod dns_cache;
pub mod export;
mod item;
mod key;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use dns_cache::DnsCache;
pub use item::{CacheItem, CachedResponse, ItemBody, TtlBounds};
pub use key::CacheKey;
pub use stats::{QueryStats, StatsSnapshot};
pub use store::ShardedStore;
