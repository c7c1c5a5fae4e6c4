//! DNS Cache Module
//!
//! Facade over the positive and negative stores used by the resolution
//! pipeline and the inspection endpoint.

use std::net::IpAddr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use hickory_proto::op::Message;
use hickory_proto::rr::{DNSClass, Name, RecordType};
use tracing::{debug, warn};

use crate::cache::{
    CacheItem, CacheKey, CachedResponse, Clock, ShardedStore, SystemClock, TtlBounds,
};
use crate::config::Config;
use crate::error::Result;

// == DNS Cache ==
/// Positive and negative response caches sharing one clock.
///
/// A key lives in at most one of the two stores.
#[derive(Debug)]
pub struct DnsCache {
    positive: ShardedStore,
    negative: ShardedStore,
    ttl_bounds: TtlBounds,
    clock: Arc<dyn Clock>,
}

impl DnsCache {
    // == Constructors ==
    /// Creates a cache with `shards` partitions per store, reading the system clock.
    pub fn new(shards: usize, ttl_bounds: TtlBounds) -> Self {
        Self::with_clock(shards, ttl_bounds, Arc::new(SystemClock))
    }

    pub fn with_clock(shards: usize, ttl_bounds: TtlBounds, clock: Arc<dyn Clock>) -> Self {
        Self {
            positive: ShardedStore::new(shards),
            negative: ShardedStore::new(shards),
            ttl_bounds,
            clock,
        }
    }

    /// Creates a cache from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.shards, config.ttl_bounds())
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(crate) fn positive(&self) -> &ShardedStore {
        &self.positive
    }

    pub(crate) fn negative(&self) -> &ShardedStore {
        &self.negative
    }

    /// Partitions per store.
    pub fn shard_count(&self) -> usize {
        self.positive.shard_count()
    }

    // == Insert ==
    /// Stores an item in the store matching its kind and drops any entry for
    /// the same key from the other store.
    ///
    /// The key's partition is locked in both stores for the whole move,
    /// always negative first, so concurrent inserts of the same key cannot
    /// leave it in both.
    pub fn insert(&self, item: CacheItem) {
        let key = item.key().clone();
        let mut negative = self.negative.lock_partition(&key);
        let mut positive = self.positive.lock_partition(&key);
        if item.is_positive() {
            negative.remove(&key);
            positive.insert(item);
        } else {
            positive.remove(&key);
            negative.insert(item);
        }
    }

    // == Insert Response ==
    /// Builds an item from an upstream response and stores it.
    ///
    /// Nothing is stored when the response cannot be cached.
    pub fn insert_response(&self, message: &Message) -> Result<()> {
        let item = CacheItem::from_message(message, self.now(), &self.ttl_bounds)
            .inspect_err(|err| warn!(error = %err, "response not cached"))?;
        debug!(
            key = %item.key(),
            positive = item.is_positive(),
            ttl = item.base_ttl(),
            "response cached"
        );
        self.insert(item);
        Ok(())
    }

    // == Lookup ==
    /// Serves a cache hit for `source`, or `None` on a miss.
    ///
    /// A hit bumps the item's query count and the bucket for `source`.
    pub fn lookup(
        &self,
        name: &Name,
        query_type: RecordType,
        query_class: DNSClass,
        source: IpAddr,
    ) -> Option<CachedResponse> {
        let key = CacheKey::new(name, query_type, query_class);
        let now = self.now();
        let item = self.find(&key, now)?;
        item.stats().record_hit(source);
        Some(item.to_response(now))
    }

    // == Peek ==
    /// Like `lookup` but leaves statistics untouched.
    pub fn peek(&self, key: &CacheKey) -> Option<CachedResponse> {
        let now = self.now();
        self.find(key, now).map(|item| item.to_response(now))
    }

    fn find(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<Arc<CacheItem>> {
        self.negative
            .lookup(key, now)
            .or_else(|| self.positive.lookup(key, now))
    }

    // == Cleanup Expired ==
    /// Sweeps both stores. Returns the number of items removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = self.now();
        self.positive.cleanup_expired(now) + self.negative.cleanup_expired(now)
    }
}

impl Default for DnsCache {
    fn default() -> Self {
        Self::new(256, TtlBounds::default())
    }
}
