//! Sharded Store Module
//!
//! Fixed array of independently locked partitions holding cache items.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{RwLock, RwLockWriteGuard};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::cache::{CacheItem, CacheKey};

type Items = FxHashMap<CacheKey, Arc<CacheItem>>;

// == Shard ==
#[derive(Debug, Default)]
struct Shard {
    items: RwLock<Items>,
}

// == Partition Guard ==
/// Write access to the partition holding one key.
///
/// Lets a caller change a key in two stores without anyone observing the
/// state in between.
pub(crate) struct PartitionGuard<'a> {
    items: RwLockWriteGuard<'a, Items>,
}

impl PartitionGuard<'_> {
    pub(crate) fn insert(&mut self, item: CacheItem) {
        let key = item.key().clone();
        trace!(%key, ttl = item.base_ttl(), "cache insert");
        self.items.insert(key, Arc::new(item));
    }

    pub(crate) fn remove(&mut self, key: &CacheKey) -> Option<Arc<CacheItem>> {
        self.items.remove(key)
    }
}

// == Sharded Store ==
/// Concurrent store of cache items.
///
/// The partition is picked from a stable hash of the key, and the full key is
/// the in-partition map key, so distinct (name, type, class) triples never
/// alias. Every operation locks at most one partition at a time.
#[derive(Debug)]
pub struct ShardedStore {
    shards: Box<[Shard]>,
    mask: usize,
}

impl ShardedStore {
    // == Constructor ==
    /// Creates a store with `shards` partitions, rounded up to a power of two.
    pub fn new(shards: usize) -> Self {
        let count = shards.max(1).next_power_of_two();
        Self {
            shards: (0..count).map(|_| Shard::default()).collect(),
            mask: count - 1,
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard(&self, key: &CacheKey) -> &Shard {
        &self.shards[key.shard_hash() as usize & self.mask]
    }

    /// Write-locks the partition holding `key` until the guard is dropped.
    pub(crate) fn lock_partition(&self, key: &CacheKey) -> PartitionGuard<'_> {
        PartitionGuard {
            items: self.shard(key).items.write(),
        }
    }

    // == Insert ==
    /// Stores the item under its key, replacing any previous item (and its
    /// statistics).
    pub fn insert(&self, item: CacheItem) {
        let key = item.key().clone();
        self.lock_partition(&key).insert(item);
    }

    // == Lookup ==
    /// Returns the item if present and not expired at `now`.
    ///
    /// Expired items stay in place; the sweep or the next insert removes them.
    /// The handle stays inside the crate; callers outside get copies.
    pub(crate) fn lookup(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<Arc<CacheItem>> {
        let items = self.shard(key).items.read();
        items
            .get(key)
            .filter(|item| !item.is_expired(now))
            .map(Arc::clone)
    }

    // == Length ==
    /// Number of live items at `now`, counted one partition at a time.
    ///
    /// Not consistent with concurrent mutation of other partitions.
    pub fn len(&self, now: DateTime<Utc>) -> usize {
        self.shards
            .iter()
            .map(|shard| {
                shard
                    .items
                    .read()
                    .values()
                    .filter(|item| !item.is_expired(now))
                    .count()
            })
            .sum()
    }

    /// Number of items physically held, expired ones included.
    pub fn physical_len(&self) -> usize {
        self.shards.iter().map(|shard| shard.items.read().len()).sum()
    }

    // == Walk ==
    /// Visits every item, partition by partition, until `visit` returns false.
    ///
    /// Each partition is read-locked only while its item handles are copied
    /// out; `visit` always runs unlocked. Expired items are visited too,
    /// callers decide what to do with them.
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(&CacheKey, &CacheItem) -> bool,
    {
        for shard in self.shards.iter() {
            let items: Vec<Arc<CacheItem>> = shard.items.read().values().cloned().collect();
            for item in &items {
                if !visit(item.key(), item) {
                    return;
                }
            }
        }
    }

    // == Cleanup Expired ==
    /// Removes all items expired at `now`. Returns the number removed.
    pub fn cleanup_expired(&self, now: DateTime<Utc>) -> usize {
        self.shards
            .iter()
            .map(|shard| {
                let mut items = shard.items.write();
                let before = items.len();
                items.retain(|_, item| !item.is_expired(now));
                before - items.len()
            })
            .sum()
    }
}

impl Default for ShardedStore {
    fn default() -> Self {
        Self::new(256)
    }
}
