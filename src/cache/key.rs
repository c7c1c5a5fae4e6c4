//! Cache Key Module
//!
//! Identity of a cached query: name, record type and class.

use std::fmt;
use std::hash::{Hash, Hasher};

use hickory_proto::rr::{DNSClass, Name, RecordType};
use rustc_hash::FxHasher;

/// Full query identity used as the in-partition map key.
///
/// Names are stored lower-cased and fully qualified, so `Example.COM` and
/// `example.com.` address the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    name: Name,
    query_type: RecordType,
    query_class: DNSClass,
}

impl CacheKey {
    pub fn new(name: &Name, query_type: RecordType, query_class: DNSClass) -> Self {
        let mut name = name.to_lowercase();
        name.set_fqdn(true);
        Self {
            name,
            query_type,
            query_class,
        }
    }

    /// Shorthand for the common `IN` class.
    pub fn internet(name: &Name, query_type: RecordType) -> Self {
        Self::new(name, query_type, DNSClass::IN)
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn query_type(&self) -> RecordType {
        self.query_type
    }

    pub fn query_class(&self) -> DNSClass {
        self.query_class
    }

    /// Stable hash of the full identity, used to pick a partition.
    pub fn shard_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        let h = hasher.finish();
        // fold the high bits down, Fx leaves the low bits weak
        h ^ (h >> 32)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.query_class, self.query_type)
    }
}
