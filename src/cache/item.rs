//! Cache Item Module
//!
//! A single cached DNS answer or negative result, with its TTL basis,
//! record payload and hit statistics.

use chrono::{DateTime, Utc};
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::{RData, Record};

use crate::cache::{CacheKey, QueryStats};
use crate::error::{CacheError, Result};

// == TTL Bounds ==
/// Clamps applied to TTLs derived from DNS messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlBounds {
    pub min_ttl: u32,
    pub positive_max_ttl: u32,
    pub negative_max_ttl: u32,
}

impl TtlBounds {
    pub fn clamp_positive(&self, ttl: u32) -> u32 {
        ttl.min(self.positive_max_ttl).max(self.min_ttl)
    }

    pub fn clamp_negative(&self, ttl: u32) -> u32 {
        ttl.min(self.negative_max_ttl).max(self.min_ttl)
    }
}

impl Default for TtlBounds {
    fn default() -> Self {
        Self {
            min_ttl: 0,
            positive_max_ttl: 3600,
            negative_max_ttl: 1800,
        }
    }
}

// == Item Body ==
/// Payload of a cache item. Negative results carry no records.
#[derive(Debug, Clone)]
pub enum ItemBody {
    Positive {
        answer: Vec<Record>,
        authority: Vec<Record>,
        additional: Vec<Record>,
    },
    Negative,
}

// == Cache Item ==
/// Represents a single cached response.
///
/// Everything except `stats` is immutable once built. A refresh replaces the
/// whole item, so readers never observe a half-updated one.
#[derive(Debug)]
pub struct CacheItem {
    key: CacheKey,
    response_code: ResponseCode,
    stored_at: DateTime<Utc>,
    base_ttl: u32,
    body: ItemBody,
    stats: QueryStats,
}

impl CacheItem {
    // == Constructors ==
    /// Creates a positive item. The base TTL is the minimum TTL over the
    /// answer and authority records. Additional records only count when both
    /// of those sections are empty, and at least one record is required.
    pub fn positive(
        key: CacheKey,
        response_code: ResponseCode,
        answer: Vec<Record>,
        authority: Vec<Record>,
        additional: Vec<Record>,
        stored_at: DateTime<Utc>,
    ) -> Result<Self> {
        let base_ttl = answer
            .iter()
            .chain(&authority)
            .map(Record::ttl)
            .min()
            .or_else(|| additional.iter().map(Record::ttl).min())
            .ok_or_else(|| {
                CacheError::InvalidItem(format!("positive entry {} has no records", key))
            })?;

        Ok(Self {
            key,
            response_code,
            stored_at,
            base_ttl,
            body: ItemBody::Positive {
                answer,
                authority,
                additional,
            },
            stats: QueryStats::new(),
        })
    }

    /// Creates a negative item with an explicit TTL.
    pub fn negative(
        key: CacheKey,
        response_code: ResponseCode,
        ttl: u32,
        stored_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key,
            response_code,
            stored_at,
            base_ttl: ttl,
            body: ItemBody::Negative,
            stats: QueryStats::new(),
        }
    }

    // == From Message ==
    /// Builds an item from an upstream response.
    ///
    /// `NOERROR` with answers is positive. Everything else (NXDOMAIN, NODATA,
    /// SERVFAIL, ...) is negative, with its TTL taken from the SOA in the
    /// authority section when there is one.
    pub fn from_message(
        message: &Message,
        stored_at: DateTime<Utc>,
        bounds: &TtlBounds,
    ) -> Result<Self> {
        let query = message
            .queries()
            .first()
            .ok_or_else(|| CacheError::InvalidItem("response carries no question".to_string()))?;
        let key = CacheKey::new(query.name(), query.query_type(), query.query_class());

        if message.truncated() {
            return Err(CacheError::InvalidItem(format!(
                "truncated response for {}",
                key
            )));
        }

        let response_code = message.response_code();
        if response_code == ResponseCode::NoError && !message.answers().is_empty() {
            let mut item = Self::positive(
                key,
                response_code,
                message.answers().to_vec(),
                message.name_servers().to_vec(),
                message.additionals().to_vec(),
                stored_at,
            )?;
            item.base_ttl = bounds.clamp_positive(item.base_ttl);
            return Ok(item);
        }

        let soa_ttl = message
            .name_servers()
            .iter()
            .find_map(|record| match record.data() {
                Some(RData::SOA(soa)) => Some(record.ttl().min(soa.minimum())),
                _ => None,
            })
            .unwrap_or(bounds.negative_max_ttl);

        Ok(Self::negative(
            key,
            response_code,
            bounds.clamp_negative(soa_ttl),
            stored_at,
        ))
    }

    // == Accessors ==
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    pub fn response_code(&self) -> ResponseCode {
        self.response_code
    }

    pub fn stored_at(&self) -> DateTime<Utc> {
        self.stored_at
    }

    pub fn base_ttl(&self) -> u32 {
        self.base_ttl
    }

    pub fn body(&self) -> &ItemBody {
        &self.body
    }

    pub fn is_positive(&self) -> bool {
        matches!(self.body, ItemBody::Positive { .. })
    }

    pub fn stats(&self) -> &QueryStats {
        &self.stats
    }

    // == TTL Decay ==
    /// Whole seconds elapsed since the item was stored, never negative.
    pub fn age_at(&self, now: DateTime<Utc>) -> u64 {
        (now - self.stored_at).num_seconds().max(0) as u64
    }

    /// Remaining TTL at `now`: `max(0, base_ttl - age)`.
    pub fn ttl_at(&self, now: DateTime<Utc>) -> u32 {
        let age = u32::try_from(self.age_at(now)).unwrap_or(u32::MAX);
        self.base_ttl.saturating_sub(age)
    }

    /// An item whose remaining TTL is zero is logically absent.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.ttl_at(now) == 0
    }

    // == Copy Out ==
    /// Copies the cached answer out with every record's TTL decayed to `now`.
    pub fn to_response(&self, now: DateTime<Utc>) -> CachedResponse {
        let ttl = self.ttl_at(now);
        let decay = |records: &[Record]| -> Vec<Record> {
            records
                .iter()
                .map(|record| {
                    let mut record = record.clone();
                    record.set_ttl(record.ttl().min(ttl));
                    record
                })
                .collect()
        };

        let (answer, authority, additional) = match &self.body {
            ItemBody::Positive {
                answer,
                authority,
                additional,
            } => (decay(answer), decay(authority), decay(additional)),
            ItemBody::Negative => (Vec::new(), Vec::new(), Vec::new()),
        };

        CachedResponse {
            key: self.key.clone(),
            response_code: self.response_code,
            negative: !self.is_positive(),
            ttl,
            answer,
            authority,
            additional,
        }
    }
}

// == Cached Response ==
/// Owned copy of a cache hit handed back to the resolution pipeline.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub key: CacheKey,
    pub response_code: ResponseCode,
    pub negative: bool,
    pub ttl: u32,
    pub answer: Vec<Record>,
    pub authority: Vec<Record>,
    pub additional: Vec<Record>,
}
