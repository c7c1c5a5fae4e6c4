//! Introspection Export Module
//!
//! Snapshots the cache into serializable views.

use chrono::{DateTime, Utc};
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::Record;

use crate::cache::{CacheItem, DnsCache, ItemBody};
use crate::models::{EntryResponse, StatsResponse};

impl DnsCache {
    // == Export Stats ==
    /// Live entry counts of both stores, each taken at the same instant but
    /// not joined transactionally.
    pub fn export_stats(&self) -> StatsResponse {
        let now = self.now();
        StatsResponse::new(self.positive().len(now), self.negative().len(now))
    }

    // == Export Entries ==
    /// Every live entry, positive store first.
    pub fn export_entries(&self) -> Vec<EntryResponse> {
        let now = self.now();
        let mut entries = Vec::new();
        for store in [self.positive(), self.negative()] {
            store.walk(|_, item| {
                if !item.is_expired(now) {
                    entries.push(entry_view(item, now));
                }
                true
            });
        }
        entries
    }
}

fn entry_view(item: &CacheItem, now: DateTime<Utc>) -> EntryResponse {
    let stats = item.stats().snapshot();
    let (answer, authority, additional) = match item.body() {
        ItemBody::Positive {
            answer,
            authority,
            additional,
        } => (
            record_texts(answer),
            record_texts(authority),
            record_texts(additional),
        ),
        ItemBody::Negative => (Vec::new(), Vec::new(), Vec::new()),
    };

    EntryResponse {
        name: item.key().name().to_string(),
        qtype: item.key().query_type().to_string(),
        rcode: response_code_name(item.response_code()),
        ttl: item.ttl_at(now),
        stored: item.stored_at(),
        age: item.age_at(now),
        query_count: stats.query_count,
        source_ips: stats.source_ips,
        answer,
        authority,
        additional,
    }
}

fn record_texts(records: &[Record]) -> Vec<String> {
    records.iter().map(record_text).collect()
}

/// Presentation form of a record with tab field separators turned into
/// spaces. Whitespace inside record data is kept as is.
pub fn record_text(record: &Record) -> String {
    record.to_string().replace('\t', " ")
}

/// Conventional mnemonic for a response code.
pub fn response_code_name(code: ResponseCode) -> String {
    let name = match code {
        ResponseCode::NoError => "NOERROR",
        ResponseCode::FormErr => "FORMERR",
        ResponseCode::ServFail => "SERVFAIL",
        ResponseCode::NXDomain => "NXDOMAIN",
        ResponseCode::NotImp => "NOTIMP",
        ResponseCode::Refused => "REFUSED",
        ResponseCode::YXDomain => "YXDOMAIN",
        ResponseCode::YXRRSet => "YXRRSET",
        ResponseCode::NXRRSet => "NXRRSET",
        ResponseCode::NotAuth => "NOTAUTH",
        ResponseCode::NotZone => "NOTZONE",
        other => return format!("RCODE{}", u16::from(other)),
    };
    name.to_string()
}
