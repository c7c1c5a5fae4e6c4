//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle of the inspection routes over a
//! populated cache.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::rdata::{A, MX};
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use resolver_cache::{
    api::create_router,
    cache::{CacheItem, CacheKey, ManualClock, TtlBounds},
    AppState, DnsCache,
};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn name(s: &str) -> Name {
    Name::from_ascii(s).unwrap()
}

fn setup() -> (Arc<ManualClock>, Arc<DnsCache>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    ));
    let cache = Arc::new(DnsCache::with_clock(
        16,
        TtlBounds::default(),
        clock.clone(),
    ));
    (clock, cache)
}

fn app(cache: &Arc<DnsCache>) -> Router {
    create_router(AppState::new(Arc::clone(cache)), Duration::from_secs(5))
}

fn insert_a(cache: &DnsCache, owner: &str, ttl: u32) {
    let record = Record::from_rdata(
        name(owner),
        ttl,
        RData::A(A::from(Ipv4Addr::new(93, 184, 216, 34))),
    );
    cache.insert(
        CacheItem::positive(
            CacheKey::internet(&name(owner), RecordType::A),
            ResponseCode::NoError,
            vec![record],
            vec![],
            vec![],
            cache.now(),
        )
        .unwrap(),
    );
}

fn insert_nxdomain(cache: &DnsCache, owner: &str, ttl: u32) {
    cache.insert(CacheItem::negative(
        CacheKey::internet(&name(owner), RecordType::A),
        ResponseCode::NXDomain,
        ttl,
        cache.now(),
    ));
}

fn hit(cache: &DnsCache, owner: &str, qtype: RecordType, source: &str) {
    let source: IpAddr = source.parse().unwrap();
    cache
        .lookup(&name(owner), qtype, DNSClass::IN, source)
        .expect("expected a cache hit");
}

async fn get_json(app: Router, uri: &str) -> Value {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// == Stats Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint_empty() {
    let (_, cache) = setup();

    let json = get_json(app(&cache), "/cache/stats").await;
    assert_eq!(json["positive_entries"], 0);
    assert_eq!(json["negative_entries"], 0);
    assert_eq!(json["total_entries"], 0);
}

#[tokio::test]
async fn test_stats_endpoint_counts_live_entries() {
    let (clock, cache) = setup();
    insert_a(&cache, "one.example.", 300);
    insert_a(&cache, "two.example.", 30);
    insert_nxdomain(&cache, "gone.example.", 60);
    insert_nxdomain(&cache, "gone-soon.example.", 10);
    clock.advance_secs(45);

    let json = get_json(app(&cache), "/cache/stats").await;
    assert_eq!(json["positive_entries"], 1);
    assert_eq!(json["negative_entries"], 1);
    assert_eq!(json["total_entries"], 2);
}

// == Entries Endpoint Tests ==

#[tokio::test]
async fn test_entries_endpoint_round_trip() {
    let (clock, cache) = setup();
    insert_a(&cache, "example.com.", 300);
    clock.advance_secs(120);
    hit(&cache, "example.com.", RecordType::A, "10.0.0.1");
    hit(&cache, "example.com.", RecordType::A, "10.0.0.2");
    hit(&cache, "example.com.", RecordType::A, "10.0.0.2");

    let json = get_json(app(&cache), "/cache/entries").await;
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 1);

    let entry = &entries[0];
    assert_eq!(entry["name"], "example.com.");
    assert_eq!(entry["qtype"], "A");
    assert_eq!(entry["rcode"], "NOERROR");
    assert_eq!(entry["ttl"], 180);
    assert_eq!(entry["age"], 120);
    assert_eq!(entry["query_count"], 3);
    assert_eq!(entry["source_ips"]["10.0.0.1"], 1);
    assert_eq!(entry["source_ips"]["10.0.0.2"], 2);
    assert_eq!(entry["stored"], "2024-06-01T12:00:00Z");

    let answer = entry["answer"].as_array().unwrap();
    assert_eq!(answer.len(), 1);
    let text = answer[0].as_str().unwrap();
    assert!(text.starts_with("example.com."));
    assert!(text.contains("93.184.216.34"));
    assert!(!text.contains('\t'));
    assert!(entry.get("authority").is_none());
    assert!(entry.get("additional").is_none());
}

#[tokio::test]
async fn test_entries_endpoint_negative_has_no_record_fields() {
    let (_, cache) = setup();
    insert_nxdomain(&cache, "missing.example.", 60);
    hit(&cache, "missing.example.", RecordType::A, "192.0.2.7");

    let json = get_json(app(&cache), "/cache/entries").await;
    let entry = &json.as_array().unwrap()[0];

    assert_eq!(entry["rcode"], "NXDOMAIN");
    assert_eq!(entry["query_count"], 1);
    assert_eq!(entry["source_ips"]["192.0.2.7"], 1);
    let obj = entry.as_object().unwrap();
    assert!(!obj.contains_key("answer"));
    assert!(!obj.contains_key("authority"));
    assert!(!obj.contains_key("additional"));
}

#[tokio::test]
async fn test_entries_endpoint_mixed_record_types() {
    let (_, cache) = setup();
    let mx = Record::from_rdata(
        name("example.com."),
        600,
        RData::MX(MX::new(10, name("mail.example.com."))),
    );
    let glue = Record::from_rdata(
        name("mail.example.com."),
        600,
        RData::A(A::from(Ipv4Addr::new(192, 0, 2, 25))),
    );
    cache.insert(
        CacheItem::positive(
            CacheKey::internet(&name("example.com."), RecordType::MX),
            ResponseCode::NoError,
            vec![mx],
            vec![],
            vec![glue],
            cache.now(),
        )
        .unwrap(),
    );
    insert_a(&cache, "example.com.", 300);

    let json = get_json(app(&cache), "/cache/entries").await;
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);

    let mx_entry = entries.iter().find(|e| e["qtype"] == "MX").unwrap();
    assert_eq!(mx_entry["ttl"], 600);
    assert!(mx_entry["answer"][0]
        .as_str()
        .unwrap()
        .contains("mail.example.com."));
    assert_eq!(mx_entry["additional"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_entries_endpoint_skips_expired() {
    let (clock, cache) = setup();
    insert_a(&cache, "short.example.", 5);
    insert_nxdomain(&cache, "gone.example.", 5);
    clock.advance_secs(5);

    let json = get_json(app(&cache), "/cache/entries").await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_stats_match_entries_listing() {
    let (clock, cache) = setup();
    for i in 0..20 {
        insert_a(&cache, &format!("host{}.example.", i), 10 + i * 5);
    }
    for i in 0..7 {
        insert_nxdomain(&cache, &format!("nx{}.example.", i), 20 + i * 10);
    }
    clock.advance_secs(40);

    let stats = get_json(app(&cache), "/cache/stats").await;
    let entries = get_json(app(&cache), "/cache/entries").await;
    let listed = entries.as_array().unwrap();
    let positive = listed.iter().filter(|e| e["rcode"] == "NOERROR").count();
    let negative = listed.len() - positive;

    assert_eq!(stats["positive_entries"], positive);
    assert_eq!(stats["negative_entries"], negative);
    assert_eq!(stats["total_entries"], listed.len());
}
