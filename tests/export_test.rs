//! Tests for the CSV export and its content-addressed cache.
//!
//! Run with: cargo test --test export_test

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use telemetry_trends::export;
use telemetry_trends::trends::AggregateRow;

fn ts(h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, h, 0, 0).unwrap()
}

fn row(h: u32, site: &str, room: &str, temp: f64, hum: f64) -> AggregateRow {
    AggregateRow {
        ts_bucket: ts(h),
        site: site.to_string(),
        room: room.to_string(),
        avg_temp_c: temp,
        avg_humidity: hum,
    }
}

#[test]
fn csv_has_header_and_rfc3339_rows() {
    let rows = vec![row(8, "A", "101", 21.0, 51.0)];
    let bytes = export::csv_bytes(&rows).expect("csv encodes");
    let text = String::from_utf8(bytes).expect("export is UTF-8");

    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("ts_bucket,site,room,location,avg_temp_c,avg_humidity")
    );
    assert_eq!(
        lines.next(),
        Some("2025-01-15T08:00:00+00:00,A,101,A / 101,21,51")
    );
    assert_eq!(lines.next(), None);
}

#[test]
fn csv_export_is_byte_identical_across_reruns() {
    let rows = vec![
        row(8, "A", "101", 21.125, 51.5),
        row(8, "B", "201", 19.0, 48.0),
        row(9, "A", "101", 22.0, 52.0),
    ];

    let first = export::csv_bytes(&rows).expect("csv encodes");
    let second = export::csv_bytes(&rows).expect("csv encodes");
    assert_eq!(first, second, "identical rows must serialize identically");
}

#[test]
fn restrict_filters_by_location_label() {
    let rows = vec![
        row(8, "A", "101", 21.0, 51.0),
        row(8, "B", "201", 19.0, 48.0),
    ];

    let all = export::restrict(&rows, None);
    assert_eq!(all.len(), 2);

    let only_a = export::restrict(&rows, Some(&["A / 101".to_string()]));
    assert_eq!(only_a.len(), 1);
    assert_eq!(only_a[0].site, "A");

    let none = export::restrict(&rows, Some(&[]));
    assert!(none.is_empty());
}

#[test]
fn content_key_is_stable_and_order_sensitive() {
    let a = row(8, "A", "101", 21.0, 51.0);
    let b = row(9, "A", "101", 22.0, 52.0);

    let key1 = export::content_key(&[a.clone(), b.clone()]);
    let key2 = export::content_key(&[a.clone(), b.clone()]);
    assert_eq!(key1, key2, "equal row sets must share a key");

    let reordered = export::content_key(&[b.clone(), a.clone()]);
    assert_ne!(key1, reordered, "column/row order is part of the address");

    let mut tweaked = a.clone();
    tweaked.avg_temp_c += 0.0001;
    let changed = export::content_key(&[tweaked, b]);
    assert_ne!(key1, changed, "any value change must change the key");

    assert_eq!(key1.len(), 64, "key is a hex SHA-256 digest");
}

#[tokio::test]
async fn export_cache_replays_identical_bytes() {
    let rows = vec![row(8, "A", "101", 21.0, 51.0)];

    let cache: telemetry_trends::common::ExportCache = moka::future::Cache::new(16);

    let key = export::content_key(&rows);
    assert!(cache.get(&key).await.is_none(), "cold cache misses");

    let bytes = Arc::new(export::csv_bytes(&rows).expect("csv encodes"));
    cache.insert(key.clone(), bytes.clone()).await;

    // A rerun of the same pipeline derives the same key and replays the bytes
    let rerun_key = export::content_key(&rows);
    let cached = cache.get(&rerun_key).await.expect("warm cache hits");
    assert_eq!(*cached, *bytes);
}
