//! Tests for the filter predicate.
//!
//! Run with: cargo test --test filter_test

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use telemetry_trends::entity::readings;
use telemetry_trends::trends::{FilterCriteria, Granularity};

fn ts(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, h, m, 0).unwrap()
}

fn reading(at: DateTime<Utc>, site: &str, room: &str) -> readings::Model {
    readings::Model {
        sensor_id: Uuid::new_v4(),
        ts: at.fixed_offset(),
        site: site.to_string(),
        room: room.to_string(),
        temp_c: 20.0,
        humidity: 50.0,
    }
}

fn criteria(start: DateTime<Utc>, end: DateTime<Utc>) -> FilterCriteria {
    FilterCriteria {
        start,
        end,
        sites: vec![],
        rooms: vec![],
        granularity: Granularity::Minute,
    }
}

#[test]
fn empty_sets_reduce_to_range_only() {
    let c = criteria(ts(8, 0), ts(9, 0));

    // Any site/room passes; only the range decides
    assert!(c.matches(&reading(ts(8, 30), "A", "101")));
    assert!(c.matches(&reading(ts(8, 30), "Z", "999")));
    assert!(!c.matches(&reading(ts(9, 1), "A", "101")));
    assert!(!c.matches(&reading(ts(7, 59), "A", "101")));
}

#[test]
fn range_bounds_are_inclusive() {
    let c = criteria(ts(8, 0), ts(9, 0));

    assert!(c.matches(&reading(ts(8, 0), "A", "101")), "lower bound is inclusive");
    assert!(c.matches(&reading(ts(9, 0), "A", "101")), "upper bound is inclusive");
}

#[test]
fn site_and_room_sets_restrict_membership() {
    let mut c = criteria(ts(8, 0), ts(9, 0));
    c.sites = vec!["A".to_string(), "B".to_string()];
    c.rooms = vec!["101".to_string()];

    assert!(c.matches(&reading(ts(8, 30), "A", "101")));
    assert!(c.matches(&reading(ts(8, 30), "B", "101")));
    assert!(!c.matches(&reading(ts(8, 30), "C", "101")), "site not selected");
    assert!(!c.matches(&reading(ts(8, 30), "A", "102")), "room not selected");
}

#[test]
fn inverted_range_matches_nothing() {
    let c = criteria(ts(9, 0), ts(8, 0));

    assert!(!c.matches(&reading(ts(8, 30), "A", "101")));
    assert!(!c.matches(&reading(ts(9, 0), "A", "101")));
}

#[test]
fn same_instant_range_matches_exactly_that_instant() {
    let c = criteria(ts(8, 30), ts(8, 30));

    assert!(c.matches(&reading(ts(8, 30), "A", "101")));
    assert!(!c.matches(&reading(ts(8, 31), "A", "101")));
}
