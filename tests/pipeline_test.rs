//! Tests for the filter → bucket → aggregate → pivot pipeline.
//!
//! Run with: cargo test --test pipeline_test

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use telemetry_trends::entity::readings;
use telemetry_trends::trends::{
    FilterCriteria, Granularity, Kpis, TrendOutcome, aggregate_readings, present,
};

fn ts(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, h, m, s).unwrap()
}

fn reading(at: DateTime<Utc>, site: &str, room: &str, temp_c: f64, humidity: f64) -> readings::Model {
    readings::Model {
        sensor_id: Uuid::new_v4(),
        ts: at.fixed_offset(),
        site: site.to_string(),
        room: room.to_string(),
        temp_c,
        humidity,
    }
}

#[test]
fn bucket_never_exceeds_timestamp_and_is_idempotent() {
    let samples = [
        ts(8, 30, 15),
        ts(0, 0, 0),
        ts(23, 59, 59),
        Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap(),
    ];

    for g in [Granularity::Minute, Granularity::Hour, Granularity::Day] {
        for t in samples {
            let bucket = g.truncate(t);
            assert!(bucket <= t, "bucket {bucket} must not exceed {t} at {g}");
            assert_eq!(
                g.truncate(bucket),
                bucket,
                "re-bucketing at {g} must be a no-op"
            );
            assert!(
                (t - bucket).num_seconds() < g.seconds(),
                "bucket must be the largest multiple not exceeding the timestamp"
            );
        }
    }
}

#[test]
fn truncation_zeroes_sub_unit_components() {
    let t = ts(8, 30, 15);
    assert_eq!(Granularity::Minute.truncate(t), ts(8, 30, 0));
    assert_eq!(Granularity::Hour.truncate(t), ts(8, 0, 0));
    // Calendar-day boundary, not a rolling 24h window
    assert_eq!(Granularity::Day.truncate(t), ts(0, 0, 0));
}

#[test]
fn scenario_a_hourly_average_of_two_readings() {
    let readings = vec![
        reading(ts(8, 0, 0), "A", "101", 20.0, 50.0),
        reading(ts(8, 30, 0), "A", "101", 22.0, 52.0),
    ];

    let rows = aggregate_readings(&readings, Granularity::Hour);

    assert_eq!(rows.len(), 1, "both readings share one hour bucket");
    assert_eq!(rows[0].ts_bucket, ts(8, 0, 0));
    assert_eq!(rows[0].site, "A");
    assert_eq!(rows[0].room, "101");
    assert!((rows[0].avg_temp_c - 21.0).abs() < 1e-9);
    assert!((rows[0].avg_humidity - 51.0).abs() < 1e-9);
}

#[test]
fn aggregation_is_order_independent_and_sorted() {
    let a = reading(ts(9, 5, 0), "B", "201", 18.0, 40.0);
    let b = reading(ts(8, 10, 0), "A", "101", 20.0, 50.0);
    let c = reading(ts(8, 40, 0), "A", "102", 21.0, 55.0);

    let forward = aggregate_readings(&[a.clone(), b.clone(), c.clone()], Granularity::Hour);
    let backward = aggregate_readings(&[c, b, a], Granularity::Hour);

    assert_eq!(forward, backward, "grouping must not depend on input order");

    let keys: Vec<_> = forward
        .iter()
        .map(|r| (r.ts_bucket, r.site.clone(), r.room.clone()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted, "output must be ascending by (bucket, site, room)");
}

#[test]
fn scenario_b_inverted_range_yields_no_data() {
    let criteria = FilterCriteria {
        start: ts(10, 0, 0),
        end: ts(8, 0, 0), // start > end: legal, matches nothing
        sites: vec![],
        rooms: vec![],
        granularity: Granularity::Minute,
    };

    let data = vec![
        reading(ts(8, 30, 0), "A", "101", 20.0, 50.0),
        reading(ts(9, 30, 0), "A", "101", 22.0, 52.0),
    ];

    let filtered: Vec<_> = data.into_iter().filter(|r| criteria.matches(r)).collect();
    assert!(filtered.is_empty());

    let rows = aggregate_readings(&filtered, criteria.granularity);
    assert!(rows.is_empty());

    match present(&rows, None) {
        TrendOutcome::NoData => {}
        TrendOutcome::Report(_) => panic!("empty aggregate must short-circuit to NoData"),
    }
}

#[test]
fn scenario_c_kpis_unchanged_by_location_selection() {
    let readings = vec![
        reading(ts(8, 0, 0), "A", "101", 20.0, 50.0),
        reading(ts(8, 0, 0), "A", "102", 24.0, 60.0),
        reading(ts(8, 0, 0), "B", "201", 28.0, 70.0),
    ];
    let rows = aggregate_readings(&readings, Granularity::Hour);
    assert_eq!(rows.len(), 3);

    let all = match present(&rows, None) {
        TrendOutcome::Report(r) => r,
        TrendOutcome::NoData => panic!("expected a report"),
    };
    let one = match present(&rows, Some(&["A / 101".to_string()])) {
        TrendOutcome::Report(r) => r,
        TrendOutcome::NoData => panic!("expected a report"),
    };

    // KPIs cover the full aggregate in both cases
    assert_eq!(all.kpis, one.kpis);
    assert!((one.kpis.avg_temp_c - 24.0).abs() < 1e-9);
    assert!((one.kpis.max_temp_c - 28.0).abs() < 1e-9);
    assert!((one.kpis.min_temp_c - 20.0).abs() < 1e-9);

    // Exactly one data column per metric
    assert_eq!(one.temperature.len(), 1);
    assert_eq!(one.humidity.len(), 1);
    assert_eq!(one.temperature[0].location, "A / 101");

    // The full location list stays available for the selection control
    assert_eq!(one.locations, vec!["A / 101", "A / 102", "B / 201"]);
}

#[test]
fn scenario_d_missing_bucket_location_cell_is_null() {
    let readings = vec![
        reading(ts(8, 0, 0), "A", "101", 20.0, 50.0),
        reading(ts(9, 0, 0), "A", "101", 22.0, 52.0),
        // location "A / 102" only has a reading in the 08:00 bucket
        reading(ts(8, 0, 0), "A", "102", 25.0, 65.0),
    ];
    let rows = aggregate_readings(&readings, Granularity::Hour);

    let report = match present(&rows, None) {
        TrendOutcome::Report(r) => r,
        TrendOutcome::NoData => panic!("expected a report"),
    };

    assert_eq!(report.times, vec![ts(8, 0, 0), ts(9, 0, 0)]);

    let col_102 = report
        .temperature
        .iter()
        .find(|c| c.location == "A / 102")
        .expect("column for A / 102");
    assert_eq!(col_102.values[0], Some(25.0));
    assert_eq!(col_102.values[1], None, "absent cell must be null, not 0.0");
}

#[test]
fn empty_location_restriction_keeps_kpis() {
    let readings = vec![reading(ts(8, 0, 0), "A", "101", 20.0, 50.0)];
    let rows = aggregate_readings(&readings, Granularity::Hour);

    let report = match present(&rows, Some(&[])) {
        TrendOutcome::Report(r) => r,
        TrendOutcome::NoData => panic!("non-empty aggregate must never be NoData"),
    };

    assert!(report.times.is_empty());
    assert!(report.temperature.is_empty());
    assert!(report.humidity.is_empty());
    assert!((report.kpis.avg_temp_c - 20.0).abs() < 1e-9);
}

#[test]
fn kpi_mean_matches_arithmetic_mean_of_rows() {
    let readings = vec![
        reading(ts(8, 0, 0), "A", "101", 10.0, 30.0),
        reading(ts(9, 0, 0), "A", "101", 20.0, 40.0),
        reading(ts(10, 0, 0), "A", "101", 30.0, 80.0),
    ];
    let rows = aggregate_readings(&readings, Granularity::Hour);

    let kpis = Kpis::from_rows(&rows).expect("non-empty rows");
    assert!((kpis.avg_temp_c - 20.0).abs() < 1e-9);
    // Humidity is a plain row-mean: buckets weigh equally
    assert!((kpis.avg_humidity - 50.0).abs() < 1e-9);

    assert!(Kpis::from_rows(&[]).is_none());
}
