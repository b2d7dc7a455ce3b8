use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use super::Granularity;
use crate::entity::readings;

/// Per-bucket, per-location averages. The unit of output of the
/// aggregation step and the unit of the CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AggregateRow {
    /// Reading timestamp truncated to the chosen granularity
    pub ts_bucket: DateTime<Utc>,
    pub site: String,
    pub room: String,
    pub avg_temp_c: f64,
    pub avg_humidity: f64,
}

impl AggregateRow {
    /// Display label combining site and room, used as the chart series key.
    #[must_use]
    pub fn location(&self) -> String {
        format!("{} / {}", self.site, self.room)
    }
}

/// Group readings by (bucket, site, room) and average both measured
/// quantities per group.
///
/// Grouping is order-independent; output is ascending by bucket, with ties
/// broken by site then room, so a fixed input set always produces the same
/// row sequence. Every group holds at least one reading, so the means are
/// always defined.
#[must_use]
pub fn aggregate_readings(
    readings: &[readings::Model],
    granularity: Granularity,
) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<(DateTime<Utc>, String, String), (f64, f64, u32)> = BTreeMap::new();

    for reading in readings {
        let bucket = granularity.truncate(reading.ts.with_timezone(&Utc));
        let entry = groups
            .entry((bucket, reading.site.clone(), reading.room.clone()))
            .or_insert((0.0, 0.0, 0));
        entry.0 += reading.temp_c;
        entry.1 += reading.humidity;
        entry.2 += 1;
    }

    groups
        .into_iter()
        .map(
            |((ts_bucket, site, room), (temp_sum, humidity_sum, count))| AggregateRow {
                ts_bucket,
                site,
                room,
                avg_temp_c: temp_sum / f64::from(count),
                avg_humidity: humidity_sum / f64::from(count),
            },
        )
        .collect()
}
