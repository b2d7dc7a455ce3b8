use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use utoipa::ToSchema;

use super::AggregateRow;

/// Scalar summary stats over the whole filtered/aggregated result.
///
/// Computed before any location selection, so toggling chart series never
/// moves the KPI values. Humidity is a plain row-mean: every bucket weighs
/// equally regardless of how many readings produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Kpis {
    pub avg_temp_c: f64,
    pub avg_humidity: f64,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
}

impl Kpis {
    /// Returns `None` for an empty row set; there is no mean to take.
    #[must_use]
    pub fn from_rows(rows: &[AggregateRow]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }

        let n = rows.len() as f64;
        let mut temp_sum = 0.0;
        let mut humidity_sum = 0.0;
        let mut max_temp = f64::NEG_INFINITY;
        let mut min_temp = f64::INFINITY;

        for row in rows {
            temp_sum += row.avg_temp_c;
            humidity_sum += row.avg_humidity;
            max_temp = max_temp.max(row.avg_temp_c);
            min_temp = min_temp.min(row.avg_temp_c);
        }

        Some(Self {
            avg_temp_c: temp_sum / n,
            avg_humidity: humidity_sum / n,
            max_temp_c: max_temp,
            min_temp_c: min_temp,
        })
    }
}

/// One chart series: a location's metric values aligned to the shared
/// bucket index. A `None` cell means no reading fell in that bucket for
/// that location - never zero.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LocationColumn {
    pub location: String,
    pub values: Vec<Option<f64>>,
}

/// The reshaped presentation of one pipeline evaluation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrendReport {
    pub kpis: Kpis,
    /// Every location present in the aggregate, for the selection control
    pub locations: Vec<String>,
    /// Ascending distinct bucket timestamps of the restricted rows
    pub times: Vec<DateTime<Utc>>,
    /// One temperature column per selected location
    pub temperature: Vec<LocationColumn>,
    /// One humidity column per selected location
    pub humidity: Vec<LocationColumn>,
}

/// Outcome of the presentation step. An empty aggregate short-circuits to
/// `NoData` before any KPI or pivot is attempted.
#[derive(Debug, Clone)]
pub enum TrendOutcome {
    NoData,
    Report(Box<TrendReport>),
}

/// Pivot the ordered aggregate rows into per-metric wide tables and
/// compute the KPIs.
///
/// `selected` restricts which locations become chart columns; `None`
/// selects every location in the aggregate. KPIs always cover the full
/// row set. An empty restriction yields empty tables but intact KPIs.
#[must_use]
pub fn present(rows: &[AggregateRow], selected: Option<&[String]>) -> TrendOutcome {
    let Some(kpis) = Kpis::from_rows(rows) else {
        return TrendOutcome::NoData;
    };

    let available: BTreeSet<String> = rows.iter().map(AggregateRow::location).collect();

    let columns: BTreeSet<String> = match selected {
        Some(labels) => labels.iter().cloned().collect(),
        None => available.clone(),
    };

    let restricted: Vec<&AggregateRow> = rows
        .iter()
        .filter(|r| columns.contains(&r.location()))
        .collect();

    let times: Vec<DateTime<Utc>> = restricted
        .iter()
        .map(|r| r.ts_bucket)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    // Per-location cell maps, aligned to the shared time index below
    let mut cells: HashMap<String, HashMap<DateTime<Utc>, (f64, f64)>> =
        HashMap::with_capacity(columns.len());
    for row in &restricted {
        cells
            .entry(row.location())
            .or_default()
            .insert(row.ts_bucket, (row.avg_temp_c, row.avg_humidity));
    }

    let mut temperature = Vec::with_capacity(columns.len());
    let mut humidity = Vec::with_capacity(columns.len());

    for location in &columns {
        let location_cells = cells.get(location);
        let mut temp_values = Vec::with_capacity(times.len());
        let mut humidity_values = Vec::with_capacity(times.len());

        for t in &times {
            match location_cells.and_then(|m| m.get(t)) {
                Some((temp, hum)) => {
                    temp_values.push(Some(*temp));
                    humidity_values.push(Some(*hum));
                }
                None => {
                    temp_values.push(None);
                    humidity_values.push(None);
                }
            }
        }

        temperature.push(LocationColumn {
            location: location.clone(),
            values: temp_values,
        });
        humidity.push(LocationColumn {
            location: location.clone(),
            values: humidity_values,
        });
    }

    TrendOutcome::Report(Box::new(TrendReport {
        kpis,
        locations: available.into_iter().collect(),
        times,
        temperature,
        humidity,
    }))
}
