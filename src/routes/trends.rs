use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::store;
use crate::trends::{
    FilterCriteria, Granularity, Kpis, LocationColumn, TrendOutcome, aggregate_readings, present,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct TrendsQuery {
    /// Start of the timestamp range, inclusive (ISO 8601)
    pub start: DateTime<Utc>,
    /// End of the timestamp range, inclusive (ISO 8601)
    pub end: DateTime<Utc>,
    /// Filter by sites (comma-separated); omit for all sites
    pub sites: Option<String>,
    /// Filter by rooms (comma-separated); omit for all rooms
    pub rooms: Option<String>,
    /// Locations to chart (comma-separated "site / room" labels);
    /// omit for all locations
    pub locations: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrendsResponse {
    pub granularity: Granularity,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// True when the filters matched no readings; all other fields are
    /// then empty
    pub no_data: bool,
    /// Summary stats over the full aggregate, independent of the
    /// location selection
    pub kpis: Option<Kpis>,
    /// Every location present in the aggregate
    pub locations: Vec<String>,
    /// Shared ascending bucket index for both wide tables
    pub times: Vec<DateTime<Utc>>,
    pub temperature: Vec<LocationColumn>,
    pub humidity: Vec<LocationColumn>,
}

pub(super) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub(super) fn criteria_from_query(query: &TrendsQuery, granularity: Granularity) -> FilterCriteria {
    FilterCriteria {
        start: query.start,
        end: query.end,
        sites: query.sites.as_deref().map(split_list).unwrap_or_default(),
        rooms: query.rooms.as_deref().map(split_list).unwrap_or_default(),
        granularity,
    }
}

/// Get aggregated temperature & humidity trends
///
/// Runs the full pipeline for the given filters: per-bucket per-location
/// averages, dataset-wide KPIs, and one wide table per metric for
/// multi-series charting. An inverted range is not an error; it simply
/// produces a `no_data` response.
#[utoipa::path(
    get,
    path = "/api/trends/{granularity}",
    params(
        ("granularity" = String, Path, description = "Bucket width: minute, hour, day"),
        TrendsQuery
    ),
    responses(
        (status = 200, description = "Trends retrieved successfully", body = TrendsResponse),
        (status = 400, description = "Invalid granularity or query parameters"),
    ),
    tag = "trends"
)]
pub async fn get_trends(
    State(state): State<AppState>,
    Path(granularity): Path<String>,
    Query(query): Query<TrendsQuery>,
) -> AppResult<Json<TrendsResponse>> {
    let granularity: Granularity = granularity.parse().map_err(AppError::BadRequest)?;

    let criteria = criteria_from_query(&query, granularity);
    let readings = store::fetch_readings(&state.db, &criteria).await?;
    let rows = aggregate_readings(&readings, granularity);

    let selected = query.locations.as_deref().map(split_list);
    let outcome = present(&rows, selected.as_deref());

    let response = match outcome {
        TrendOutcome::NoData => {
            tracing::debug!(
                granularity = %granularity,
                start = %query.start,
                end = %query.end,
                "trends_no_data"
            );
            TrendsResponse {
                granularity,
                start: query.start,
                end: query.end,
                no_data: true,
                kpis: None,
                locations: vec![],
                times: vec![],
                temperature: vec![],
                humidity: vec![],
            }
        }
        TrendOutcome::Report(report) => {
            tracing::debug!(
                granularity = %granularity,
                buckets = report.times.len(),
                locations = report.locations.len(),
                "trends_computed"
            );
            TrendsResponse {
                granularity,
                start: query.start,
                end: query.end,
                no_data: false,
                kpis: Some(report.kpis),
                locations: report.locations,
                times: report.times,
                temperature: report.temperature,
                humidity: report.humidity,
            }
        }
    };

    Ok(Json(response))
}
