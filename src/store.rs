//! Query layer over the curated telemetry table.
//!
//! Every function takes the connection handle explicitly; nothing here
//! reaches into ambient session state. Only the filter predicate is pushed
//! down to the warehouse - bucketing and averaging happen in `trends` so
//! their semantics stay owned and testable by this crate.

use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    Statement,
};

use crate::entity::readings;
use crate::error::AppResult;
use crate::trends::FilterCriteria;

/// Observed timestamp extent of the dataset, used to seed the UI ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingBounds {
    pub min_ts: DateTime<Utc>,
    pub max_ts: DateTime<Utc>,
}

impl ReadingBounds {
    /// Default start of the UI window: one hour before the newest reading,
    /// clamped to the oldest one.
    #[must_use]
    pub fn default_start(&self) -> DateTime<Utc> {
        (self.max_ts - Duration::hours(1)).max(self.min_ts)
    }
}

#[derive(Debug, FromQueryResult)]
struct BoundsRow {
    min_ts: Option<DateTime<Utc>>,
    max_ts: Option<DateTime<Utc>>,
}

#[derive(Debug, FromQueryResult)]
struct LabelRow {
    label: String,
}

/// MIN/MAX scan over the reading timestamps.
///
/// An empty table is not an error: the bounds fall back to the last 24
/// hours up to now so the UI always has a valid default range.
pub async fn reading_bounds(db: &DatabaseConnection) -> AppResult<ReadingBounds> {
    let row = db
        .query_one(Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT MIN(ts) AS min_ts, MAX(ts) AS max_ts FROM telemetry_curated",
        ))
        .await?
        .and_then(|row| BoundsRow::from_query_result(&row, "").ok());

    if let Some(BoundsRow {
        min_ts: Some(min_ts),
        max_ts: Some(max_ts),
    }) = row
    {
        return Ok(ReadingBounds { min_ts, max_ts });
    }

    let now = Utc::now();
    tracing::debug!("no readings found, falling back to default bounds");
    Ok(ReadingBounds {
        min_ts: now - Duration::days(1),
        max_ts: now,
    })
}

/// Distinct site identifiers, sorted, NULLs dropped.
pub async fn distinct_sites(db: &DatabaseConnection) -> AppResult<Vec<String>> {
    distinct_labels(db, "site").await
}

/// Distinct room identifiers, sorted, NULLs dropped.
pub async fn distinct_rooms(db: &DatabaseConnection) -> AppResult<Vec<String>> {
    distinct_labels(db, "room").await
}

async fn distinct_labels(db: &DatabaseConnection, column: &str) -> AppResult<Vec<String>> {
    let sql = format!(
        "SELECT DISTINCT {column} AS label FROM telemetry_curated WHERE {column} IS NOT NULL ORDER BY {column}"
    );

    let labels = db
        .query_all(Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            sql,
        ))
        .await?
        .into_iter()
        .filter_map(|row| LabelRow::from_query_result(&row, "").ok())
        .map(|r| r.label)
        .collect();

    Ok(labels)
}

/// Fetch the readings matching the filter criteria, ordered by timestamp.
///
/// The order is cosmetic - aggregation downstream is order-independent -
/// but keeps query plans and logs stable.
pub async fn fetch_readings(
    db: &DatabaseConnection,
    criteria: &FilterCriteria,
) -> AppResult<Vec<readings::Model>> {
    let rows = readings::Entity::find()
        .filter(criteria.condition())
        .order_by_asc(readings::Column::Ts)
        .all(db)
        .await?;

    Ok(rows)
}
