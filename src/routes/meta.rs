use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::AppState;
use crate::error::AppResult;
use crate::store;

#[derive(Debug, Serialize, ToSchema)]
pub struct BoundsResponse {
    /// Earliest reading timestamp (or start of the fallback window)
    pub min_ts: DateTime<Utc>,
    /// Latest reading timestamp (or now, if the table is empty)
    pub max_ts: DateTime<Utc>,
    /// Suggested start of the UI window: one hour before `max_ts`
    pub default_start: DateTime<Utc>,
}

/// Get the timestamp bounds of the dataset
///
/// Seeds the date-range controls. An empty dataset yields a default
/// last-24-hours window instead of an error.
#[utoipa::path(
    get,
    path = "/api/bounds",
    responses(
        (status = 200, description = "Bounds retrieved successfully", body = BoundsResponse),
    ),
    tag = "meta"
)]
pub async fn get_bounds(State(state): State<AppState>) -> AppResult<Json<BoundsResponse>> {
    let bounds = store::reading_bounds(&state.db).await?;

    Ok(Json(BoundsResponse {
        min_ts: bounds.min_ts,
        max_ts: bounds.max_ts,
        default_start: bounds.default_start(),
    }))
}

/// List the distinct site identifiers
#[utoipa::path(
    get,
    path = "/api/sites",
    responses(
        (status = 200, description = "Sites retrieved successfully", body = Vec<String>),
    ),
    tag = "meta"
)]
pub async fn list_sites(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(store::distinct_sites(&state.db).await?))
}

/// List the distinct room identifiers
#[utoipa::path(
    get,
    path = "/api/rooms",
    responses(
        (status = 200, description = "Rooms retrieved successfully", body = Vec<String>),
    ),
    tag = "meta"
)]
pub async fn list_rooms(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(store::distinct_rooms(&state.db).await?))
}
