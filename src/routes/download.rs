use axum::{
    extract::{Path, Query, State},
    http::{
        StatusCode,
        header::{self, HeaderValue},
    },
    response::Response,
};
use std::sync::Arc;
use tokio::sync::Semaphore;

use super::trends::{TrendsQuery, criteria_from_query, split_list};
use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::trends::{Granularity, aggregate_readings};
use crate::{export, store};

/// Global semaphore limiting concurrent CSV downloads.
/// Configurable via BULK_CONCURRENT_LIMIT env var (default: 5).
static BULK_SEMAPHORE: std::sync::LazyLock<Arc<Semaphore>> = std::sync::LazyLock::new(|| {
    let limit = std::env::var("BULK_CONCURRENT_LIMIT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(5);
    Arc::new(Semaphore::new(limit))
});

/// Download the location-filtered aggregate rows as CSV
///
/// Serves `data_aggregated.csv`: one row per (bucket, site, room) with the
/// two averaged metrics. Identical filters against unchanged data replay
/// byte-identical files out of the content-addressed cache.
#[utoipa::path(
    get,
    path = "/api/trends/{granularity}/export.csv",
    params(
        ("granularity" = String, Path, description = "Bucket width: minute, hour, day"),
        TrendsQuery
    ),
    responses(
        (status = 200, description = "CSV export", content_type = "text/csv"),
        (status = 204, description = "Filters matched no readings"),
        (status = 400, description = "Invalid granularity or query parameters"),
        (status = 503, description = "Too many concurrent downloads"),
    ),
    tag = "export"
)]
pub async fn download_csv(
    State(state): State<AppState>,
    Path(granularity): Path<String>,
    Query(query): Query<TrendsQuery>,
) -> AppResult<Response> {
    let granularity: Granularity = granularity.parse().map_err(AppError::BadRequest)?;

    let _permit = match BULK_SEMAPHORE.clone().try_acquire_owned() {
        Ok(permit) => permit,
        Err(_) => {
            tracing::warn!(
                status = StatusCode::SERVICE_UNAVAILABLE.as_u16(),
                "bulk_request_rejected"
            );
            return Err(AppError::ServiceUnavailable(
                "Too many concurrent downloads. Please try again later.".to_string(),
            ));
        }
    };

    let criteria = criteria_from_query(&query, granularity);
    let readings = store::fetch_readings(&state.db, &criteria).await?;
    let rows = aggregate_readings(&readings, granularity);

    if rows.is_empty() {
        tracing::debug!(granularity = %granularity, "export_no_data");
        return Response::builder()
            .status(StatusCode::NO_CONTENT)
            .body(axum::body::Body::empty())
            .map_err(|e| AppError::Internal(e.to_string()));
    }

    let selected = query.locations.as_deref().map(split_list);
    let restricted = export::restrict(&rows, selected.as_deref());

    let cache_key = export::content_key(&restricted);
    let (bytes, cache_hit) = match state.export_cache.get(&cache_key).await {
        Some(cached) => (cached, true),
        None => {
            let encoded = Arc::new(export::csv_bytes(&restricted)?);
            state
                .export_cache
                .insert(cache_key.clone(), encoded.clone())
                .await;
            (encoded, false)
        }
    };

    tracing::debug!(
        cache_key = %cache_key,
        cache_hit,
        size_bytes = bytes.len(),
        rows = restricted.len(),
        "export_served"
    );

    let cache_header = if cache_hit { "HIT" } else { "MISS" };
    let disposition = format!("attachment; filename=\"{}\"", export::EXPORT_FILENAME);

    Response::builder()
        .header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/csv; charset=utf-8"),
        )
        .header(header::CONTENT_DISPOSITION, disposition)
        .header("X-Cache", HeaderValue::from_static(cache_header))
        .body(axum::body::Body::from(bytes.as_ref().clone()))
        .map_err(|e| AppError::Internal(e.to_string()))
}
