pub mod dashboard;
pub mod download;
pub mod health;
pub mod meta;
mod rate_limit;
pub mod trends;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};

use rate_limit::FallbackIpKeyExtractor;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        meta::get_bounds,
        meta::list_sites,
        meta::list_rooms,
        trends::get_trends,
        download::download_csv,
    ),
    components(
        schemas(
            meta::BoundsResponse,
            trends::TrendsResponse,
            crate::trends::Granularity,
            crate::trends::Kpis,
            crate::trends::LocationColumn,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "meta", description = "Dataset bounds and filter options"),
        (name = "trends", description = "Aggregated trends, KPIs, and wide tables"),
        (name = "export", description = "CSV downloads"),
    ),
    info(
        title = "Telemetry Trends API",
        description = "Trend analytics over curated temperature & humidity telemetry",
        version = "0.1.0"
    )
)]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
    } else {
        tracing::info!(
            metadata_rate = %format!("{}/s burst {}", config.rate_limit_metadata_per_second, config.rate_limit_metadata_burst),
            data_rate = %format!("{}/s burst {}", config.rate_limit_data_per_second, config.rate_limit_data_burst),
            bulk_concurrent = config.bulk_concurrent_limit,
            "Rate limiting configured"
        );
    }

    // Base routes without rate limiting
    let metadata_routes_base = Router::new()
        .route("/bounds", get(meta::get_bounds))
        .route("/sites", get(meta::list_sites))
        .route("/rooms", get(meta::list_rooms));

    let data_routes_base = Router::new()
        .route("/trends/{granularity}", get(trends::get_trends))
        .route(
            "/trends/{granularity}/export.csv",
            get(download::download_csv),
        );

    // Combine API routes, conditionally applying rate limiting
    let api_routes = if config.disable_rate_limiting {
        Router::new()
            .merge(metadata_routes_base)
            .merge(data_routes_base)
    } else {
        let metadata_limiter = GovernorConfigBuilder::default()
            .key_extractor(FallbackIpKeyExtractor)
            .per_second(config.rate_limit_metadata_per_second)
            .burst_size(config.rate_limit_metadata_burst)
            .finish()
            .expect("Failed to create metadata rate limiter");

        let data_limiter = GovernorConfigBuilder::default()
            .key_extractor(FallbackIpKeyExtractor)
            .per_second(config.rate_limit_data_per_second)
            .burst_size(config.rate_limit_data_burst)
            .finish()
            .expect("Failed to create data rate limiter");

        Router::new()
            .merge(metadata_routes_base.layer(GovernorLayer {
                config: Arc::new(metadata_limiter),
            }))
            .merge(data_routes_base.layer(GovernorLayer {
                config: Arc::new(data_limiter),
            }))
    }
    .layer(RequestBodyLimitLayer::new(1024 * 1024)); // 1MB body limit

    // Health check routes (NO rate limiting)
    let health_routes = Router::new().route("/healthz", get(health::healthz));

    // Dashboard page
    let dashboard_routes = Router::new().route("/", get(dashboard::dashboard));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    // Combine all routes
    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(dashboard_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
