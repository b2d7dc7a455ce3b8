use moka::future::Cache;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;

/// Cache for serialized CSV exports. Keys are content digests of the
/// exported row set (see `export::content_key`), so identical filter
/// results reuse the same bytes. Weighted by byte size to enforce a
/// memory limit.
pub type ExportCache = Cache<String, Arc<Vec<u8>>>;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub export_cache: ExportCache,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        // Cache weighted by byte size, not entry count
        let cache: ExportCache = Cache::builder()
            .weigher(|_key: &String, value: &Arc<Vec<u8>>| -> u32 {
                // Weight is the size in bytes (capped at u32::MAX)
                value.len().try_into().unwrap_or(u32::MAX)
            })
            .max_capacity(config.export_cache_max_bytes)
            .time_to_live(Duration::from_secs(config.export_cache_ttl_seconds))
            .build();

        Self {
            db,
            config: Arc::new(config),
            export_cache: cache,
        }
    }
}
