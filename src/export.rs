//! CSV serialization of the location-filtered aggregate rows.
//!
//! The export is deterministic: identical criteria against unchanged data
//! produce byte-identical files. That makes the output safe to memoize in
//! the content-addressed cache keyed by [`content_key`].

use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

use crate::error::{AppError, AppResult};
use crate::trends::AggregateRow;

/// Default download filename offered to the operator.
pub const EXPORT_FILENAME: &str = "data_aggregated.csv";

const EXPORT_HEADER: [&str; 6] = [
    "ts_bucket",
    "site",
    "room",
    "location",
    "avg_temp_c",
    "avg_humidity",
];

/// Keep only rows whose location label is selected. `None` keeps all.
#[must_use]
pub fn restrict(rows: &[AggregateRow], selected: Option<&[String]>) -> Vec<AggregateRow> {
    match selected {
        None => rows.to_vec(),
        Some(labels) => {
            let wanted: BTreeSet<&String> = labels.iter().collect();
            rows.iter()
                .filter(|r| wanted.contains(&r.location()))
                .cloned()
                .collect()
        }
    }
}

/// Serialize rows as UTF-8 CSV with a header record and RFC 3339 bucket
/// timestamps, in pipeline order.
pub fn csv_bytes(rows: &[AggregateRow]) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(EXPORT_HEADER)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    for row in rows {
        writer
            .write_record([
                row.ts_bucket.to_rfc3339(),
                row.site.clone(),
                row.room.clone(),
                row.location(),
                row.avg_temp_c.to_string(),
                row.avg_humidity.to_string(),
            ])
            .map_err(|e| AppError::Internal(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Content address for an export: SHA-256 over the column order and the
/// canonical bytes of every row. Equal row sets map to equal keys, so the
/// cache replays identical downloads without re-encoding.
#[must_use]
pub fn content_key(rows: &[AggregateRow]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(EXPORT_HEADER.join(",").as_bytes());

    for row in rows {
        // Record/field separators keep adjacent values from colliding
        hasher.update([0x1e]);
        hasher.update(row.ts_bucket.to_rfc3339().as_bytes());
        hasher.update([0x1f]);
        hasher.update(row.site.as_bytes());
        hasher.update([0x1f]);
        hasher.update(row.room.as_bytes());
        hasher.update([0x1f]);
        hasher.update(row.avg_temp_c.to_bits().to_le_bytes());
        hasher.update(row.avg_humidity.to_bits().to_le_bytes());
    }

    format!("{:x}", hasher.finalize())
}
