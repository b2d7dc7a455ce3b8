use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Bucket width for time truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Minute,
    Hour,
    Day,
}

impl Granularity {
    /// Bucket width in seconds. Day buckets are UTC calendar days, which
    /// are uniform 86400-second multiples on the Unix timeline.
    #[must_use]
    pub fn seconds(self) -> i64 {
        match self {
            Self::Minute => 60,
            Self::Hour => 3_600,
            Self::Day => 86_400,
        }
    }

    /// Truncate a timestamp to its bucket: the largest multiple of the
    /// bucket width not exceeding `ts`. Sub-second components are dropped.
    #[must_use]
    pub fn truncate(self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let unit = self.seconds();
        let secs = ts.timestamp();
        let bucket = secs - secs.rem_euclid(unit);
        // Unreachable fallback: bucket never leaves chrono's representable range
        DateTime::from_timestamp(bucket, 0).unwrap_or(ts)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minute" => Ok(Self::Minute),
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            _ => Err(format!(
                "Invalid granularity: {s}. Must be one of: minute, hour, day"
            )),
        }
    }
}
